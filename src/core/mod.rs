//! Event-driven collision engine.
//!
//! Particles live in an index-addressed arena; events refer to them by index
//! together with a snapshot of their generation counters.

pub mod event;
pub mod particle;
pub mod predict;
pub mod queue;
pub mod resolve;
pub mod sim;

pub use event::{CollisionEvent, EventKind};
pub use particle::Particle;
pub use predict::{time_to_hit, time_to_hit_wall};
pub use queue::EventQueue;
pub use resolve::{bounce_off, bounce_off_wall};
pub use sim::{CollisionStats, Simulation, Snapshot, TickReport};
