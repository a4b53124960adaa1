//! Event-driven simulation of equal hard disks in a rectangular box.
//!
//! Time advances in whole display frames, but collisions are predicted
//! exactly: every pending disk-disk and disk-wall contact sits in a
//! binary min-heap keyed by its continuous time, and each tick resolves
//! the ones that came due before the frame. Events that outlived the
//! trajectories they were predicted from are recognised by per-particle
//! generation counters and dropped.
//!
//! ```
//! use disksim::{SimConfig, Simulation};
//!
//! let config = SimConfig { particle_count: 10, seed: Some(3), ..SimConfig::default() };
//! let mut sim = Simulation::new(&config)?;
//! for _ in 0..60 {
//!     sim.tick()?;
//! }
//! assert_eq!(sim.frame(), 60);
//! # Ok::<(), disksim::Error>(())
//! ```
//!
//! The library logs through the `log` facade; hosts choose the backend.

pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::config::SimConfig;
pub use crate::core::{
    CollisionEvent, CollisionStats, EventKind, EventQueue, Particle, Simulation, TickReport,
};
pub use crate::error::{Error, Result};
