use crate::core::Particle;
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// Participants of a predicted collision.
///
/// Tie-breaking at equal times prefers `Pair` < `Wall`, then lower indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Disk-disk collision between particles `i` and `j`.
    Pair { i: u32, j: u32 },
    /// Disk-wall collision for particle `i`.
    Wall { i: u32 },
}

impl EventKind {
    #[inline]
    fn order_key(&self) -> (u8, u32, u32) {
        match *self {
            EventKind::Pair { i, j } => (0, i, j),
            EventKind::Wall { i } => (1, i, 0),
        }
    }

    /// Index of the primary particle.
    #[inline]
    pub fn primary(&self) -> u32 {
        match *self {
            EventKind::Pair { i, .. } | EventKind::Wall { i } => i,
        }
    }

    /// Index of the secondary particle, absent for wall events.
    #[inline]
    pub fn secondary(&self) -> Option<u32> {
        match *self {
            EventKind::Pair { j, .. } => Some(j),
            EventKind::Wall { .. } => None,
        }
    }
}

/// A scheduled collision, immutable once created.
///
/// - `time`: absolute frame time of the collision (finite, may lie in the past).
/// - `kind`: participants.
/// - `cc_i`, `cc_j`: generation counter snapshots taken at prediction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub time: NotNan<f64>,
    pub kind: EventKind,
    pub cc_i: u64,
    pub cc_j: Option<u64>,
}

impl CollisionEvent {
    /// Create a new event, validating that time is finite.
    pub fn new(time: f64, kind: EventKind, cc_i: u64, cc_j: Option<u64>) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::MathError(format!(
                "event time must be finite, got {time}"
            )));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::MathError("event time cannot be NaN".into()))?;
        Ok(Self {
            time,
            kind,
            cc_i,
            cc_j,
        })
    }

    /// Snapshot a wall event for `p` at absolute `time`.
    pub fn wall(time: f64, p: &Particle) -> Result<Self> {
        Self::new(time, EventKind::Wall { i: p.id }, p.collision_count, None)
    }

    /// Snapshot a pair event for `a` and `b` at absolute `time`.
    pub fn pair(time: f64, a: &Particle, b: &Particle) -> Result<Self> {
        Self::new(
            time,
            EventKind::Pair { i: a.id, j: b.id },
            a.collision_count,
            Some(b.collision_count),
        )
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// Validate against current generation counters. For wall events pass `None` for `cc_j_now`.
    #[inline]
    pub fn is_valid(&self, cc_i_now: u64, cc_j_now: Option<u64>) -> bool {
        if self.cc_i != cc_i_now {
            return false;
        }
        match (self.cc_j, cc_j_now) {
            (Some(a), Some(b)) => a == b,
            (None, _) => true,
            (Some(_), None) => false,
        }
    }

    /// Validate against the particle arena. Unknown indices make the event stale.
    pub fn is_current(&self, particles: &[Particle]) -> bool {
        let count_of = |idx: u32| particles.get(idx as usize).map(|p| p.collision_count);
        let Some(cc_i_now) = count_of(self.kind.primary()) else {
            return false;
        };
        match self.kind.secondary() {
            Some(j) => match count_of(j) {
                Some(cc_j_now) => self.is_valid(cc_i_now, Some(cc_j_now)),
                None => false,
            },
            None => self.is_valid(cc_i_now, None),
        }
    }
}

impl Ord for CollisionEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.order_key().cmp(&other.kind.order_key()))
            .then_with(|| {
                (self.cc_i, self.cc_j.unwrap_or(0)).cmp(&(other.cc_i, other.cc_j.unwrap_or(0)))
            })
    }
}

impl PartialOrd for CollisionEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
