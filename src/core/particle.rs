use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// A hard disk moving at constant velocity between collisions.
///
/// Fields:
/// - `id`: index of the particle in the simulation arena
/// - `r`: position [x, y]
/// - `v`: velocity [vx, vy], in units per frame
/// - `mass`: particle mass (> 0)
/// - `collision_count`: generation counter, bumped on every resolved collision
///
/// The radius is shared by every particle and lives on the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Arena index.
    pub id: u32,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Mass (> 0).
    pub mass: f64,
    /// Generation counter (for event invalidation).
    #[serde(default)]
    pub collision_count: u64,
}

impl Particle {
    /// Create a new particle with a zeroed generation counter.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `mass` is non-positive or any component is NaN/inf.
    pub fn new(id: u32, r: [f64; DIM], v: [f64; DIM], mass: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            mass,
            collision_count: 0,
        })
    }

    /// Increment the generation counter.
    #[inline]
    pub fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.wrapping_add(1);
    }

    /// Linear drift by `dt` frames.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        for (r_k, v_k) in self.r.iter_mut().zip(self.v) {
            *r_k += v_k * dt;
        }
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Linear momentum m v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(1, [0.0, 1.0], [2.0, -3.0], 2.0)?;
        assert_eq!(p.id, 1);
        assert_eq!(p.r, [0.0, 1.0]);
        assert_eq!(p.v, [2.0, -3.0]);
        assert_eq!(p.mass, 2.0);
        assert_eq!(p.collision_count, 0);
        Ok(())
    }

    #[test]
    fn invalid_mass_rejected() {
        let err = Particle::new(0, [0.0, 0.0], [0.0, 0.0], 0.0).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn non_finite_state_rejected() {
        assert!(Particle::new(0, [f64::NAN, 0.0], [0.0, 0.0], 1.0).is_err());
        assert!(Particle::new(0, [0.0, 0.0], [f64::INFINITY, 0.0], 1.0).is_err());
    }

    #[test]
    fn advance_moves_along_velocity() -> Result<()> {
        let mut p = Particle::new(0, [1.0, 2.0], [0.5, -1.0], 1.0)?;
        p.advance(1.0);
        assert_eq!(p.r, [1.5, 1.0]);
        p.advance(2.0);
        assert_eq!(p.r, [2.5, -1.0]);
        Ok(())
    }

    #[test]
    fn kinetic_energy_computed() -> Result<()> {
        // v = (3,4), |v|^2 = 25; KE = 0.5 * m * 25
        let p = Particle::new(7, [0.0, 0.0], [3.0, 4.0], 2.0)?;
        assert!((p.kinetic_energy() - 25.0).abs() < 1e-12);
        assert_eq!(p.momentum(), [6.0, 8.0]);
        Ok(())
    }

    #[test]
    fn bump_collision_count() -> Result<()> {
        let mut p = Particle::new(1, [0.0, 0.0], [0.0, 0.0], 1.0)?;
        p.bump_collision_count();
        p.bump_collision_count();
        assert_eq!(p.collision_count, 2);
        Ok(())
    }
}
