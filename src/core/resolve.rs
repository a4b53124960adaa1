//! Post-collision velocities.
//!
//! Both resolvers bump the generation counter of every particle involved,
//! which invalidates all events scheduled against the old trajectories.

use crate::core::particle::{Particle, DIM};
use crate::core::predict::{dot, relative};
use crate::error::{Error, Result};

/// Smallest center separation treated as a usable contact normal.
const EPS_DIST: f64 = 1e-12;

/// Elastic collision between two disks in contact.
///
/// The impulse acts along the line of centers with magnitude
/// `J = 2 m_a m_b (dr·dv) / ((m_a + m_b) dist)`, where `dist` is the measured
/// center separation (`2r` at exact contact).
pub fn bounce_off(a: &mut Particle, b: &mut Particle) -> Result<()> {
    let (dr, dv) = relative(a, b);
    let dist = dot(&dr, &dr).sqrt();
    if dist <= EPS_DIST {
        return Err(Error::MathError(format!(
            "degenerate contact normal between particles {} and {}",
            a.id, b.id
        )));
    }
    let dvdr = dot(&dr, &dv);
    let j = 2.0 * a.mass * b.mass * dvdr / ((a.mass + b.mass) * dist);
    for k in 0..DIM {
        let jk = j * dr[k] / dist;
        a.v[k] += jk / a.mass;
        b.v[k] -= jk / b.mass;
    }
    a.bump_collision_count();
    b.bump_collision_count();
    Ok(())
}

/// Specular reflection off the walls of a `width` × `height` box.
///
/// A velocity component is negated only when the disk is at or past the wall it
/// is moving towards. Returns whether any component was reflected; the counter
/// is bumped either way.
pub fn bounce_off_wall(p: &mut Particle, width: f64, height: f64, radius: f64) -> bool {
    let extents = [width, height];
    let mut reflected = false;
    for k in 0..DIM {
        let (x, v) = (p.r[k], p.v[k]);
        let hit_max = v > 0.0 && x + radius >= extents[k];
        let hit_min = v < 0.0 && x - radius <= 0.0;
        if hit_max || hit_min {
            p.v[k] = -v;
            reflected = true;
        }
    }
    p.bump_collision_count();
    reflected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy(ps: &[&Particle]) -> f64 {
        ps.iter().map(|p| p.kinetic_energy()).sum()
    }

    #[test]
    fn head_on_equal_masses_swap_velocities() -> Result<()> {
        let mut a = Particle::new(0, [0.0, 0.0], [1.0, 0.0], 1.0)?;
        let mut b = Particle::new(1, [4.0, 0.0], [-1.0, 0.0], 1.0)?;
        bounce_off(&mut a, &mut b)?;
        assert!((a.v[0] + 1.0).abs() < 1e-12);
        assert!((b.v[0] - 1.0).abs() < 1e-12);
        assert_eq!(a.v[1], 0.0);
        assert_eq!(b.v[1], 0.0);
        assert_eq!((a.collision_count, b.collision_count), (1, 1));
        Ok(())
    }

    #[test]
    fn oblique_collision_conserves_energy_and_momentum() -> Result<()> {
        let mut a = Particle::new(0, [0.0, 0.0], [2.0, 0.5], 1.0)?;
        // Contact normal at 60 degrees, distance 4.
        let n = [0.5_f64, 3.0_f64.sqrt() / 2.0];
        let mut b = Particle::new(1, [4.0 * n[0], 4.0 * n[1]], [-0.3, -1.2], 1.0)?;
        let e0 = energy(&[&a, &b]);
        let p0 = [a.v[0] + b.v[0], a.v[1] + b.v[1]];

        bounce_off(&mut a, &mut b)?;

        let e1 = energy(&[&a, &b]);
        let p1 = [a.v[0] + b.v[0], a.v[1] + b.v[1]];
        assert!((e1 - e0).abs() < 1e-12, "energy drift {e0} -> {e1}");
        assert!((p1[0] - p0[0]).abs() < 1e-12);
        assert!((p1[1] - p0[1]).abs() < 1e-12);

        // Tangential components are untouched.
        let t = [-n[1], n[0]];
        let tangent = |v: [f64; 2]| v[0] * t[0] + v[1] * t[1];
        assert!((tangent(a.v) - tangent([2.0, 0.5])).abs() < 1e-12);
        assert!((tangent(b.v) - tangent([-0.3, -1.2])).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn unequal_masses_conserve_momentum() -> Result<()> {
        let mut a = Particle::new(0, [0.0, 0.0], [1.0, 0.0], 3.0)?;
        let mut b = Particle::new(1, [2.0, 0.0], [0.0, 0.0], 1.0)?;
        let p0 = a.momentum()[0] + b.momentum()[0];
        let e0 = energy(&[&a, &b]);
        bounce_off(&mut a, &mut b)?;
        assert!((a.momentum()[0] + b.momentum()[0] - p0).abs() < 1e-12);
        assert!((energy(&[&a, &b]) - e0).abs() < 1e-12);
        // 1D elastic: v_a' = (ma - mb)/(ma + mb) v_a = 0.5, v_b' = 2 ma/(ma + mb) v_a = 1.5
        assert!((a.v[0] - 0.5).abs() < 1e-12);
        assert!((b.v[0] - 1.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn coincident_centers_are_rejected() -> Result<()> {
        let mut a = Particle::new(0, [1.0, 1.0], [1.0, 0.0], 1.0)?;
        let mut b = Particle::new(1, [1.0, 1.0], [-1.0, 0.0], 1.0)?;
        assert!(matches!(bounce_off(&mut a, &mut b), Err(Error::MathError(_))));
        Ok(())
    }

    #[test]
    fn right_wall_flips_vx_only() -> Result<()> {
        let mut p = Particle::new(0, [95.0, 40.0], [2.5, -1.0], 1.0)?;
        assert!(bounce_off_wall(&mut p, 100.0, 100.0, 5.0));
        assert_eq!(p.v, [-2.5, -1.0]);
        assert_eq!(p.collision_count, 1);
        Ok(())
    }

    #[test]
    fn corner_flips_both_components() -> Result<()> {
        let mut p = Particle::new(0, [4.0, 4.5], [-1.0, -2.0], 1.0)?;
        assert!(bounce_off_wall(&mut p, 100.0, 100.0, 5.0));
        assert_eq!(p.v, [1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn wall_bounce_away_from_walls_only_bumps_counter() -> Result<()> {
        let mut p = Particle::new(0, [50.0, 50.0], [1.0, 1.0], 1.0)?;
        assert!(!bounce_off_wall(&mut p, 100.0, 100.0, 5.0));
        assert_eq!(p.v, [1.0, 1.0]);
        assert_eq!(p.collision_count, 1);

        // Past the right wall but already moving left: nothing to reflect.
        let mut q = Particle::new(1, [97.0, 50.0], [-1.0, 0.0], 1.0)?;
        assert!(!bounce_off_wall(&mut q, 100.0, 100.0, 5.0));
        assert_eq!(q.v, [-1.0, 0.0]);
        Ok(())
    }
}
