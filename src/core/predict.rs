//! Time-to-collision prediction from the current kinematic state.
//!
//! All times are relative to the instant the state describes, in frames.
//! `None` means the collision never happens along the current straight-line paths.

use crate::core::particle::{Particle, DIM};

#[inline]
pub(crate) fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Relative position and velocity of `b` with respect to `a`.
#[inline]
pub(crate) fn relative(a: &Particle, b: &Particle) -> ([f64; DIM], [f64; DIM]) {
    let mut dr = [0.0_f64; DIM];
    let mut dv = [0.0_f64; DIM];
    for k in 0..DIM {
        dr[k] = b.r[k] - a.r[k];
        dv[k] = b.v[k] - a.v[k];
    }
    (dr, dv)
}

/// Time until two disks of common `radius` first touch.
///
/// Returns `None` for the same particle, for pairs that are separating or not
/// closing (`dr·dv >= 0`), and when the paths miss (negative discriminant).
/// Overlapping approaching pairs yield a negative time: the contact lies in the past.
pub fn time_to_hit(a: &Particle, b: &Particle, radius: f64) -> Option<f64> {
    if a.id == b.id {
        return None;
    }
    let (dr, dv) = relative(a, b);
    let dvdr = dot(&dr, &dv);
    if dvdr >= 0.0 {
        return None;
    }
    let dvdv = dot(&dv, &dv);
    if dvdv == 0.0 {
        return None;
    }
    let drdr = dot(&dr, &dr);
    let sigma = 2.0 * radius;
    let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
    if d < 0.0 {
        return None;
    }
    let t = -(dvdr + d.sqrt()) / dvdv;
    t.is_finite().then_some(t)
}

/// Time along one axis until the disk edge reaches the wall it is heading for.
#[inline]
fn axis_time(x: f64, v: f64, extent: f64, radius: f64) -> Option<f64> {
    if v > 0.0 {
        Some((extent - radius - x) / v)
    } else if v < 0.0 {
        Some((x - radius) / -v)
    } else {
        None
    }
}

/// Time until `p` hits the nearest wall of the `width` × `height` box on its path.
///
/// Both axes are solved independently and the earlier one wins. A disk already
/// past the wall it is heading for yields a negative time.
pub fn time_to_hit_wall(p: &Particle, width: f64, height: f64, radius: f64) -> Option<f64> {
    let tx = axis_time(p.r[0], p.v[0], width, radius);
    let ty = axis_time(p.r[1], p.v[1], height, radius);
    let t = match (tx, ty) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    t.filter(|t| t.is_finite())
}
