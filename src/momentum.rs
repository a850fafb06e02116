//! Cartesian 4-momenta, built from the (pt, η, φ, m) coordinates that
//! collider event formats store.

use crate::{geometry, numeric::Float};
use nalgebra::SVector;
use prefix_num_ops::real::*;

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum
pub type Momentum = SVector<Float, MOMENTUM_DIM>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Build a 4-momentum from transverse momentum, pseudorapidity, azimuth
/// and mass
pub fn from_pt_eta_phi_m(pt: Float, eta: Float, phi: Float, mass: Float) -> Momentum {
    let px = pt * phi.cos();
    let py = pt * phi.sin();
    let pz = pt * eta.sinh();
    let e = sqrt(px * px + py * py + pz * pz + mass * mass);
    Momentum::new(px, py, pz, e)
}

/// Transverse momentum
pub fn pt(p: &Momentum) -> Float {
    p[X].hypot(p[Y])
}

/// Pseudorapidity
///
/// Directions along the beam axis (zero pt) map to ±∞ like in the usual
/// event formats.
///
pub fn eta(p: &Momentum) -> Float {
    let pt = pt(p);
    if pt == 0. {
        if p[Z] >= 0. {
            Float::INFINITY
        } else {
            Float::NEG_INFINITY
        }
    } else {
        (p[Z] / pt).asinh()
    }
}

/// Azimuthal angle in (-π, π]
pub fn phi(p: &Momentum) -> Float {
    p[Y].atan2(p[X])
}

/// Angular separation of two momenta in the (η, φ) plane
pub fn delta_r(p1: &Momentum, p2: &Momentum) -> Float {
    geometry::delta_r(eta(p1), phi(p1), eta(p2), phi(p2))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: Float = 1e-4;

    #[test]
    fn coordinates_survive_the_cartesian_detour() {
        let p = from_pt_eta_phi_m(250., -1.2, 2.8, 80.4);
        assert!(abs(pt(&p) - 250.) < TOLERANCE * 250.);
        assert!(abs(eta(&p) + 1.2) < TOLERANCE);
        assert!(abs(phi(&p) - 2.8) < TOLERANCE);
        let m2 = p[E] * p[E] - p[X] * p[X] - p[Y] * p[Y] - p[Z] * p[Z];
        assert!(abs(sqrt(m2) - 80.4) < 1e-2);
    }

    #[test]
    fn beam_axis_has_infinite_eta() {
        assert_eq!(eta(&Momentum::new(0., 0., 10., 10.)), Float::INFINITY);
        assert_eq!(eta(&Momentum::new(0., 0., -10., 10.)), Float::NEG_INFINITY);
    }

    #[test]
    fn delta_r_matches_the_angular_formula() {
        let p1 = from_pt_eta_phi_m(100., 0.5, 3.0, 0.);
        let p2 = from_pt_eta_phi_m(40., 0.2, -2.9, 4.7);
        let expected = geometry::delta_r(0.5, 3.0, 0.2, -2.9);
        assert!(abs(delta_r(&p1, &p2) - expected) < TOLERANCE);
    }
}
