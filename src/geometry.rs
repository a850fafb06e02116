//! Angular distances in the (η, φ) plane

use crate::numeric::{
    floats::consts::{PI, TAU},
    Float,
};
use prefix_num_ops::real::*;

/// Absolute azimuthal separation of two directions, wrapped to [0, π]
///
/// Inputs are not required to be normalized to (-π, π]: any multiple of 2π
/// separating them is folded away before the reflection above π.
///
pub fn delta_phi(phi1: Float, phi2: Float) -> Float {
    let d_phi = abs(phi1 - phi2) % TAU;
    if d_phi > PI {
        TAU - d_phi
    } else {
        d_phi
    }
}

/// Squared angular separation Δη² + Δφ²
///
/// Matching loops compare this against ΔR² to avoid a square root per pair.
///
pub fn delta_r2(eta1: Float, phi1: Float, eta2: Float, phi2: Float) -> Float {
    let d_eta = eta1 - eta2;
    let d_phi = delta_phi(phi1, phi2);
    d_eta * d_eta + d_phi * d_phi
}

/// Angular separation ΔR = √(Δη² + Δφ²)
pub fn delta_r(eta1: Float, phi1: Float, eta2: Float, phi2: Float) -> Float {
    sqrt(delta_r2(eta1, phi1, eta2, phi2))
}
