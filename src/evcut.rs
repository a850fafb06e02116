//! Mechanism to apply kinematic cuts to jets

use crate::{event::ensure_same_len, indices::IndexSet, numeric::Float, Result};
use prefix_num_ops::real::*;

/// Kinematic cuts on jets
///
/// All comparisons are strict: a jet sitting exactly on a threshold fails.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicCut {
    /// Cut on minimum transverse momentum (GeV)
    pub pt_min: Float,

    /// Cut on maximum absolute pseudorapidity
    pub abs_eta_max: Float,

    /// Cut on minimum (softdrop) mass (GeV)
    pub mass_min: Float,
}
//
impl KinematicCut {
    /// Setup the cuts on jets
    pub fn new(pt_min: Float, abs_eta_max: Float, mass_min: Float) -> Self {
        Self {
            pt_min,
            abs_eta_max,
            mass_min,
        }
    }

    /// Decide whether a single jet passes the cuts
    pub fn keep(&self, pt: Float, eta: Float, mass: Float) -> bool {
        pt > self.pt_min && abs(eta) < self.abs_eta_max && mass > self.mass_min
    }

    /// Indices of the jets passing the cuts, in input order
    pub fn select(&self, pt: &[Float], eta: &[Float], mass: &[Float]) -> Result<IndexSet> {
        ensure_same_len(
            "jet",
            &[("pt", pt.len()), ("eta", eta.len()), ("mass", mass.len())],
        )?;
        Ok(pt
            .iter()
            .zip(eta)
            .zip(mass)
            .enumerate()
            .filter(|&(_, ((&pt, &eta), &mass))| self.keep(pt, eta, mass))
            .map(|(idx, _)| idx)
            .collect())
    }
}

/// Indices of the jets with pt > pt_cut, |η| < eta_cut and mass > mass_cut
pub fn select_jets(
    pt: &[Float],
    eta: &[Float],
    mass: &[Float],
    pt_cut: Float,
    eta_cut: Float,
    mass_cut: Float,
) -> Result<IndexSet> {
    KinematicCut::new(pt_cut, eta_cut, mass_cut).select(pt, eta, mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_are_strict() {
        let cut = KinematicCut::new(170., 2.4, 40.);
        assert!(cut.keep(170.1, -2.39, 40.1));
        assert!(!cut.keep(170., 0., 100.));
        assert!(!cut.keep(300., 2.4, 100.));
        assert!(!cut.keep(300., -2.4, 100.));
        assert!(!cut.keep(300., 0., 40.));
        assert!(!cut.keep(Float::NAN, 0., 100.));
    }

    #[test]
    fn selection_preserves_order() {
        let pt = [500., 100., 300., 200.];
        let eta = [0.1, 0.2, -3.0, 1.0];
        let mass = [80., 90., 100., 30.];
        let selected = select_jets(&pt, &eta, &mass, 150., 2.4, 40.).unwrap();
        assert_eq!(selected, vec![0]);
        let selected = select_jets(&pt, &eta, &mass, 50., 5., 20.).unwrap();
        assert_eq!(selected, vec![0, 1, 2, 3]);
        assert!(select_jets(&[], &[], &[], 0., 1., 0.).unwrap().is_empty());
    }

    #[test]
    fn selection_is_idempotent() {
        let cut = KinematicCut::new(170., 2.4, 40.);
        let pt = [180., 171., 600., 150., 250.];
        let eta = [2.0, -0.5, 2.5, 0.0, -2.3];
        let mass = [45., 140., 170., 90., 39.];
        let first = cut.select(&pt, &eta, &mass).unwrap();
        let take = |v: &[Float]| first.iter().map(|&i| v[i]).collect::<Vec<_>>();
        let second = cut.select(&take(&pt), &take(&eta), &take(&mass)).unwrap();
        assert_eq!(second, (0..first.len()).collect::<Vec<_>>());
    }

    #[test]
    fn mismatched_lengths_are_errors() {
        assert!(select_jets(&[1.], &[0., 0.], &[50.], 0., 1., 0.).is_err());
    }
}
