//! Matching of reconstructed jets to generator-level particles

use crate::{
    event::{ensure_same_len, GenParticles},
    geometry::delta_r2,
    indices::IndexSet,
    momentum::{self, Momentum},
    numeric::Float,
    Result,
};
use eyre::ensure;

/// Last-copy generator particles whose |pdgId| is in `match_ids`, with
/// near-duplicates removed
///
/// Particles are accepted greedily in input order. A candidate lying within
/// `dr` of an already accepted particle is dropped. Per-event particle counts
/// are small, so the quadratic scan is fine.
///
pub fn isolated_gen_coords(
    gen: &GenParticles,
    match_ids: &[i32],
    dr: Float,
) -> Result<Vec<(Float, Float)>> {
    gen.check()?;
    let dr2 = dr * dr;
    let mut isolated = Vec::<(Float, Float)>::new();
    for idx in 0..gen.len() {
        let abs_id = gen.pdg_id[idx].unsigned_abs();
        if !gen.is_last_copy(idx) || !match_ids.iter().any(|id| id.unsigned_abs() == abs_id) {
            continue;
        }
        let (eta, phi) = (gen.eta[idx], gen.phi[idx]);
        let is_isolated = isolated
            .iter()
            .all(|&(iso_eta, iso_phi)| delta_r2(eta, phi, iso_eta, iso_phi) >= dr2);
        if is_isolated {
            isolated.push((eta, phi));
        }
    }
    Ok(isolated)
}

/// Indices of the jets lying within `dr` of a last-copy generator particle
/// whose |pdgId| is in `match_ids`
///
/// Jets are reported in input order, each at most once.
///
pub fn gen_match_select_jets(
    jet_eta: &[Float],
    jet_phi: &[Float],
    gen: &GenParticles,
    match_ids: &[i32],
    dr: Float,
) -> Result<IndexSet> {
    ensure_same_len("jet", &[("eta", jet_eta.len()), ("phi", jet_phi.len())])?;
    let dr2 = dr * dr;
    let targets = isolated_gen_coords(gen, match_ids, dr)?;
    Ok(jet_eta
        .iter()
        .zip(jet_phi)
        .enumerate()
        .filter(|&(_, (&j_eta, &j_phi))| {
            targets
                .iter()
                .any(|&(g_eta, g_phi)| delta_r2(j_eta, j_phi, g_eta, g_phi) < dr2)
        })
        .map(|(idx, _)| idx)
        .collect())
}

/// Truth that a last-copy generator particle with exactly this (signed)
/// `pdg_id` lies within `dr` of `jet`
///
/// `gen_momenta` holds the 4-momentum of each generator particle.
///
pub fn jet_matching_to_pdg_id(
    gen: &GenParticles,
    gen_momenta: &[Momentum],
    jet: &Momentum,
    pdg_id: i32,
    dr: Float,
) -> Result<bool> {
    gen.check()?;
    ensure!(
        gen_momenta.len() == gen.len(),
        "Got {} generator momenta for {} generator particles",
        gen_momenta.len(),
        gen.len()
    );
    Ok((0..gen.len()).any(|idx| {
        gen.is_last_copy(idx)
            && gen.pdg_id[idx] == pdg_id
            && momentum::delta_r(&gen_momenta[idx], jet) < dr
    }))
}
