//! Association of particle-flow candidates to selected jets

use crate::{event::PfCandEdges, indices::IndexSet, numeric::Float, Result};

/// Candidates belonging to one of the `selected_jets`, with pt above
/// `min_pt`, in edge order
///
/// Only a handful of jets are ever selected, so membership is tested by a
/// linear scan rather than through a hash set.
///
pub fn pf_cand_indices_for_jets(
    edges: &PfCandEdges,
    selected_jets: &[usize],
    min_pt: Float,
) -> Result<IndexSet> {
    edges.check()?;
    Ok((0..edges.len())
        .filter(|&edge| selected_jets.contains(&edges.jet_idx[edge]) && edges.pt[edge] > min_pt)
        .map(|edge| edges.cand_idx[edge])
        .collect())
}

/// Position inside `selected_jets` of the jet owning each selected candidate
///
/// The owner of a candidate is given by the first edge that mentions it.
/// Candidates whose owner is not selected, or which have no edge at all, are
/// skipped without leaving a placeholder, so the output may be shorter than
/// `selected_cands`. Callers must check the lengths before pairing both up.
///
pub fn jet_match_index_for_pf_cands(
    edges: &PfCandEdges,
    selected_jets: &[usize],
    selected_cands: &[usize],
) -> Result<IndexSet> {
    edges.check()?;
    Ok(selected_cands
        .iter()
        .filter_map(|cand| {
            let edge = edges.cand_idx.iter().position(|c| c == cand)?;
            let jet = edges.jet_idx[edge];
            selected_jets.iter().position(|&sel| sel == jet)
        })
        .collect())
}
