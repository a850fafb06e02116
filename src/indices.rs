//! Manipulation of selection index sets
//!
//! A selection index set is an ordered list of positions into a parent
//! collection. Order matters: the position of an index inside the set is the
//! object's index in the reduced collection.

use crate::numeric::Float;
use std::collections::HashSet;

/// Ordered list of indices into a parent collection
pub type IndexSet = Vec<usize>;

/// Indices of `a` that also appear in `b`, in the order of `a`
pub fn intersect_indices(a: &[usize], b: &[usize]) -> IndexSet {
    let b_set = b.iter().copied().collect::<HashSet<_>>();
    a.iter().copied().filter(|idx| b_set.contains(idx)).collect()
}

/// Keep at most the first `max_len` indices
pub fn truncate_indices(indices: &[usize], max_len: usize) -> IndexSet {
    indices[..indices.len().min(max_len)].to_vec()
}

/// Per-jet hidden-neuron vector at `index`
///
/// Any index that does not designate a jet, negative ones included, yields
/// an empty vector.
///
pub fn neuron_vector_by_index(all_neurons: &[Vec<Float>], index: isize) -> &[Float] {
    usize::try_from(index)
        .ok()
        .and_then(|idx| all_neurons.get(idx))
        .map(Vec::as_slice)
        .unwrap_or_default()
}
