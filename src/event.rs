//! This module defines the per-event physics objects, stored the way event
//! formats store them: as parallel arrays indexed by object position.

use crate::{numeric::Float, Result};
use eyre::ensure;

/// Bit of the generator status flags marking the last copy of a particle
/// in its decay chain
pub const IS_LAST_COPY: i32 = 1 << 13;

/// Index of a generator particle's mother, if it has one
pub type MotherIndex = Option<usize>;

/// Check that a set of parallel arrays all have the same length
///
/// `what` names the collection for error reporting, `columns` pairs each
/// array's name with its length.
///
pub fn ensure_same_len(what: &str, columns: &[(&str, usize)]) -> Result<()> {
    if let Some(&(first_name, first_len)) = columns.first() {
        for &(name, len) in &columns[1..] {
            ensure!(
                len == first_len,
                "Inconsistent {} arrays: {} has {} entries but {} has {}",
                what,
                first_name,
                first_len,
                name,
                len
            );
        }
    }
    Ok(())
}

/// Reconstructed large-radius jets of one event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Jets {
    /// Transverse momentum (GeV)
    pub pt: Vec<Float>,

    /// Pseudorapidity
    pub eta: Vec<Float>,

    /// Azimuthal angle
    pub phi: Vec<Float>,

    /// Softdrop mass (GeV)
    pub msoftdrop: Vec<Float>,
}
//
impl Jets {
    /// Bundle per-jet arrays, checking that they describe the same jets
    pub fn new(
        pt: Vec<Float>,
        eta: Vec<Float>,
        phi: Vec<Float>,
        msoftdrop: Vec<Float>,
    ) -> Result<Self> {
        ensure_same_len(
            "jet",
            &[
                ("pt", pt.len()),
                ("eta", eta.len()),
                ("phi", phi.len()),
                ("msoftdrop", msoftdrop.len()),
            ],
        )?;
        Ok(Self {
            pt,
            eta,
            phi,
            msoftdrop,
        })
    }

    /// Append one jet
    pub fn push(&mut self, pt: Float, eta: Float, phi: Float, msoftdrop: Float) {
        self.pt.push(pt);
        self.eta.push(eta);
        self.phi.push(phi);
        self.msoftdrop.push(msoftdrop);
    }

    /// Number of jets
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    /// Truth that there are no jets
    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }
}

/// Generator-level particles of one event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenParticles {
    /// PDG particle identifier (signed: antiparticles are negative)
    pub pdg_id: Vec<i32>,

    /// Generator status flags bitmask
    pub status_flags: Vec<i32>,

    /// Pseudorapidity
    pub eta: Vec<Float>,

    /// Azimuthal angle
    pub phi: Vec<Float>,

    /// Mother particle, as an index into these same arrays
    pub mother: Vec<MotherIndex>,
}
//
impl GenParticles {
    /// Bundle per-particle arrays, checking that they have the same length
    pub fn new(
        pdg_id: Vec<i32>,
        status_flags: Vec<i32>,
        eta: Vec<Float>,
        phi: Vec<Float>,
        mother: Vec<MotherIndex>,
    ) -> Result<Self> {
        let gen = Self {
            pdg_id,
            status_flags,
            eta,
            phi,
            mother,
        };
        gen.check()?;
        Ok(gen)
    }

    /// Check that all per-particle arrays have the same length
    ///
    /// Fields are public, so this must hold before any per-particle lookup.
    ///
    pub fn check(&self) -> Result<()> {
        ensure_same_len(
            "generator particle",
            &[
                ("pdgId", self.pdg_id.len()),
                ("statusFlags", self.status_flags.len()),
                ("eta", self.eta.len()),
                ("phi", self.phi.len()),
                ("mother", self.mother.len()),
            ],
        )
    }

    /// Append one particle
    pub fn push(
        &mut self,
        pdg_id: i32,
        status_flags: i32,
        eta: Float,
        phi: Float,
        mother: MotherIndex,
    ) {
        self.pdg_id.push(pdg_id);
        self.status_flags.push(status_flags);
        self.eta.push(eta);
        self.phi.push(phi);
        self.mother.push(mother);
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.pdg_id.len()
    }

    /// Truth that there are no particles
    pub fn is_empty(&self) -> bool {
        self.pdg_id.is_empty()
    }

    /// Truth that particle `idx` is the last copy in its decay chain
    pub fn is_last_copy(&self, idx: usize) -> bool {
        self.status_flags[idx] & IS_LAST_COPY != 0
    }

    /// Resolve the mother of particle `idx`
    ///
    /// Mother indices are not guaranteed to point backwards, or even inside
    /// the particle list. Anything that does not designate an existing
    /// particle is treated as "no mother".
    ///
    pub fn mother_of(&self, idx: usize) -> Option<usize> {
        self.mother[idx].filter(|&mother| mother < self.len())
    }
}

/// Association of particle-flow candidates to the jets that contain them
///
/// Each entry is one (jet, candidate) edge. Edges are not deduplicated and
/// may point to jets that are not part of any selection.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PfCandEdges {
    /// Index of the jet in the event's jet collection
    pub jet_idx: Vec<usize>,

    /// Index of the candidate in the event's PF candidate collection
    pub cand_idx: Vec<usize>,

    /// Transverse momentum of the candidate (GeV)
    pub pt: Vec<Float>,
}
//
impl PfCandEdges {
    /// Bundle per-edge arrays, checking that they have the same length
    pub fn new(jet_idx: Vec<usize>, cand_idx: Vec<usize>, pt: Vec<Float>) -> Result<Self> {
        let edges = Self {
            jet_idx,
            cand_idx,
            pt,
        };
        edges.check()?;
        Ok(edges)
    }

    /// Check that all per-edge arrays have the same length
    pub fn check(&self) -> Result<()> {
        ensure_same_len(
            "PF candidate edge",
            &[
                ("jetIdx", self.jet_idx.len()),
                ("pFCandsIdx", self.cand_idx.len()),
                ("pt", self.pt.len()),
            ],
        )
    }

    /// Append one edge
    pub fn push(&mut self, jet_idx: usize, cand_idx: usize, pt: Float) {
        self.jet_idx.push(jet_idx);
        self.cand_idx.push(cand_idx);
        self.pt.push(pt);
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.jet_idx.len()
    }

    /// Truth that there are no edges
    pub fn is_empty(&self) -> bool {
        self.jet_idx.is_empty()
    }
}

/// Storage for one collision event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    /// Reconstructed jets
    pub jets: Jets,

    /// Generator truth (empty for collision data)
    pub gen: GenParticles,

    /// Jet constituents (may be empty)
    pub pf_cands: PfCandEdges,
}
