//! Classification of jets from hadronic top decays, based on generator
//! ancestry
//!
//! A t → bW → bqq' decay may end up fully merged inside one large-radius jet,
//! partially merged, or spread across several jets. We find out which by
//! looking at which decay products (and their mothers) fall inside the jet
//! cone.

use crate::{
    event::{ensure_same_len, GenParticles},
    geometry::delta_r,
    numeric::Float,
    Result,
};

/// Jet cone radius used for ancestry checks
pub const JET_RADIUS: Float = 0.8;

/// PDG identifier of the b quark
const PDG_B: u32 = 5;

/// PDG identifier of the top quark
const PDG_TOP: u32 = 6;

/// PDG identifier of the W boson
const PDG_W: u32 = 24;

/// Label of jets which were never classified
pub const UNCLASSIFIED: i32 = -1;

/// Decay-product content of a jet
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TopCategory {
    /// No identifiable top decay content
    Other = 0,

    /// Both quarks from the W decay, without the b
    Qq = 1,

    /// The b and one quark from the W decay
    Bq = 2,

    /// Fully merged top decay: the b and both quarks from the W decay
    Bqq = 3,
}
//
impl TopCategory {
    /// All categories, in label order
    pub const ALL: [TopCategory; 4] = [Self::Other, Self::Qq, Self::Bq, Self::Bqq];

    /// Integer label, as stored in output files
    pub fn label(self) -> i32 {
        self as i32
    }

    /// Short human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Qq => "qq",
            Self::Bq => "bq",
            Self::Bqq => "bqq",
        }
    }
}

/// Jet direction, against which decay products are tested
#[derive(Clone, Copy, Debug)]
struct JetAxis {
    eta: Float,
    phi: Float,
}
//
impl JetAxis {
    /// Truth that generator particle `idx` lies inside the jet cone
    fn contains(&self, gen: &GenParticles, idx: usize) -> bool {
        delta_r(gen.eta[idx], gen.phi[idx], self.eta, self.phi) < JET_RADIUS
    }
}

/// Truth that a light quark (d, u, s, c, b) is designated by this pdgId
fn is_light_quark(pdg_id: i32) -> bool {
    let abs_id = pdg_id.unsigned_abs();
    abs_id > 0 && abs_id < 6
}

/// Particles which have a resolvable mother, along with that mother
fn with_mothers(gen: &GenParticles) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..gen.len()).filter_map(move |idx| gen.mother_of(idx).map(|mother| (idx, mother)))
}

/// Truth that a b quark from a top decay lies inside the jet
fn b_from_top_in_jet(jet: JetAxis, gen: &GenParticles) -> bool {
    with_mothers(gen).any(|(idx, mother)| {
        gen.pdg_id[idx].unsigned_abs() == PDG_B
            && gen.pdg_id[mother].unsigned_abs() == PDG_TOP
            && jet.contains(gen, idx)
    })
}

/// Truth that a b quark from a top decay and that top both lie inside the
/// jet
fn b_from_top_both_in_jet(jet: JetAxis, gen: &GenParticles) -> bool {
    with_mothers(gen).any(|(idx, mother)| {
        gen.pdg_id[idx].unsigned_abs() == PDG_B
            && gen.pdg_id[mother].unsigned_abs() == PDG_TOP
            && jet.contains(gen, idx)
            && jet.contains(gen, mother)
    })
}

/// Truth that a light quark from a W decay lies inside the jet
fn q_from_w_in_jet(jet: JetAxis, gen: &GenParticles) -> bool {
    with_mothers(gen).any(|(idx, mother)| {
        is_light_quark(gen.pdg_id[idx])
            && gen.pdg_id[mother].unsigned_abs() == PDG_W
            && jet.contains(gen, idx)
    })
}

/// Truth that both quarks from a W decay lie inside the jet, along with
/// their W mother
fn qq_from_w_all_in_jet(jet: JetAxis, gen: &GenParticles) -> bool {
    let num_quarks = with_mothers(gen)
        .filter(|&(idx, mother)| {
            is_light_quark(gen.pdg_id[idx])
                && gen.pdg_id[mother].unsigned_abs() == PDG_W
                && jet.contains(gen, idx)
                && jet.contains(gen, mother)
        })
        .count();
    num_quarks > 1
}

/// Classify one jet, given its direction, from generator truth
pub fn classify_probe_jet(
    jet_eta: Float,
    jet_phi: Float,
    gen: &GenParticles,
) -> Result<TopCategory> {
    gen.check()?;
    let jet = JetAxis {
        eta: jet_eta,
        phi: jet_phi,
    };
    Ok(classify_axis(jet, gen))
}

/// Decision tree over the four ancestry checks, on a checked particle list
fn classify_axis(jet: JetAxis, gen: &GenParticles) -> TopCategory {
    let b_in_jet = b_from_top_in_jet(jet, gen);
    let b_and_top_in_jet = b_from_top_both_in_jet(jet, gen);
    let q_in_jet = q_from_w_in_jet(jet, gen);
    let qq_in_jet = qq_from_w_all_in_jet(jet, gen);

    if b_and_top_in_jet && qq_in_jet {
        TopCategory::Bqq
    } else if b_in_jet && q_in_jet {
        TopCategory::Bq
    } else if qq_in_jet {
        TopCategory::Qq
    } else {
        TopCategory::Other
    }
}

/// Classify the jets listed in `selected_jets`
///
/// The output has one slot per jet. Jets which are not selected are never
/// looked at and stay `None`, as do selected indices which do not designate
/// a jet.
///
pub fn classify_top_jets(
    jet_eta: &[Float],
    jet_phi: &[Float],
    selected_jets: &[usize],
    gen: &GenParticles,
) -> Result<Vec<Option<TopCategory>>> {
    ensure_same_len("jet", &[("eta", jet_eta.len()), ("phi", jet_phi.len())])?;
    gen.check()?;
    let num_jets = jet_eta.len();
    let mut categories = vec![None; num_jets];
    for &jet_idx in selected_jets.iter().filter(|&&idx| idx < num_jets) {
        let jet = JetAxis {
            eta: jet_eta[jet_idx],
            phi: jet_phi[jet_idx],
        };
        categories[jet_idx] = Some(classify_axis(jet, gen));
    }
    Ok(categories)
}

/// Integer labels of classification results, with unclassified jets
/// labeled as UNCLASSIFIED
pub fn top_category_labels(categories: &[Option<TopCategory>]) -> Vec<i32> {
    categories
        .iter()
        .map(|cat| cat.map_or(UNCLASSIFIED, TopCategory::label))
        .collect()
}
