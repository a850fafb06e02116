//! Jet labels: selection and truth labeling of large-radius jets
//!
//!
//! # Introduction (for the physicist)
//!
//! Training a jet tagger on simulation requires knowing what each jet is.
//! This crate selects large-radius jets from collision events and labels
//! them using generator truth: jets are matched to the generator particle of
//! interest (W, Z, Higgs, dark hadrons...), and top quark jets are sorted by
//! how much of the t → bqq' decay they contain.
//!
//! For background samples, the jet mass spectrum can be flattened so that a
//! tagger trained on them does not learn the spectrum's shape.
//!
//!
//! # Introduction (for the computer guy)
//!
//! Events come in the struct-of-arrays layout of collider event formats: one
//! array per property, objects designated by their index. The selection
//! steps are small functions from these arrays to index sets:
//!
//! * kinematic cuts produce the indices of jets passing thresholds,
//! * generator matching produces the indices of jets near a truth particle,
//! * ancestry checks label jets from top decays,
//! * PF candidate association maps jet constituents to selected jets,
//! * mass flattening down-samples jets, remembering what it kept so far.
//!
//! Only the last step carries state across events. Everything else may run
//! on events in any order, which the `multi-threading` feature exploits.

#![warn(missing_docs)]

pub mod config;
pub mod evcut;
pub mod event;
pub mod flatmass;
pub mod genmatch;
pub mod geometry;
pub mod indices;
pub mod input;
pub mod momentum;
pub mod numeric;
pub mod output;
pub mod pfcands;
pub mod process;
pub mod scheduling;
pub mod selection;
pub mod topcat;

/// We'll use eyre's type-erased result type throughout the crate
pub type Result<T> = eyre::Result<T>;
