//! Per-event jet selection and labeling, as run over a dataset

use crate::{
    config::Configuration,
    event::Event,
    evcut::KinematicCut,
    flatmass::MassFlattener,
    genmatch::gen_match_select_jets,
    indices::{intersect_indices, truncate_indices, IndexSet},
    numeric::Float,
    pfcands::{jet_match_index_for_pf_cands, pf_cand_indices_for_jets},
    process::Process,
    topcat::{classify_top_jets, TopCategory},
    Result,
};

/// Selection results for one event that passed the selection
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectedEvent {
    /// Position of the event in the input
    pub event_idx: usize,

    /// Indices of the kept jets
    pub jets: IndexSet,

    /// Top decay category of each kept jet, for top datasets
    pub top_categories: Option<Vec<TopCategory>>,

    /// Indices of the PF candidates associated to the kept jets
    pub pf_cands: IndexSet,

    /// Position inside `jets` of the jet owning each PF candidate
    pub pf_cand_jets: IndexSet,
}
//
impl SelectedEvent {
    /// Truth that every selected PF candidate got a jet assigned
    pub fn pf_cand_jets_complete(&self) -> bool {
        self.pf_cands.len() == self.pf_cand_jets.len()
    }
}

/// Cheap event-level cut applied before any jet selection: there must be a
/// jet, and the leading one must pass the pt cut
///
/// Jets are pt-ordered, so failing events cannot have any selected jet.
///
pub fn preselect(event: &Event, cut: &KinematicCut) -> bool {
    event.jets.pt.first().map_or(false, |&pt| pt > cut.pt_min)
}

/// Stateless jet selection, which may process events in any order
#[derive(Clone, Debug)]
pub struct EventSelector {
    process: Process,
    jet_cut: KinematicCut,
    delta_r_max: Float,
    max_jets: usize,
    pfcand_min_pt: Float,
}
//
impl EventSelector {
    /// Set up the selection described by the configuration
    pub fn new(cfg: &Configuration) -> Self {
        Self {
            process: cfg.process,
            jet_cut: cfg.jet_cut,
            delta_r_max: cfg.delta_r_max,
            max_jets: cfg.max_jets,
            pfcand_min_pt: cfg.pfcand_min_pt,
        }
    }

    /// Indices of the jets passing the selection, before truncation
    pub fn select_jets(&self, event: &Event) -> Result<IndexSet> {
        let jets = &event.jets;
        let kinematic = self.jet_cut.select(&jets.pt, &jets.eta, &jets.msoftdrop)?;
        match self.process.match_pdg_ids() {
            Some(match_ids) => {
                let matched = gen_match_select_jets(
                    &jets.eta,
                    &jets.phi,
                    &event.gen,
                    match_ids,
                    self.delta_r_max,
                )?;
                Ok(intersect_indices(&matched, &kinematic))
            }
            None => Ok(kinematic),
        }
    }

    /// Run the full selection on one event
    ///
    /// Returns None if the event is rejected.
    ///
    pub fn process(&self, event_idx: usize, event: &Event) -> Result<Option<SelectedEvent>> {
        if !preselect(event, &self.jet_cut) {
            return Ok(None);
        }
        let selected = self.select_jets(event)?;
        if selected.is_empty() {
            return Ok(None);
        }
        let jets = truncate_indices(&selected, self.max_jets);
        label_event(self.process, self.pfcand_min_pt, event_idx, event, jets).map(Some)
    }
}

/// Attach truth labels and constituents to the kept jets of an event
fn label_event(
    process: Process,
    pfcand_min_pt: Float,
    event_idx: usize,
    event: &Event,
    jets: IndexSet,
) -> Result<SelectedEvent> {
    let top_categories = if process.classifies_top_jets() {
        let per_jet = classify_top_jets(&event.jets.eta, &event.jets.phi, &jets, &event.gen)?;
        Some(jets.iter().filter_map(|&idx| per_jet[idx]).collect())
    } else {
        None
    };
    let pf_cands = pf_cand_indices_for_jets(&event.pf_cands, &jets, pfcand_min_pt)?;
    let pf_cand_jets = jet_match_index_for_pf_cands(&event.pf_cands, &jets, &pf_cands)?;
    Ok(SelectedEvent {
        event_idx,
        jets,
        top_categories,
        pf_cands,
        pf_cand_jets,
    })
}

/// Jet selection with a flattened mass spectrum
///
/// Owns the run's mass flattener, so events must go through a single
/// instance, one after the other.
///
#[derive(Debug)]
pub struct FlatMassSelector {
    process: Process,
    jet_cut: KinematicCut,
    pfcand_min_pt: Float,
    max_per_bin: usize,
    flattener: MassFlattener,
}
//
impl FlatMassSelector {
    /// Set up a flat-mass selection with a known per-bin cap
    pub fn new(cfg: &Configuration, max_per_bin: usize) -> Result<Self> {
        Ok(Self {
            process: cfg.process,
            jet_cut: cfg.jet_cut,
            pfcand_min_pt: cfg.pfcand_min_pt,
            max_per_bin,
            flattener: MassFlattener::new(cfg.mass_max)?,
        })
    }

    /// Run the selection on the next event
    ///
    /// Returns None if the event is rejected.
    ///
    pub fn process(&mut self, event_idx: usize, event: &Event) -> Result<Option<SelectedEvent>> {
        if !preselect(event, &self.jet_cut) {
            return Ok(None);
        }
        let jets = &event.jets;
        let selected = self.flattener.select_jets_flat_mass(
            &jets.pt,
            &jets.eta,
            &jets.msoftdrop,
            &self.jet_cut,
            self.max_per_bin,
        )?;
        if selected.is_empty() {
            return Ok(None);
        }
        label_event(self.process, self.pfcand_min_pt, event_idx, event, selected).map(Some)
    }

    /// Mass flattener state
    pub fn flattener(&self) -> &MassFlattener {
        &self.flattener
    }
}

/// Bookkeeping of a selection run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Number of events read
    pub events_read: usize,

    /// Number of events which passed the selection
    pub events_kept: usize,

    /// Number of jets kept
    pub jets_kept: usize,

    /// Number of kept jets in each top decay category, in label order
    pub top_categories: [usize; 4],

    /// Number of events where some PF candidates got no jet assigned
    pub incomplete_pf_cand_jets: usize,
}
//
impl RunSummary {
    /// Summarize the outcome of a selection run
    pub fn new(events_read: usize, selected: &[SelectedEvent]) -> Self {
        let mut summary = Self {
            events_read,
            events_kept: selected.len(),
            ..Self::default()
        };
        for event in selected {
            summary.jets_kept += event.jets.len();
            for &category in event.top_categories.iter().flatten() {
                summary.top_categories[category.label() as usize] += 1;
            }
            if !event.pf_cand_jets_complete() {
                summary.incomplete_pf_cand_jets += 1;
            }
        }
        summary
    }

    /// Display the summary on stdout
    pub fn print(&self) {
        println!("Events read    : {}", self.events_read);
        println!("Events kept    : {}", self.events_kept);
        println!("Jets kept      : {}", self.jets_kept);
        if self.top_categories.iter().any(|&count| count > 0) {
            for category in TopCategory::ALL {
                println!(
                    "  top {:<8} : {}",
                    category.name(),
                    self.top_categories[category.label() as usize]
                );
            }
        }
        if self.incomplete_pf_cand_jets > 0 {
            eprintln!(
                "WARNING: {} events have PF candidates owned by unselected jets",
                self.incomplete_pf_cand_jets
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::BinCap, event::IS_LAST_COPY};

    fn config(process: Process) -> Configuration {
        Configuration {
            process,
            pfcand_min_pt: 1.,
            ..Configuration::default()
        }
    }

    /// Event with a W decay lined up with the second jet
    fn w_event() -> Event {
        let mut event = Event::default();
        event.jets.push(600., 0.5, 1.0, 20.);
        event.jets.push(450., -1.0, -2.0, 85.);
        event.jets.push(300., 2.0, 0.0, 60.);
        event.jets.push(200., 0.0, 3.0, 90.);
        event.gen.push(24, IS_LAST_COPY, -1.1, -2.1, None);
        event.gen.push(24, 0, 2.0, 0.0, None);
        event.pf_cands.push(1, 0, 30.);
        event.pf_cands.push(1, 1, 0.5);
        event.pf_cands.push(2, 2, 10.);
        event
    }

    #[test]
    fn preselection_needs_a_hard_leading_jet() {
        let cut = KinematicCut::new(170., 2.4, 40.);
        assert!(!preselect(&Event::default(), &cut));
        assert!(preselect(&w_event(), &cut));
        let mut soft = w_event();
        soft.jets.pt[0] = 150.;
        assert!(!preselect(&soft, &cut));
    }

    #[test]
    fn gen_matched_selection() {
        let selector = EventSelector::new(&config(Process::Wqq));
        let selected = selector.process(3, &w_event()).unwrap().unwrap();
        assert_eq!(selected.event_idx, 3);
        assert_eq!(selected.jets, vec![1]);
        assert_eq!(selected.top_categories, None);
        assert_eq!(selected.pf_cands, vec![0]);
        assert_eq!(selected.pf_cand_jets, vec![0]);
        assert!(selected.pf_cand_jets_complete());
    }

    #[test]
    fn unmatched_processes_use_kinematics_only() {
        let selector = EventSelector::new(&config(Process::Qcd));
        let selected = selector.process(0, &w_event()).unwrap().unwrap();
        // Three jets pass, the leading two are kept
        assert_eq!(selected.jets, vec![1, 2]);
        assert_eq!(selected.pf_cands, vec![0, 2]);
        assert_eq!(selected.pf_cand_jets, vec![0, 1]);
    }

    #[test]
    fn events_without_selected_jets_are_dropped() {
        let selector = EventSelector::new(&config(Process::Hbb));
        assert_eq!(selector.process(0, &w_event()).unwrap(), None);
    }

    #[test]
    fn ragged_events_are_errors() {
        let mut bad_gen = w_event();
        bad_gen.gen.status_flags.pop();
        let selector = EventSelector::new(&config(Process::Wqq));
        assert!(selector.process(0, &bad_gen).is_err());

        let mut bad_edges = w_event();
        bad_edges.pf_cands.pt.pop();
        let selector = EventSelector::new(&config(Process::Qcd));
        assert!(selector.process(0, &bad_edges).is_err());
    }

    #[test]
    fn top_jets_are_classified() {
        let mut event = Event::default();
        event.jets.push(500., 0., 0., 170.);
        event.jets.push(400., 1.5, 2.5, 80.);
        event.gen.push(6, IS_LAST_COPY, 0., 0., None);
        event.gen.push(5, IS_LAST_COPY, 0.1, 0.1, Some(0));
        event.gen.push(24, IS_LAST_COPY, -0.1, 0., Some(0));
        event.gen.push(1, IS_LAST_COPY, -0.2, 0.1, Some(2));
        event.gen.push(-2, IS_LAST_COPY, 0., -0.2, Some(2));
        let selector = EventSelector::new(&config(Process::TTto4Q));
        let selected = selector.process(0, &event).unwrap().unwrap();
        assert_eq!(selected.jets, vec![0, 1]);
        assert_eq!(
            selected.top_categories,
            Some(vec![TopCategory::Bqq, TopCategory::Other])
        );
    }

    #[test]
    fn flat_mass_selection_caps_bins_across_events() {
        let cfg = Configuration {
            flat_mass: true,
            max_per_bin: BinCap::Fixed(1),
            ..config(Process::Qcd)
        };
        let mut selector = FlatMassSelector::new(&cfg, 1).unwrap();
        let event = w_event();
        let first = selector.process(0, &event).unwrap().unwrap();
        assert_eq!(first.jets, vec![1, 2, 3]);
        assert_eq!(selector.process(1, &event).unwrap(), None);
        assert_eq!(selector.flattener().histogram().entries(), 3);
    }

    #[test]
    fn summary_counts() {
        let selected = vec![
            SelectedEvent {
                jets: vec![0, 1],
                top_categories: Some(vec![TopCategory::Bqq, TopCategory::Qq]),
                pf_cands: vec![4, 5],
                pf_cand_jets: vec![0],
                ..SelectedEvent::default()
            },
            SelectedEvent {
                jets: vec![2],
                top_categories: Some(vec![TopCategory::Bqq]),
                ..SelectedEvent::default()
            },
        ];
        let summary = RunSummary::new(10, &selected);
        assert_eq!(summary.events_read, 10);
        assert_eq!(summary.events_kept, 2);
        assert_eq!(summary.jets_kept, 3);
        assert_eq!(summary.top_categories, [0, 1, 0, 2]);
        assert_eq!(summary.incomplete_pf_cand_jets, 1);
    }
}
