//! This module takes care of scheduling the selection work, encapsulating use
//! of multiple threads

#[cfg(feature = "multi-threading")]
mod multi_threading;
#[cfg(not(feature = "multi-threading"))]
mod sequential;

use crate::{
    event::Event,
    selection::{EventSelector, FlatMassSelector, SelectedEvent},
    Result,
};

/// Size of the event batches handed out to worker threads
///
/// Per-event work is a few microseconds, so events are grouped to keep
/// scheduling overhead low.
///
const EVENT_BATCH_SIZE: usize = 1_000;

/// Run the stateless selection over all events, in the manner that was
/// configured at build time
///
/// Selected events are returned in input order either way.
///
pub fn run_selection(events: &[Event], selector: &EventSelector) -> Result<Vec<SelectedEvent>> {
    // ...in sequential mode
    #[cfg(not(feature = "multi-threading"))]
    {
        sequential::run_selection_impl(events, selector)
    }

    // ...in multi-threaded mode
    #[cfg(feature = "multi-threading")]
    {
        multi_threading::run_selection_impl(events, selector)
    }
}

/// Run the flat-mass selection over all events
///
/// The mass flattener's decisions depend on all earlier ones, so this
/// always runs sequentially, in input order.
///
pub fn run_flat_mass_selection(
    events: &[Event],
    selector: &mut FlatMassSelector,
) -> Result<Vec<SelectedEvent>> {
    let mut selected = Vec::new();
    for (event_idx, event) in events.iter().enumerate() {
        selected.extend(selector.process(event_idx, event)?);
    }
    Ok(selected)
}
