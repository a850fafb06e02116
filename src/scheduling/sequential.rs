//! Sequential back-end of the selection

use crate::{
    event::Event,
    scheduling::EVENT_BATCH_SIZE,
    selection::{EventSelector, SelectedEvent},
    Result,
};

/// Select events in sequential mode
///
/// Events are numbered the same way as in multi-threaded mode. The run stops
/// at the first event which fails, whereas the multi-threaded back-end may
/// report any failing event.
///
pub fn run_selection_impl(events: &[Event], selector: &EventSelector) -> Result<Vec<SelectedEvent>> {
    let mut selected = Vec::new();
    for (batch_idx, batch) in events.chunks(EVENT_BATCH_SIZE).enumerate() {
        let first_event = batch_idx * EVENT_BATCH_SIZE;
        for (offset, event) in batch.iter().enumerate() {
            selected.extend(selector.process(first_event + offset, event)?);
        }
    }
    Ok(selected)
}
