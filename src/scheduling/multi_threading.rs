//! Multi-threaded back-end of the selection

use crate::{
    event::Event,
    scheduling::EVENT_BATCH_SIZE,
    selection::{EventSelector, SelectedEvent},
    Result,
};

use rayon::prelude::*;

/// Select events in multi-threaded mode
///
/// Each batch of events is processed by one rayon task. Batch results are
/// collected in batch order, so the output does not depend on scheduling.
///
pub fn run_selection_impl(events: &[Event], selector: &EventSelector) -> Result<Vec<SelectedEvent>> {
    let batches = events
        .par_chunks(EVENT_BATCH_SIZE)
        .enumerate()
        .map(|(batch_idx, batch)| -> Result<Vec<SelectedEvent>> {
            let first_event = batch_idx * EVENT_BATCH_SIZE;
            let mut selected = Vec::new();
            for (offset, event) in batch.iter().enumerate() {
                selected.extend(selector.process(first_event + offset, event)?);
            }
            Ok(selected)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(batches.into_iter().flatten().collect())
}
