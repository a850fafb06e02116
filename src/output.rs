//! This module is in charge of writing the selection results to disk

use crate::{
    config::Configuration,
    indices::IndexSet,
    numeric::Float,
    selection::{RunSummary, SelectedEvent},
    topcat::TopCategory,
    Result,
};

use eyre::WrapErr;
use time::{macros::format_description, OffsetDateTime};

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    time::Duration,
};

/// Timestamp of the current time, for file headers
pub fn timestamp() -> Result<String> {
    let format = format_description!("[day]-[month repr:short]-[year repr:last_two]   [hour]:[minute]:[second]");
    OffsetDateTime::now_utc()
        .format(&format)
        .wrap_err("Failed to format the current time")
}

/// Write the selection results to a file
pub fn dump_results(
    path: impl AsRef<Path>,
    cfg: &Configuration,
    summary: &RunSummary,
    selected: &[SelectedEvent],
    elapsed_time: Duration,
) -> Result<()> {
    let path = path.as_ref();
    let timestamp = timestamp()?;
    let write = || -> io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        write_results(&mut file, &timestamp, cfg, summary, selected, elapsed_time)?;
        file.flush()
    };
    write().wrap_err_with(|| format!("Failed to write results to {}", path.display()))
}

/// Write the selection results in text form
pub fn write_results(
    out: &mut impl Write,
    timestamp: &str,
    cfg: &Configuration,
    summary: &RunSummary,
    selected: &[SelectedEvent],
    elapsed_time: Duration,
) -> io::Result<()> {
    // Run description
    writeln_kv(out, "Date", timestamp)?;
    writeln_kv(out, "Process", cfg.process)?;
    writeln_kv(out, "Cut on jet pt (GeV)", cfg.jet_cut.pt_min)?;
    writeln_kv(out, "Cut on jet |eta|", cfg.jet_cut.abs_eta_max)?;
    writeln_kv(out, "Cut on jet softdrop mass (GeV)", cfg.jet_cut.mass_min)?;
    writeln_kv(out, "Gen-matching radius", cfg.delta_r_max)?;
    writeln_kv(out, "Jets kept per event", cfg.max_jets)?;
    writeln_kv(out, "Cut on PF candidate pt (GeV)", cfg.pfcand_min_pt)?;
    writeln_kv(out, "Flat mass spectrum", cfg.flat_mass)?;
    writeln!(out, " ---------------------------------------------")?;

    // Run outcome
    writeln_kv(out, "Events read", summary.events_read)?;
    writeln_kv(out, "Events kept", summary.events_kept)?;
    writeln_kv(out, "Jets kept", summary.jets_kept)?;
    for category in TopCategory::ALL {
        let count = summary.top_categories[category.label() as usize];
        writeln_kv(out, &format!("Top jets ({})", category.name()), count)?;
    }
    writeln_kv(
        out,
        "Events with unassigned PF cands",
        summary.incomplete_pf_cand_jets,
    )?;
    let elapsed_secs = elapsed_time.as_secs_f64() as Float;
    writeln_kv(out, "Elapsed time (s)", elapsed_secs)?;
    if summary.events_read > 0 {
        let secs_per_ev = elapsed_secs / summary.events_read as Float;
        writeln_kv(out, "Elapsed time per event (s)", secs_per_ev)?;
    }
    writeln!(out, " ---------------------------------------------")?;

    // Per-event selection, one line per event
    writeln!(out, "# event\tjets\ttop_cat\tpfcands\tpfcand_jet")?;
    for event in selected {
        let labels = match &event.top_categories {
            Some(categories) => join(categories.iter().map(|cat| cat.label())),
            None => "-".to_owned(),
        };
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            event.event_idx,
            join_indices(&event.jets),
            labels,
            join_indices(&event.pf_cands),
            join_indices(&event.pf_cand_jets),
        )?;
    }
    Ok(())
}

/// Key-value output that uses fixed-size columns for better readability
fn writeln_kv(out: &mut impl Write, key: &str, value: impl std::fmt::Display) -> io::Result<()> {
    writeln!(out, " {:<31}: {}", key, value)
}

/// Comma-separated list of an index set, or "-" if it is empty
fn join_indices(indices: &IndexSet) -> String {
    join(indices.iter())
}

/// Comma-separated list of displayable items, or "-" if there are none
fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    let joined = items.map(|item| item.to_string()).collect::<Vec<_>>().join(",");
    if joined.is_empty() {
        "-".to_owned()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_layout() {
        let cfg = Configuration::default();
        let selected = vec![
            SelectedEvent {
                event_idx: 4,
                jets: vec![0, 2],
                top_categories: Some(vec![TopCategory::Bqq, TopCategory::Other]),
                pf_cands: vec![7, 8],
                pf_cand_jets: vec![0, 1],
            },
            SelectedEvent {
                event_idx: 9,
                jets: vec![1],
                ..SelectedEvent::default()
            },
        ];
        let summary = RunSummary::new(12, &selected);
        let mut buffer = Vec::new();
        write_results(
            &mut buffer,
            "19-Oct-26   12:00:00",
            &cfg,
            &summary,
            &selected,
            Duration::from_millis(1200),
        )
        .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains(" Events read                    : 12\n"), "{}", text);
        assert!(text.contains(" Top jets (bqq)                 : 1\n"), "{}", text);
        assert!(text.contains("\n4\t0,2\t3,0\t7,8\t0,1\n"), "{}", text);
        assert!(text.ends_with("\n9\t1\t-\t-\t-\n"), "{}", text);
    }

    #[test]
    fn timestamps_are_formatted() {
        let stamp = timestamp().unwrap();
        assert_eq!(stamp.len(), "19-Oct-26   12:00:00".len(), "{}", stamp);
    }
}
