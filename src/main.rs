//! Command-line driver: select and label the jets of an event dump
//!
//! Usage: jet_labels [config [events [results [histogram]]]]

use eyre::WrapErr;

use jet_labels::{
    config::{BinCap, Configuration},
    flatmass, input, output, scheduling,
    selection::{EventSelector, FlatMassSelector, RunSummary},
    Result,
};

use std::{env, time::Instant};

/// Default input and output paths, in command-line argument order
const DEFAULT_PATHS: [&str; 4] = [
    "selection.cfg",
    "events.txt",
    "selected_jets.txt",
    "mass_histogram.txt",
];

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    // ### CONFIGURATION READOUT ###

    let mut args = env::args().skip(1);
    let [cfg_path, events_path, results_path, histogram_path] =
        DEFAULT_PATHS.map(|default| args.next().unwrap_or_else(|| default.to_owned()));

    let cfg = Configuration::load(&cfg_path).wrap_err("Failed to load the configuration")?;
    let events = input::load_events(&events_path).wrap_err("Failed to load the events")?;
    println!("Loaded {} events from {}", events.len(), events_path);

    // Start the clock after I/O, to avoid IO-induced timing fluctuations
    let saved_time = Instant::now();

    // ### SELECTION ###

    let selected = if cfg.flat_mass {
        let max_per_bin = match cfg.max_per_bin {
            BinCap::Fixed(cap) => cap,
            BinCap::Auto => {
                let cap = flatmass::reference_bin_count(events.iter().map(|ev| &ev.jets), &cfg.jet_cut)?;
                println!("Jet count in 245-250 GeV mSD bin: {}", cap);
                cap
            }
        };
        let mut selector = FlatMassSelector::new(&cfg, max_per_bin)?;
        let selected = scheduling::run_flat_mass_selection(&events, &mut selector)?;
        selector.flattener().save_histogram(&histogram_path)?;
        println!("Mass histogram saved to {}", histogram_path);
        selected
    } else {
        scheduling::run_selection(&events, &EventSelector::new(&cfg))?
    };

    let elapsed_time = saved_time.elapsed();

    // ### RESULTS DISPLAY AND STORAGE ###

    let summary = RunSummary::new(events.len(), &selected);
    summary.print();
    output::dump_results(&results_path, &cfg, &summary, &selected, elapsed_time)
        .wrap_err("Failed to output the results")?;
    println!("Results saved to {}", results_path);

    // ...and we're done
    Ok(())
}
