//! Mass-flattening jet sampler
//!
//! Training samples drawn from a falling jet mass spectrum teach a tagger the
//! spectrum's shape. The sampler counters this by capping the number of jets
//! accepted in each mass bin over a whole run, which makes the mass
//! distribution of the selected jets flat up to the cap.

use crate::{
    event::{ensure_same_len, Jets},
    evcut::KinematicCut,
    indices::IndexSet,
    numeric::Float,
    output, Result,
};
use eyre::{ensure, eyre, WrapErr};
use num_traits::ToPrimitive;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Default upper edge of the mass histogram (GeV)
pub const DEFAULT_MASS_MAX: Float = 250.;

/// Default mass bin width (GeV)
pub const DEFAULT_BIN_WIDTH: Float = 5.;

/// Number of regular bins of the default histogram
const DEFAULT_NUM_BINS: usize = 50;

/// Upper edge of the histogram used to derive the per-bin cap (GeV)
const REFERENCE_MASS_MAX: Float = 500.;

/// Mass range of the bin whose content gives the per-bin cap (GeV)
const REFERENCE_BIN_RANGE: (Float, Float) = (245., 250.);

/// Histogram of jet masses with fixed-width bins over [0, mass_max)
///
/// Bins are numbered as in common HEP histogramming libraries: bin 0 is the
/// underflow (negative masses), bins 1 to num_bins() cover the range, and
/// bin num_bins() + 1 is the overflow.
///
#[derive(Clone, Debug, PartialEq)]
pub struct MassHistogram {
    /// Upper edge of the last regular bin
    mass_max: Float,

    /// Entries per bin, including underflow and overflow
    counts: Vec<usize>,
}
//
impl MassHistogram {
    /// Set up an empty histogram
    ///
    /// The number of bins is mass_max / bin_width, rounded down. The bins are
    /// then stretched to cover the full range, so picking a mass_max that is
    /// a multiple of the bin width is preferable.
    ///
    pub fn new(mass_max: Float, bin_width: Float) -> Result<Self> {
        ensure!(
            mass_max.is_finite() && mass_max > 0.,
            "Histogram upper edge must be positive and finite, got {}",
            mass_max
        );
        ensure!(bin_width > 0., "Bin width must be positive, got {}", bin_width);
        let num_bins = (mass_max / bin_width)
            .to_usize()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                eyre!(
                    "Cannot fit a {} GeV wide bin below {} GeV",
                    bin_width,
                    mass_max
                )
            })?;
        Ok(Self::with_bins(mass_max, num_bins))
    }

    /// Empty histogram with `num_bins` regular bins over [0, mass_max)
    fn with_bins(mass_max: Float, num_bins: usize) -> Self {
        Self {
            mass_max,
            counts: vec![0; num_bins + 2],
        }
    }

    /// Number of regular bins
    pub fn num_bins(&self) -> usize {
        self.counts.len() - 2
    }

    /// Upper edge of the histogram
    pub fn mass_max(&self) -> Float {
        self.mass_max
    }

    /// Width of each regular bin
    pub fn bin_width(&self) -> Float {
        self.mass_max / self.num_bins() as Float
    }

    /// Index of the overflow bin
    pub fn overflow_bin(&self) -> usize {
        self.num_bins() + 1
    }

    /// Bin where a given mass lands
    pub fn find_bin(&self, mass: Float) -> usize {
        if mass >= self.mass_max {
            self.overflow_bin()
        } else {
            (mass / self.bin_width())
                .floor()
                .to_usize()
                .map_or(0, |bin| (bin + 1).min(self.num_bins()))
        }
    }

    /// Lower and upper edge of a bin
    pub fn bin_edges(&self, bin: usize) -> (Float, Float) {
        let width = self.bin_width();
        if bin == 0 {
            (Float::NEG_INFINITY, 0.)
        } else if bin >= self.overflow_bin() {
            (self.mass_max, Float::INFINITY)
        } else {
            ((bin - 1) as Float * width, bin as Float * width)
        }
    }

    /// Number of entries in a bin
    pub fn bin_content(&self, bin: usize) -> usize {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// Total number of entries, underflow and overflow included
    pub fn entries(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Record one mass
    pub fn fill(&mut self, mass: Float) {
        let bin = self.find_bin(mass);
        self.counts[bin] += 1;
    }

    /// Write the bin edges and contents as text, one bin per line
    pub fn write_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "# Jet Mass Histogram")?;
        writeln!(writer, "# {} bins over [0, {})", self.num_bins(), self.mass_max)?;
        writeln!(writer, "# low high count")?;
        for (bin, count) in self.counts.iter().enumerate() {
            let (low, high) = self.bin_edges(bin);
            writeln!(writer, "{} {} {}", low, high, count)?;
        }
        Ok(())
    }
}

/// Jet selector which flattens the mass spectrum of the selected jets
///
/// A single instance must observe every event of a run, in a single stream:
/// the per-bin cap is only meaningful if each decision sees the counts left
/// by all previous ones.
///
#[derive(Clone, Debug, PartialEq)]
pub struct MassFlattener {
    histogram: MassHistogram,
}
//
impl MassFlattener {
    /// Set up a flattener with 5 GeV bins up to `mass_max`
    pub fn new(mass_max: Float) -> Result<Self> {
        Ok(Self {
            histogram: MassHistogram::new(mass_max, DEFAULT_BIN_WIDTH)?,
        })
    }

    /// Current state of the mass histogram
    pub fn histogram(&self) -> &MassHistogram {
        &self.histogram
    }

    /// Indices of the jets of one event which pass the kinematic cuts and
    /// land in a mass bin that still has room
    ///
    /// Jets above the histogram's upper edge are always accepted: the
    /// spectrum falls steeply there, so they are rare anyway. Every accepted
    /// jet is recorded in the histogram.
    ///
    pub fn select_jets_flat_mass(
        &mut self,
        pt: &[Float],
        eta: &[Float],
        msoftdrop: &[Float],
        cut: &KinematicCut,
        max_per_bin: usize,
    ) -> Result<IndexSet> {
        ensure_same_len(
            "jet",
            &[
                ("pt", pt.len()),
                ("eta", eta.len()),
                ("msoftdrop", msoftdrop.len()),
            ],
        )?;
        let mut selected = IndexSet::new();
        for (idx, ((&pt, &eta), &mass)) in pt.iter().zip(eta).zip(msoftdrop).enumerate() {
            if !cut.keep(pt, eta, mass) {
                continue;
            }
            let bin = self.histogram.find_bin(mass);
            let is_overflow = bin == self.histogram.overflow_bin();
            if !is_overflow && self.histogram.bin_content(bin) >= max_per_bin {
                continue;
            }
            selected.push(idx);
            self.histogram.fill(mass);
        }
        Ok(selected)
    }

    /// Save the mass histogram to a file, keeping the current state
    pub fn save_histogram(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let timestamp = output::timestamp()?;
        let save = || -> std::io::Result<()> {
            let mut file = BufWriter::new(File::create(path)?);
            writeln!(file, "# {}", timestamp)?;
            self.histogram.write_to(&mut file)?;
            file.flush()
        };
        save().wrap_err_with(|| format!("Failed to save the mass histogram to {}", path.display()))
    }
}
//
impl Default for MassFlattener {
    fn default() -> Self {
        Self {
            histogram: MassHistogram::with_bins(DEFAULT_MASS_MAX, DEFAULT_NUM_BINS),
        }
    }
}

/// Derive a per-bin cap from a sample of events
///
/// The softdrop masses of all kinematically selected jets are histogrammed
/// in 5 GeV bins up to 500 GeV, and the content of the 245-250 GeV bin is
/// returned. Capping lighter bins at this count flattens the spectrum up to
/// the default 250 GeV histogram edge.
///
pub fn reference_bin_count<'a>(
    events: impl IntoIterator<Item = &'a Jets>,
    cut: &KinematicCut,
) -> Result<usize> {
    let mut histogram = MassHistogram::new(REFERENCE_MASS_MAX, DEFAULT_BIN_WIDTH)?;
    for jets in events {
        for idx in cut.select(&jets.pt, &jets.eta, &jets.msoftdrop)? {
            histogram.fill(jets.msoftdrop[idx]);
        }
    }
    let (low, high) = REFERENCE_BIN_RANGE;
    Ok((1..=histogram.num_bins())
        .filter(|&bin| {
            let (bin_low, bin_high) = histogram.bin_edges(bin);
            let center = (bin_low + bin_high) / 2.;
            low <= center && center < high
        })
        .map(|bin| histogram.bin_content(bin))
        .last()
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cut() -> KinematicCut {
        KinematicCut::new(170., 2.4, 40.)
    }

    #[test]
    fn binning() {
        let hist = MassHistogram::new(250., 5.).unwrap();
        assert_eq!(hist.num_bins(), 50);
        assert_eq!(hist.find_bin(-1.), 0);
        assert_eq!(hist.find_bin(0.), 1);
        assert_eq!(hist.find_bin(4.99), 1);
        assert_eq!(hist.find_bin(5.), 2);
        assert_eq!(hist.find_bin(249.9), 50);
        assert_eq!(hist.find_bin(250.), 51);
        assert_eq!(hist.find_bin(1e6), 51);
        assert_eq!(hist.bin_edges(2), (5., 10.));
        assert_eq!(hist.bin_edges(51), (250., Float::INFINITY));
        assert_eq!(MassHistogram::new(252., 5.).unwrap().num_bins(), 50);
        assert!(MassHistogram::new(4., 5.).is_err());
        assert!(MassHistogram::new(-250., 5.).is_err());
    }

    #[test]
    fn default_flattener_matches_explicit_construction() {
        assert_eq!(MassFlattener::default(), MassFlattener::new(DEFAULT_MASS_MAX).unwrap());
        let histogram = MassFlattener::default().histogram().clone();
        assert_eq!(histogram.num_bins(), DEFAULT_NUM_BINS);
        assert_eq!(histogram.bin_width(), DEFAULT_BIN_WIDTH);
    }

    #[test]
    fn excess_jets_are_rejected() {
        let mut flattener = MassFlattener::default();
        let max_per_bin = 3;
        let mut accepted = 0;
        for _ in 0..=max_per_bin {
            accepted += flattener
                .select_jets_flat_mass(&[300.], &[0.], &[81.], &cut(), max_per_bin)
                .unwrap()
                .len();
        }
        assert_eq!(accepted, max_per_bin);
        let hist = flattener.histogram();
        assert_eq!(hist.bin_content(hist.find_bin(81.)), max_per_bin);
    }

    #[test]
    fn cap_applies_within_one_event() {
        let mut flattener = MassFlattener::default();
        let pt = [400., 350., 300., 250.];
        let eta = [0.; 4];
        let mass = [82., 84., 120., 83.];
        let selected = flattener
            .select_jets_flat_mass(&pt, &eta, &mass, &cut(), 2)
            .unwrap();
        assert_eq!(selected, vec![0, 1, 2]);
    }

    #[test]
    fn overflow_is_never_capped() {
        let mut flattener = MassFlattener::default();
        for _ in 0..10 {
            let selected = flattener
                .select_jets_flat_mass(&[500.], &[1.], &[300.], &cut(), 1)
                .unwrap();
            assert_eq!(selected, vec![0]);
        }
        let hist = flattener.histogram();
        assert_eq!(hist.bin_content(hist.overflow_bin()), 10);
    }

    #[test]
    fn kinematic_failures_are_not_counted() {
        let mut flattener = MassFlattener::default();
        let selected = flattener
            .select_jets_flat_mass(&[100., 300., 300.], &[0., 3., 0.], &[80., 80., 30.], &cut(), 5)
            .unwrap();
        assert!(selected.is_empty());
        assert_eq!(flattener.histogram().entries(), 0);
        assert!(flattener
            .select_jets_flat_mass(&[100.], &[], &[80.], &cut(), 5)
            .is_err());
    }

    #[test]
    fn flat_counts_after_a_run() {
        let mut flattener = MassFlattener::default();
        let masses = [45., 45., 45., 45., 95., 95., 180., 260., 260., 260.];
        for &mass in &masses {
            flattener
                .select_jets_flat_mass(&[400.], &[0.], &[mass], &cut(), 2)
                .unwrap();
        }
        let hist = flattener.histogram();
        assert_eq!(hist.bin_content(hist.find_bin(45.)), 2);
        assert_eq!(hist.bin_content(hist.find_bin(95.)), 2);
        assert_eq!(hist.bin_content(hist.find_bin(180.)), 1);
        assert_eq!(hist.bin_content(hist.overflow_bin()), 3);
    }

    #[test]
    fn histogram_text_format() {
        let mut hist = MassHistogram::new(10., 5.).unwrap();
        hist.fill(7.);
        hist.fill(12.);
        let mut buffer = Vec::new();
        hist.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let rows = text.lines().filter(|l| !l.starts_with('#')).collect::<Vec<_>>();
        assert_eq!(rows, vec!["-inf 0 0", "0 5 0", "5 10 1", "10 inf 1"]);
    }

    #[test]
    fn reference_count_comes_from_the_245_250_bin() {
        let mut jets = Jets::default();
        jets.push(400., 0., 0., 246.);
        jets.push(400., 0., 0., 249.);
        jets.push(400., 3., 0., 247.);
        jets.push(400., 0., 0., 251.);
        let mut other = Jets::default();
        other.push(300., 1., 2., 245.5);
        other.push(100., 1., 2., 245.5);
        let count = reference_bin_count([&jets, &other], &cut()).unwrap();
        assert_eq!(count, 3);
    }
}
