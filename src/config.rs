//! Mechanism for loading and sharing the selection configuration

use crate::{evcut::KinematicCut, numeric::Float, process::Process, Result};

use eyre::{ensure, eyre, WrapErr};

use std::{fs, path::Path, str::FromStr};

/// Cap on the number of jets per mass bin in flat-mass runs
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinCap {
    /// Fixed cap
    Fixed(usize),

    /// Derive the cap from the input's 245-250 GeV mass bin
    Auto,
}

/// Selection configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Physics process of the input dataset
    pub process: Process,

    /// Kinematic cuts on selected jets
    pub jet_cut: KinematicCut,

    /// Radius of jet to generator particle matching
    pub delta_r_max: Float,

    /// Maximal number of jets kept per event
    pub max_jets: usize,

    /// Minimal transverse momentum of associated PF candidates (GeV)
    pub pfcand_min_pt: Float,

    /// Whether the mass spectrum of selected jets should be flattened
    pub flat_mass: bool,

    /// Upper edge of the flattening mass histogram (GeV)
    pub mass_max: Float,

    /// Cap on the number of jets per mass bin
    pub max_per_bin: BinCap,
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let config = config_str.parse::<Self>()?;
        config.print();
        Ok(config)
    }

    /// Display the configuration
    pub fn print(&self) {
        println!("process        : {}", self.process);
        println!("pt_min         : {}", self.jet_cut.pt_min);
        println!("abs_eta_max    : {}", self.jet_cut.abs_eta_max);
        println!("mass_min       : {}", self.jet_cut.mass_min);
        println!("delta_r_max    : {}", self.delta_r_max);
        println!("max_jets       : {}", self.max_jets);
        println!("pfcand_min_pt  : {}", self.pfcand_min_pt);
        println!("flat_mass      : {}", self.flat_mass);
        println!("mass_max       : {}", self.mass_max);
        match self.max_per_bin {
            BinCap::Fixed(cap) => println!("max_per_bin    : {}", cap),
            BinCap::Auto => println!("max_per_bin    : auto"),
        }
    }
}
//
impl Default for Configuration {
    fn default() -> Self {
        Self {
            process: Process::Qcd,
            jet_cut: KinematicCut::new(170., 2.4, 40.),
            delta_r_max: 0.8,
            max_jets: 2,
            pfcand_min_pt: 0.,
            flat_mass: false,
            mass_max: crate::flatmass::DEFAULT_MASS_MAX,
            max_per_bin: BinCap::Auto,
        }
    }
}
//
impl FromStr for Configuration {
    type Err = eyre::Report;

    fn from_str(config_str: &str) -> Result<Self> {
        // Configuration items are the first non-whitespace chunk of text on
        // each line, the rest of the line being free-form commentary. Blank
        // lines are ignored.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // This closure fetches the next configuration item, tagging it with
        // the name of the configuration field which it is supposed to fill to
        // ease error reporting, and handling unexpected end-of-file too.
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| eyre!("Missing configuration of {}", name))
        };

        // Decode the configuration items into concrete values
        let config = Configuration {
            process: Process::from_dataset_name(next_item("process")?.data)
                .wrap_err("Could not parse configuration of process")?,
            jet_cut: KinematicCut::new(
                next_item("pt_min")?.parse::<Float>()?,
                next_item("abs_eta_max")?.parse::<Float>()?,
                next_item("mass_min")?.parse::<Float>()?,
            ),
            delta_r_max: next_item("delta_r_max")?.parse::<Float>()?,
            max_jets: next_item("max_jets")?.parse::<usize>()?,
            pfcand_min_pt: next_item("pfcand_min_pt")?.parse::<Float>()?,
            flat_mass: next_item("flat_mass")?.parse_bool()?,
            mass_max: next_item("mass_max")?.parse::<Float>()?,
            max_per_bin: next_item("max_per_bin")?.parse_bin_cap()?,
        };

        ensure!(config.max_jets > 0, "Please keep at least one jet per event");
        ensure!(
            config.delta_r_max > 0.,
            "Matching radius must be positive, got {}",
            config.delta_r_max
        );
        ensure!(
            config.jet_cut.abs_eta_max > 0.,
            "An |eta| cut of {} rejects every jet",
            config.jet_cut.abs_eta_max
        );
        ensure!(
            config.mass_max >= crate::flatmass::DEFAULT_BIN_WIDTH,
            "Flattening histogram must be at least one bin wide, got mass_max = {}",
            config.mass_max
        );
        Ok(config)
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a struct field tag and raw iterator data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse a boolean, also accepting Fortran's .true./.false. syntax
    fn parse_bool(self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            ".true." => Ok(true),
            ".false." => Ok(false),
            _ => self.parse::<bool>(),
        }
    }

    /// Parse a per-bin cap, either an integer or "auto"
    fn parse_bin_cap(self) -> Result<BinCap> {
        if self.data.eq_ignore_ascii_case("auto") {
            Ok(BinCap::Auto)
        } else {
            self.parse::<usize>().map(BinCap::Fixed)
        }
    }
}
