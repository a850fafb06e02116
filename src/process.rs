//! Physics processes that datasets are produced from, and the generator
//! particles their signal jets are matched to

use crate::Result;
use eyre::bail;
use std::{fmt, str::FromStr};

/// Physics process of a dataset
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Process {
    /// Hadronic tt̄ decays (top jets are classified, not gen-matched)
    TTto4Q,
    /// H → bb̄
    Hbb,
    /// W → qq̄'
    Wqq,
    /// Z → qq̄
    Zqq,
    /// QCD multijet background
    Qcd,
    /// Y → 4q
    Yto4q,
    /// Collision data
    Data,
    /// Semi-visible jets
    Svj,
    /// Emerging jets
    Emj,
}
//
impl Process {
    /// Map a dataset name to its process
    ///
    /// Dataset names carry generator and tune details (e.g.
    /// "QCD-4Jets_HT-1000to1200"), so well-known name fragments are
    /// recognized first. Anything else must be a process name already.
    ///
    pub fn from_dataset_name(name: &str) -> Result<Self> {
        const FRAGMENTS: [(&str, Process); 7] = [
            ("QCD", Process::Qcd),
            ("WJets", Process::Wqq),
            ("ZJets", Process::Zqq),
            ("GluGluHto2B", Process::Hbb),
            ("JetMet", Process::Data),
            ("SVJ", Process::Svj),
            ("EMJ", Process::Emj),
        ];
        match FRAGMENTS.iter().find(|(fragment, _)| name.contains(fragment)) {
            Some(&(_, process)) => Ok(process),
            None => name.parse(),
        }
    }

    /// PDG identifiers of the generator particles that signal jets must be
    /// matched to, if jets of this process are gen-matched at all
    pub fn match_pdg_ids(self) -> Option<&'static [i32]> {
        match self {
            Self::Hbb => Some(&[25]),
            Self::Wqq => Some(&[24]),
            Self::Zqq => Some(&[23]),
            Self::Yto4q => Some(&[35]),
            Self::Svj => Some(&[4900111, 4900113, 4900211, 4900213]),
            Self::Emj => Some(&[4900101, 4900113, 4900111, 4900211, 4900213]),
            Self::TTto4Q | Self::Qcd | Self::Data => None,
        }
    }

    /// Truth that jets of this process get a top decay category
    pub fn classifies_top_jets(self) -> bool {
        self == Self::TTto4Q
    }

    /// Canonical process name
    pub fn name(self) -> &'static str {
        match self {
            Self::TTto4Q => "TTto4Q",
            Self::Hbb => "Hbb",
            Self::Wqq => "Wqq",
            Self::Zqq => "Zqq",
            Self::Qcd => "QCD",
            Self::Yto4q => "Yto4q",
            Self::Data => "Data",
            Self::Svj => "SVJ",
            Self::Emj => "EMJ",
        }
    }
}

impl FromStr for Process {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        const ALL: [Process; 9] = [
            Process::TTto4Q,
            Process::Hbb,
            Process::Wqq,
            Process::Zqq,
            Process::Qcd,
            Process::Yto4q,
            Process::Data,
            Process::Svj,
            Process::Emj,
        ];
        match ALL.iter().find(|process| process.name() == s) {
            Some(&process) => Ok(process),
            None => bail!("Process name {} not recognized", s),
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_names_are_sanitized() {
        let process = |name| Process::from_dataset_name(name).unwrap();
        assert_eq!(process("QCD-4Jets_HT-1000to1200"), Process::Qcd);
        assert_eq!(process("WJetsto2Q-3Jets_HT-800"), Process::Wqq);
        assert_eq!(process("ZJetsto2Q-3Jets_HT-800"), Process::Zqq);
        assert_eq!(process("GluGluHto2B_PT-200"), Process::Hbb);
        assert_eq!(process("JetMet0_Run2023C"), Process::Data);
        assert_eq!(process("SVJ_mMed-2000"), Process::Svj);
        assert_eq!(process("EMJ_mMed-1000"), Process::Emj);
        assert_eq!(process("TTto4Q"), Process::TTto4Q);
        assert_eq!(process("Yto4q"), Process::Yto4q);
        assert!(Process::from_dataset_name("DYto2L").is_err());
    }

    #[test]
    fn match_ids() {
        assert_eq!(Process::Wqq.match_pdg_ids(), Some(&[24][..]));
        assert_eq!(Process::Svj.match_pdg_ids().map(<[i32]>::len), Some(4));
        assert_eq!(Process::Qcd.match_pdg_ids(), None);
        assert_eq!(Process::TTto4Q.match_pdg_ids(), None);
        assert!(Process::TTto4Q.classifies_top_jets());
        assert!(!Process::Zqq.classifies_top_jets());
    }

    #[test]
    fn names_round_trip() {
        for name in ["TTto4Q", "Hbb", "QCD", "SVJ"] {
            assert_eq!(name.parse::<Process>().unwrap().to_string(), name);
        }
    }
}
