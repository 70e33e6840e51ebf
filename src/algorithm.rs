use crate::error::Error;

use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tracking algorithms a backend can be asked for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Kcf,
    #[default]
    Csrt,
    Mil,
    MedianFlow,
    Boosting,
    Tld,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Kcf,
        Algorithm::Csrt,
        Algorithm::Mil,
        Algorithm::MedianFlow,
        Algorithm::Boosting,
        Algorithm::Tld,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Kcf => "kcf",
            Algorithm::Csrt => "csrt",
            Algorithm::Mil => "mil",
            Algorithm::MedianFlow => "medianflow",
            Algorithm::Boosting => "boosting",
            Algorithm::Tld => "tld",
        }
    }

    /// Whether the algorithm's reported box size can be trusted.
    ///
    /// KCF has no scale estimation and keeps echoing its initial box, so its
    /// size is replaced by the selected one. The others are assumed to report
    /// size; that has not been verified for every backend build and can be
    /// overridden per run.
    pub fn reports_size(&self) -> bool {
        !matches!(self, Algorithm::Kcf)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        Algorithm::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// Algorithm plus the quirks the tracking state machine compensates for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    pub algorithm: Algorithm,
    pub reports_size: bool,
}

impl AlgorithmDescriptor {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            reports_size: algorithm.reports_size(),
        }
    }

    pub fn with_reports_size(mut self, reports_size: Option<bool>) -> Self {
        if let Some(value) = reports_size {
            self.reports_size = value;
        }

        self
    }
}

impl Default for AlgorithmDescriptor {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}
