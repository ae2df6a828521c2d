//! Named interval presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::Interval;

/// Quick presets trading determinism for variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Creative,
    Balanced,
    Precise,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset '{0}' (expected creative, balanced or precise)")]
pub struct PresetParseError(pub String);

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Creative, Preset::Balanced, Preset::Precise];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Creative => "Creative",
            Preset::Balanced => "Balanced",
            Preset::Precise => "Precise",
        }
    }

    pub fn temperature(self) -> Interval {
        match self {
            Preset::Creative => Interval::new(0.7, 1.0),
            Preset::Balanced => Interval::new(0.4, 0.8),
            Preset::Precise => Interval::new(0.1, 0.7),
        }
    }

    pub fn top_p(self) -> Interval {
        match self {
            Preset::Creative => Interval::new(0.9, 1.0),
            Preset::Balanced => Interval::new(0.6, 1.0),
            Preset::Precise => Interval::new(0.4, 0.9),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = PresetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PresetParseError(s.to_string()))
    }
}
