//! Dataset selector

use crate::error::SelectorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis target selected by `load_config`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Reference/control dataset
    Baseline,
    /// Chlamydia organism dataset
    Chlamydia,
}

impl Dataset {
    /// Every selectable dataset
    pub const ALL: [Dataset; 2] = [Dataset::Baseline, Dataset::Chlamydia];

    /// Selector string for this dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Baseline => "baseline",
            Dataset::Chlamydia => "chlamydia",
        }
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(Dataset::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(Dataset::Baseline),
            "chlamydia" => Ok(Dataset::Chlamydia),
            _ => Err(SelectorError::UnknownDataset {
                selector: s.to_string(),
                expected: Self::expected(),
            }),
        }
    }
}
