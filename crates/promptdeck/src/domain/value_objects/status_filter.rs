//! StatusFilter - Outcome filter for usage queries

use serde::{Deserialize, Serialize};

/// Which call outcomes a usage query returns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Error,
}

impl StatusFilter {
    pub fn accepts(self, success: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Success => success,
            StatusFilter::Error => !success,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Success => write!(f, "success"),
            StatusFilter::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "success" => Ok(StatusFilter::Success),
            "error" => Ok(StatusFilter::Error),
            _ => Err(format!("Unknown status filter: {}", s)),
        }
    }
}
