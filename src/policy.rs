//! Policy Advisor Module
//!
//! Maps summary statistics to a DMARC policy recommendation using fixed
//! thresholds. The branch order is significant: the reject check runs before
//! the quarantine check, so a batch satisfying both takes the reject branch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    #[serde(rename = "reject")]
    Reject,
    #[serde(rename = "quarantine")]
    Quarantine,
    #[serde(rename = "none, investigate further")]
    StayAtNone,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Reject => write!(f, "reject"),
            Recommendation::Quarantine => write!(f, "quarantine"),
            Recommendation::StayAtNone => write!(f, "none, investigate further"),
        }
    }
}

impl FromStr for Recommendation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Recommendation::Reject),
            "quarantine" => Ok(Recommendation::Quarantine),
            "none, investigate further" | "none" => Ok(Recommendation::StayAtNone),
            _ => Err(format!("Invalid recommendation: {}", s)),
        }
    }
}

/// Derives the policy recommendation from the batch fail rate (a percentage)
/// and the total count of messages from unauthorized sources.
pub fn advise(fail_rate: f64, unauthorized_count: u64) -> Recommendation {
    if fail_rate < 5.0 && unauthorized_count < 2 {
        Recommendation::Reject
    } else if fail_rate < 15.0 {
        Recommendation::Quarantine
    } else {
        Recommendation::StayAtNone
    }
}
