//! Strategy recommendations
//!
//! The "AI strategy" panel is a literal lookup: crisis type selects a
//! confidence and a protocol label, the demographic is only echoed back.
//! Unknown crisis types fall back to the standard protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence used when the crisis type is not in the table.
pub const FALLBACK_CONFIDENCE: f64 = 0.87;

/// Protocol used when the crisis type is not in the table.
pub const FALLBACK_PROTOCOL: &str = "Standard Protocol Alpha";

/// Crisis signals offered by the console selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CrisisType {
    Suicide,
    Panic,
    DomesticViolence,
    Substance,
    Cardiac,
}

impl CrisisType {
    pub const ALL: [CrisisType; 5] = [
        CrisisType::Suicide,
        CrisisType::Panic,
        CrisisType::DomesticViolence,
        CrisisType::Substance,
        CrisisType::Cardiac,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CrisisType::Suicide => "suicide",
            CrisisType::Panic => "panic",
            CrisisType::DomesticViolence => "domestic_violence",
            CrisisType::Substance => "substance",
            CrisisType::Cardiac => "cardiac",
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            CrisisType::Suicide => 0.92,
            CrisisType::Panic => 0.88,
            CrisisType::DomesticViolence => 0.85,
            CrisisType::Substance => 0.83,
            CrisisType::Cardiac => 0.94,
        }
    }

    pub fn protocol(self) -> &'static str {
        match self {
            CrisisType::Suicide => "Crisis Intervention Protocol Alpha",
            CrisisType::Panic => "Calm & Stabilize Protocol",
            CrisisType::DomesticViolence => "Safety Extraction Protocol",
            CrisisType::Substance => "Medical Response Protocol",
            CrisisType::Cardiac => "Emergency CPR Protocol",
        }
    }
}

impl FromStr for CrisisType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrisisType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Target demographic radio options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Demographic {
    Child,
    Teen,
    #[default]
    Adult,
    Elderly,
}

impl fmt::Display for Demographic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Demographic::Child => write!(f, "Child"),
            Demographic::Teen => write!(f, "Teen"),
            Demographic::Adult => write!(f, "Adult"),
            Demographic::Elderly => write!(f, "Elderly"),
        }
    }
}

impl FromStr for Demographic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "child" => Ok(Demographic::Child),
            "teen" => Ok(Demographic::Teen),
            "adult" => Ok(Demographic::Adult),
            "elderly" => Ok(Demographic::Elderly),
            other => Err(format!(
                "Unknown demographic '{other}' (expected child, teen, adult or elderly)"
            )),
        }
    }
}

/// Recommendation shown on the strategy card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    pub crisis_type: String,
    pub confidence: f64,
    /// `confidence * 100`, truncated
    pub match_percent: u32,
    pub protocol: String,
    pub age_group: String,
    pub confidence_level: &'static str,
}

/// Look up the canned strategy for `crisis_type`.
///
/// Any string outside [`CrisisType::ALL`] gets the fallback entry.
pub fn recommend(crisis_type: &str, demographic: Demographic) -> Strategy {
    let (confidence, protocol) = match crisis_type.parse::<CrisisType>() {
        Ok(known) => (known.confidence(), known.protocol()),
        Err(()) => (FALLBACK_CONFIDENCE, FALLBACK_PROTOCOL),
    };

    Strategy {
        crisis_type: crisis_type.to_string(),
        confidence,
        match_percent: (confidence * 100.0) as u32,
        protocol: protocol.to_string(),
        age_group: demographic.to_string(),
        confidence_level: "High",
    }
}
