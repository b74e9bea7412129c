//! Non-volatile status conditions

use serde::{Deserialize, Serialize};

/// Non-volatile status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    Toxic,
    Sleep,
}

impl Status {
    /// Parse from an upstream identifier (Showdown-style abbreviations accepted)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "brn" | "burn" => Some(Status::Burn),
            "frz" | "freeze" | "frozen" => Some(Status::Freeze),
            "par" | "paralysis" | "paralyzed" => Some(Status::Paralysis),
            "psn" | "poison" | "poisoned" => Some(Status::Poison),
            "tox" | "toxic" => Some(Status::Toxic),
            "slp" | "sleep" | "asleep" => Some(Status::Sleep),
            _ => None,
        }
    }

    /// Convert to canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Burn => "Burn",
            Status::Freeze => "Freeze",
            Status::Paralysis => "Paralysis",
            Status::Poison => "Poison",
            Status::Toxic => "Toxic",
            Status::Sleep => "Sleep",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
