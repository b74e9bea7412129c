//! Global field conditions: weather, terrain, and rooms

use serde::{Deserialize, Serialize};

/// Weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Snow,
}

impl Weather {
    /// Parse from an upstream identifier
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sunnyday" | "sun" => Some(Weather::Sun),
            "raindance" | "rain" => Some(Weather::Rain),
            "sandstorm" | "sand" => Some(Weather::Sand),
            "snowscape" | "snow" | "hail" => Some(Weather::Snow),
            _ => None,
        }
    }

    /// Convert to canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sun => "Sun",
            Weather::Rain => "Rain",
            Weather::Sand => "Sandstorm",
            Weather::Snow => "Snow",
        }
    }
}

/// Terrain conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl Terrain {
    /// Parse from an upstream identifier
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "electricterrain" | "electric" => Some(Terrain::Electric),
            "grassyterrain" | "grassy" => Some(Terrain::Grassy),
            "mistyterrain" | "misty" => Some(Terrain::Misty),
            "psychicterrain" | "psychic" => Some(Terrain::Psychic),
            _ => None,
        }
    }

    /// Convert to canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Terrain::Electric => "Electric Terrain",
            Terrain::Grassy => "Grassy Terrain",
            Terrain::Misty => "Misty Terrain",
            Terrain::Psychic => "Psychic Terrain",
        }
    }
}

/// Room effects (speed control)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Room {
    Trick,
    Magic,
    Wonder,
}

impl Room {
    /// Parse from an upstream identifier
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trickroom" | "trick" => Some(Room::Trick),
            "magicroom" | "magic" => Some(Room::Magic),
            "wonderroom" | "wonder" => Some(Room::Wonder),
            _ => None,
        }
    }

    /// Whether this room inverts or otherwise controls turn order
    pub fn is_speed_control(&self) -> bool {
        matches!(self, Room::Trick)
    }
}
