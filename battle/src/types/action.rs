//! Legal-action candidates annotated by upstream collaborators

use serde::{Deserialize, Serialize};

/// Semantic tags attached to an action by the upstream annotator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    Protect,
    Spread,
    Priority,
    SpeedControl,
    Boost,
    Pivot,
}

impl ActionTag {
    /// Parse from an upstream tag string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "protect" => Some(ActionTag::Protect),
            "spread" => Some(ActionTag::Spread),
            "priority" => Some(ActionTag::Priority),
            "speed_control" => Some(ActionTag::SpeedControl),
            "boost" => Some(ActionTag::Boost),
            "pivot" => Some(ActionTag::Pivot),
            _ => None,
        }
    }
}

/// Who an action is aimed at.
///
/// Slots are side-relative: `Opponent(0)` is the opposing left slot,
/// `Ally(0)` the partner's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    Opponent(usize),
    Ally(usize),
    User,
}

impl ActionTarget {
    /// Human-readable description for recommendation output
    pub fn describe(&self) -> String {
        match self {
            ActionTarget::Opponent(slot) => format!("opponent slot {slot}"),
            ActionTarget::Ally(slot) => format!("ally slot {slot}"),
            ActionTarget::User => "self".to_string(),
        }
    }
}

/// Pre-computed damage window from the upstream damage calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageEstimate {
    /// Minimum roll as percent of the target's max HP
    pub min_percent: f32,
    /// Maximum roll as percent of the target's max HP
    pub max_percent: f32,
    /// Probability this hit knocks the target out (0.0 - 1.0)
    pub ko_chance: f32,
    /// Accuracy after modifiers (0.0 - 1.0)
    pub hit_chance: f32,
}

/// Pre-computed flags attached to an action by upstream annotators.
///
/// Everything here is derived before the engine runs; the engine only
/// reads these fields, it never recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMetadata {
    /// Move shares a type with its user
    pub is_stab: bool,
    /// Move is super effective against its target
    pub is_super_effective: bool,
    /// Move is resisted by its target
    pub is_not_very_effective: bool,
    /// Target is fully immune (type or ability)
    pub is_immune: bool,
    /// Coverage value against the opposing team (1.0 = neutral)
    pub coverage_multiplier: Option<f32>,
    /// Damage window from the upstream calculator
    pub estimated_damage: Option<DamageEstimate>,
    /// This candidate switches the actor out
    pub is_switch: bool,
    /// Actor's HP fraction at annotation time (switch-context)
    pub actor_hp_fraction: Option<f32>,
    /// How many times the actor used a protecting move in a row
    pub consecutive_protects: u32,
}

/// One legal move/switch option for one Pokemon, with annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCandidate {
    /// Acting Pokemon's display name
    pub actor: String,

    /// Acting slot within the side (0 or 1)
    pub slot: usize,

    /// Move identifier (or the switch target's name for switches)
    pub move_name: String,

    /// Target descriptor, if the move needs one
    pub target: Option<ActionTarget>,

    /// Move priority bracket
    pub priority: i8,

    /// Semantic tags from the annotator
    pub tags: Vec<ActionTag>,

    /// Pre-computed flags and damage windows
    pub metadata: ActionMetadata,
}

impl ActionCandidate {
    /// Create a bare candidate with no tags or metadata
    pub fn new(actor: impl Into<String>, slot: usize, move_name: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            slot,
            move_name: move_name.into(),
            target: None,
            priority: 0,
            tags: Vec::new(),
            metadata: ActionMetadata::default(),
        }
    }

    /// Check for a semantic tag
    pub fn has_tag(&self, tag: ActionTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Whether this is the universal stall move
    pub fn is_protect(&self) -> bool {
        self.move_name.eq_ignore_ascii_case("protect")
    }

    /// Short description for recommendation output
    pub fn describe(&self) -> String {
        match &self.target {
            Some(target) => format!("{} uses {} on {}", self.actor, self.move_name, target.describe()),
            None => format!("{} uses {}", self.actor, self.move_name),
        }
    }
}
