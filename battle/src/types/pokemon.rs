//! Per-Pokemon battle state

use serde::{Deserialize, Serialize};

use super::pokemon_type::Type;
use super::stats::{BaseStats, StatStages};
use super::status::Status;

/// Battle state for one active Pokemon.
///
/// This is the estimator's view: HP is a fraction of max (upstream often only
/// knows percentages for the opponent), and stats/ability/item may be
/// estimates rather than ground truth. Simulation trials mutate their own
/// clone of this struct; the snapshot handed to the engine is never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonBattleState {
    /// Display name (nickname or species)
    pub name: String,

    /// Species name when it differs from the display name
    pub species: Option<String>,

    /// Current HP as a fraction of max (0.0 - 1.0)
    pub hp_fraction: f32,

    /// Non-volatile status condition
    pub status: Option<Status>,

    /// Stat stage modifiers
    pub boosts: StatStages,

    /// Current types (after any type-changing effects)
    pub types: Vec<Type>,

    /// Tera type, if revealed or estimated
    pub tera_type: Option<Type>,

    /// Held item, if revealed or estimated
    pub item: Option<String>,

    /// Ability, if revealed or estimated
    pub ability: Option<String>,

    /// Known move list
    pub moves: Vec<String>,

    /// Board slot (0 or 1 within the side)
    pub slot: usize,

    /// Estimated base stats for the damage model
    pub stats: Option<BaseStats>,
}

impl PokemonBattleState {
    /// Create a new Pokemon at full HP with no revealed information
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: None,
            hp_fraction: 1.0,
            status: None,
            boosts: StatStages::new(),
            types: Vec::new(),
            tera_type: None,
            item: None,
            ability: None,
            moves: Vec::new(),
            slot: 0,
            stats: None,
        }
    }

    /// Check if this Pokemon is still standing
    pub fn is_alive(&self) -> bool {
        self.hp_fraction > 0.0
    }

    /// Apply damage as a fraction of max HP, clamped at 0
    pub fn apply_damage(&mut self, fraction: f32) {
        self.hp_fraction = (self.hp_fraction - fraction).max(0.0);
    }

    /// Estimated stats, falling back to neutral 100s when unknown
    pub fn stats_or_default(&self) -> BaseStats {
        self.stats.clone().unwrap_or_default()
    }

    /// Check for a named ability (case-insensitive)
    pub fn has_ability(&self, name: &str) -> bool {
        self.ability
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pokemon_is_healthy() {
        let poke = PokemonBattleState::new("Flutter Mane");
        assert_eq!(poke.name, "Flutter Mane");
        assert_eq!(poke.hp_fraction, 1.0);
        assert!(poke.is_alive());
        assert!(poke.boosts.is_clear());
    }

    #[test]
    fn test_apply_damage_clamps_at_zero() {
        let mut poke = PokemonBattleState::new("Test");
        poke.apply_damage(0.4);
        assert!((poke.hp_fraction - 0.6).abs() < 1e-6);
        poke.apply_damage(0.9);
        assert_eq!(poke.hp_fraction, 0.0);
        assert!(!poke.is_alive());
    }

    #[test]
    fn test_has_ability() {
        let mut poke = PokemonBattleState::new("Rotom");
        assert!(!poke.has_ability("Levitate"));
        poke.ability = Some("Levitate".to_string());
        assert!(poke.has_ability("levitate"));
        assert!(!poke.has_ability("Intimidate"));
    }

    #[test]
    fn test_stats_fall_back_to_neutral() {
        let poke = PokemonBattleState::new("Unknown");
        assert_eq!(poke.stats_or_default().offense(), 100);
    }
}
