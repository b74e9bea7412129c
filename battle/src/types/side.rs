//! One player's side of the battle snapshot

use serde::{Deserialize, Serialize};

use super::pokemon::PokemonBattleState;

/// Battle snapshot for one side: 0-2 active Pokemon plus named reserves.
///
/// Reserves are names only; their state is unknown until they enter the
/// field, so simulation treats a switch-in as a fresh Pokemon at full HP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    /// Side name (player username or label)
    pub name: String,

    /// Active Pokemon (never contains fainted entries at a decision point)
    pub active: Vec<PokemonBattleState>,

    /// Names of Pokemon still in the back
    pub reserves: Vec<String>,

    /// External scoring hint, added to the board score as-is
    pub score_bias: f32,
}

impl SideState {
    /// Create an empty side
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: Vec::new(),
            reserves: Vec::new(),
            score_bias: 0.0,
        }
    }

    /// Sum of HP fractions over surviving active Pokemon
    pub fn total_active_hp(&self) -> f32 {
        self.active
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.hp_fraction)
            .sum()
    }

    /// Count of active Pokemon with a status condition
    pub fn status_count(&self) -> usize {
        self.active.iter().filter(|p| p.status.is_some()).count()
    }

    /// Sum of speed stage boosts across active Pokemon
    pub fn speed_boost_sum(&self) -> i32 {
        self.active.iter().map(|p| p.boosts.spe as i32).sum()
    }

    /// Count of surviving active Pokemon
    pub fn alive_count(&self) -> usize {
        self.active.iter().filter(|p| p.is_alive()).count()
    }

    /// Find an active Pokemon by display name
    pub fn find_active(&self, name: &str) -> Option<&PokemonBattleState> {
        self.active.iter().find(|p| p.name == name)
    }

    /// Drop fainted Pokemon from the active list
    pub fn remove_fainted(&mut self) {
        self.active.retain(|p| p.is_alive());
    }

    /// No Pokemon left on the field and none in the back
    pub fn is_defeated(&self) -> bool {
        self.alive_count() == 0 && self.reserves.is_empty()
    }

    /// Swap the Pokemon at an active slot for a named reserve.
    ///
    /// The outgoing Pokemon's name goes back to the reserves only if it is
    /// still alive; the incoming reserve enters at full HP.
    pub fn switch_in(&mut self, slot: usize, reserve_name: &str) -> bool {
        let Some(pos) = self.reserves.iter().position(|r| r == reserve_name) else {
            return false;
        };
        let Some(outgoing) = self.active.iter_mut().find(|p| p.slot == slot) else {
            return false;
        };
        let incoming_name = self.reserves.remove(pos);
        let was_alive = outgoing.is_alive();
        let old_name = std::mem::replace(outgoing, {
            let mut incoming = PokemonBattleState::new(incoming_name);
            incoming.slot = slot;
            incoming
        })
        .name;
        if was_alive {
            self.reserves.push(old_name);
        }
        true
    }
}
