//! The per-decision-point battle snapshot

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::action::ActionCandidate;
use super::field::{Room, Terrain, Weather};
use super::side::SideState;
use super::stats::BaseStats;

/// Side label used throughout the engine.
///
/// Side A is the side the engine recommends for ("the player"); side B is
/// the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideId {
    A,
    B,
}

impl SideId {
    /// The other side
    pub fn opponent(&self) -> SideId {
        match self {
            SideId::A => SideId::B,
            SideId::B => SideId::A,
        }
    }

    /// Label used in serialized output
    pub fn label(&self) -> &'static str {
        match self {
            SideId::A => "A",
            SideId::B => "B",
        }
    }
}

/// Immutable-per-turn description of the battle, built by upstream
/// collaborators (state rebuild + action annotation) once per decision point.
///
/// The engine never mutates a snapshot it is handed; simulation trials clone
/// the side states they intend to alter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    /// The side being recommended for
    pub player_a: SideState,

    /// The opposing side
    pub player_b: SideState,

    /// Turn counter
    pub turn: u32,

    /// Active weather, if any
    pub weather: Option<Weather>,

    /// Active terrain, if any
    pub terrain: Option<Terrain>,

    /// Active room effect, if any
    pub room: Option<Room>,

    /// Annotated legal actions per side
    pub legal_actions: HashMap<SideId, Vec<ActionCandidate>>,

    /// Hidden-stat estimates keyed by Pokemon name (from upstream estimation)
    pub stat_estimates: HashMap<String, BaseStats>,
}

impl BattleSnapshot {
    /// Create a snapshot with two empty sides at turn 0
    pub fn new(player_a: SideState, player_b: SideState) -> Self {
        Self {
            player_a,
            player_b,
            turn: 0,
            weather: None,
            terrain: None,
            room: None,
            legal_actions: HashMap::new(),
            stat_estimates: HashMap::new(),
        }
    }

    /// Get a side by id
    pub fn side(&self, id: SideId) -> &SideState {
        match id {
            SideId::A => &self.player_a,
            SideId::B => &self.player_b,
        }
    }

    /// Get a side by id, mutably
    pub fn side_mut(&mut self, id: SideId) -> &mut SideState {
        match id {
            SideId::A => &mut self.player_a,
            SideId::B => &mut self.player_b,
        }
    }

    /// Annotated legal actions for a side (empty when upstream supplied none)
    pub fn legal_for(&self, id: SideId) -> &[ActionCandidate] {
        self.legal_actions.get(&id).map_or(&[], |v| v.as_slice())
    }

    /// Terminal check: a side with no surviving active Pokemon and no
    /// reserves has lost. Returns the winner, or `None` while the battle
    /// is still in progress.
    pub fn winner(&self) -> Option<SideId> {
        if self.player_a.is_defeated() {
            return Some(SideId::B);
        }
        if self.player_b.is_defeated() {
            return Some(SideId::A);
        }
        None
    }

    /// Whether either side has been defeated
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Drop fainted Pokemon from both active lists
    pub fn remove_fainted(&mut self) {
        self.player_a.remove_fainted();
        self.player_b.remove_fainted();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pokemon::PokemonBattleState;

    fn snapshot_with(active_a: usize, reserves_a: usize, active_b: usize, reserves_b: usize) -> BattleSnapshot {
        let mut a = SideState::new("A");
        let mut b = SideState::new("B");
        for i in 0..active_a {
            let mut p = PokemonBattleState::new(format!("A{i}"));
            p.slot = i;
            a.active.push(p);
        }
        for i in 0..reserves_a {
            a.reserves.push(format!("Ar{i}"));
        }
        for i in 0..active_b {
            let mut p = PokemonBattleState::new(format!("B{i}"));
            p.slot = i;
            b.active.push(p);
        }
        for i in 0..reserves_b {
            b.reserves.push(format!("Br{i}"));
        }
        BattleSnapshot::new(a, b)
    }

    #[test]
    fn test_winner_none_while_in_progress() {
        let snapshot = snapshot_with(2, 2, 2, 2);
        assert_eq!(snapshot.winner(), None);
        assert!(!snapshot.is_terminal());
    }

    #[test]
    fn test_winner_when_side_b_defeated() {
        let snapshot = snapshot_with(2, 0, 0, 0);
        assert_eq!(snapshot.winner(), Some(SideId::A));
    }

    #[test]
    fn test_no_winner_while_reserves_remain() {
        let snapshot = snapshot_with(2, 0, 0, 1);
        assert_eq!(snapshot.winner(), None);
    }

    #[test]
    fn test_legal_for_defaults_to_empty() {
        let snapshot = snapshot_with(1, 0, 1, 0);
        assert!(snapshot.legal_for(SideId::A).is_empty());
    }

    #[test]
    fn test_side_id_opponent() {
        assert_eq!(SideId::A.opponent(), SideId::B);
        assert_eq!(SideId::B.opponent(), SideId::A);
        assert_eq!(SideId::A.label(), "A");
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut snapshot = snapshot_with(2, 1, 2, 1);
        snapshot.legal_actions.insert(
            SideId::A,
            vec![crate::types::action::ActionCandidate::new("A0", 0, "Protect")],
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: BattleSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}
