//! Opponent-behavior sampling for guided playouts

use augur_battle::{BattleSnapshot, SideId};
use rand::{Rng, RngCore};

/// Per-turn sampled intentions for the opposing side's two slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpponentSample {
    /// Slot protects this turn
    pub protect: [bool; 2],
    /// Slot switches out this turn (never together with protect)
    pub switch: [bool; 2],
}

/// Samples plausible opponent behavior during rollouts.
///
/// Returning `None` means "no adjustment this turn" and the guided action
/// stands; the engine swallows that case without retrying.
pub trait OpponentModel: Send + Sync {
    fn sample(&self, snapshot: &BattleSnapshot, rng: &mut dyn RngCore) -> Option<OpponentSample>;
}

/// Flat per-turn protect/switch probabilities.
///
/// These are the league-wide base rates; a learned per-player model can
/// replace this through the same trait.
#[derive(Debug, Clone)]
pub struct StaticOpponentModel {
    pub protect_chance: f32,
    pub switch_chance: f32,
}

impl Default for StaticOpponentModel {
    fn default() -> Self {
        Self {
            protect_chance: 0.15,
            switch_chance: 0.10,
        }
    }
}

impl OpponentModel for StaticOpponentModel {
    fn sample(&self, snapshot: &BattleSnapshot, rng: &mut dyn RngCore) -> Option<OpponentSample> {
        let mut sample = OpponentSample::default();
        for (slot, poke) in snapshot.side(SideId::B).active.iter().take(2).enumerate() {
            if !poke.is_alive() {
                continue;
            }
            if rng.gen_range(0.0..1.0f32) < self.protect_chance {
                sample.protect[slot] = true;
            } else if rng.gen_range(0.0..1.0f32) < self.switch_chance {
                sample.switch[slot] = true;
            }
        }
        Some(sample)
    }
}
