//! Optional neural-search lane
//!
//! A policy/value guided search lives outside this crate; [`NeuralLane`] is
//! the capability interface the hybrid orchestrator holds as an explicit
//! `Option`. Construction of a concrete lane either succeeds or fails in
//! the adapter that owns the model; once plugged in here it is assumed
//! ready.

use augur_battle::{ActionCandidate, BattleSnapshot};

/// Output of a neural-lane search
#[derive(Debug, Clone)]
pub struct NeuralPrediction {
    /// Side A's estimated win rate (0.0 - 1.0)
    pub win_rate: f32,
    /// Best action found by the guided search
    pub recommended_action: Option<ActionCandidate>,
    /// Root policy distribution (action description, probability)
    pub policy: Vec<(String, f32)>,
    /// Raw value-head estimate, side A's perspective (-1.0 - 1.0)
    pub value_estimate: f32,
}

/// A policy/value guided search over the same snapshot schema
pub trait NeuralLane: Send + Sync {
    fn predict(&self, snapshot: &BattleSnapshot) -> NeuralPrediction;
}
