//! Fast lane: sub-millisecond win-rate estimation
//!
//! The production fast lane is a pretrained classifier living outside this
//! crate; [`FastPredictor`] is the seam it plugs into. A fixed-weight
//! [`LinearFastPredictor`] ships here so the hybrid orchestrator works (and
//! is testable) without the external model.

use std::time::{Duration, Instant};

use augur_battle::{BattleSnapshot, SideId};
use serde::Serialize;

/// Result of a fast-lane inference
#[derive(Debug, Clone, Serialize)]
pub struct FastPrediction {
    /// Side A's estimated win rate (0.0 - 1.0)
    pub win_rate: f32,
    /// Wall-clock inference time
    pub inference_time: Duration,
    /// Number of input features the model consumed
    pub feature_count: usize,
}

/// A classifier mapping a snapshot to a win probability in sub-millisecond
/// time. Must not block or do unbounded work: the caller runs it inline.
pub trait FastPredictor: Send + Sync {
    fn predict(&self, snapshot: &BattleSnapshot) -> FastPrediction;
}

/// The numeric feature vector the fast lane consumes
#[derive(Debug, Clone, PartialEq)]
pub struct FastFeatures {
    pub turn: f32,
    pub rating: f32,
    pub p1_total_hp: f32,
    pub p2_total_hp: f32,
    pub hp_difference: f32,
    pub p1_fainted: f32,
    pub p2_fainted: f32,
    pub fainted_difference: f32,
    pub has_weather: f32,
    pub has_terrain: f32,
    pub has_trick_room: f32,
    pub p1_active_count: f32,
    pub p2_active_count: f32,
}

impl FastFeatures {
    pub const COUNT: usize = 13;

    /// Extract the feature vector from a snapshot
    pub fn extract(snapshot: &BattleSnapshot) -> Self {
        let a = snapshot.side(SideId::A);
        let b = snapshot.side(SideId::B);
        let p1_total_hp = a.total_active_hp();
        let p2_total_hp = b.total_active_hp();
        let p1_fainted = a.active.iter().filter(|p| !p.is_alive()).count() as f32;
        let p2_fainted = b.active.iter().filter(|p| !p.is_alive()).count() as f32;
        Self {
            turn: snapshot.turn as f32,
            // Rating is a placeholder until match context is plumbed through
            rating: 1500.0,
            p1_total_hp,
            p2_total_hp,
            hp_difference: (p1_total_hp - p2_total_hp) / 2.0,
            p1_fainted,
            p2_fainted,
            fainted_difference: p2_fainted - p1_fainted,
            has_weather: if snapshot.weather.is_some() { 1.0 } else { 0.0 },
            has_terrain: if snapshot.terrain.is_some() { 1.0 } else { 0.0 },
            has_trick_room: snapshot
                .room
                .map_or(0.0, |r| if r.is_speed_control() { 1.0 } else { 0.0 }),
            p1_active_count: a.alive_count() as f32,
            p2_active_count: b.alive_count() as f32,
        }
    }
}

/// Fixed-weight logistic model over [`FastFeatures`].
///
/// The weights are hand-set to agree directionally with the heuristic board
/// score; latency, not accuracy, is the fast lane's job.
#[derive(Debug, Clone)]
pub struct LinearFastPredictor {
    pub hp_weight: f32,
    pub fainted_weight: f32,
    pub active_weight: f32,
}

impl Default for LinearFastPredictor {
    fn default() -> Self {
        Self {
            hp_weight: 1.1,
            fainted_weight: 0.45,
            active_weight: 0.25,
        }
    }
}

impl FastPredictor for LinearFastPredictor {
    fn predict(&self, snapshot: &BattleSnapshot) -> FastPrediction {
        let start = Instant::now();
        let features = FastFeatures::extract(snapshot);
        let z = self.hp_weight * features.hp_difference
            + self.fainted_weight * features.fainted_difference
            + self.active_weight * (features.p1_active_count - features.p2_active_count);
        let win_rate = 1.0 / (1.0 + (-z).exp());
        FastPrediction {
            win_rate,
            inference_time: start.elapsed(),
            feature_count: FastFeatures::COUNT,
        }
    }
}
