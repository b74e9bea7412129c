//! Hybrid prediction lanes
//!
//! Three lanes answer the same question at different speed/quality points:
//! a sub-millisecond fast lane for immediate UI feedback, a rollout-backed
//! slow lane for the real recommendation, and an optional neural lane that
//! outranks both when a model is plugged in. Callers pick a lane per call;
//! the streaming wrapper runs fast-then-slow and delivers each as it lands.

use std::sync::Arc;
use std::time::{Duration, Instant};

use augur_battle::{ActionCandidate, BattleSnapshot, SideId};
use serde::Serialize;
use tokio::task;
use tracing::debug;

use crate::error::StrategistError;
use crate::fast::FastPredictor;
use crate::monte_carlo::{MonteCarloStrategist, RolloutReport};
use crate::neural::NeuralLane;

/// Confidence reported by the fast lane
pub const FAST_CONFIDENCE: f32 = 0.6;
/// Confidence reported by the rollout-backed slow lane
pub const SLOW_CONFIDENCE: f32 = 0.9;
/// Confidence reported by the neural lane
pub const NEURAL_CONFIDENCE: f32 = 0.95;

/// Which lane produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Fast,
    Slow,
    Neural,
    /// Neural lane requested but absent; the slow lane answered instead
    NeuralFallback,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionSource::Fast => "fast",
            PredictionSource::Slow => "slow",
            PredictionSource::Neural => "neural",
            PredictionSource::NeuralFallback => "neural_fallback",
        }
    }
}

/// A runner-up root action with its estimated win rate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeAction {
    pub description: String,
    pub win_rate: f32,
}

/// Lane-agnostic prediction handed to callers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridPrediction {
    /// Side A's estimated win rate (0.0 - 1.0)
    pub win_rate: f32,
    /// Best action found, when the lane produces one
    pub recommended_action: Option<ActionCandidate>,
    /// Lane confidence (fixed per lane, not calibrated)
    pub confidence: f32,
    /// Wall-clock time the lane took
    pub inference_time: Duration,
    pub source: PredictionSource,
    /// Human-readable reasoning, slow and neural lanes only
    pub explanation: Option<String>,
    /// Runner-up actions, best first
    pub alternatives: Vec<AlternativeAction>,
}

/// Static description of the configured lanes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridStats {
    pub rollouts_per_search: usize,
    pub has_neural_lane: bool,
    pub fast_confidence: f32,
    pub slow_confidence: f32,
    pub neural_confidence: f32,
}

/// Orchestrates the fast, slow, and neural lanes over one snapshot schema
pub struct HybridStrategist {
    fast: Arc<dyn FastPredictor>,
    rollout: Arc<MonteCarloStrategist>,
    neural: Option<Arc<dyn NeuralLane>>,
}

impl HybridStrategist {
    pub fn new(fast: Arc<dyn FastPredictor>, rollout: Arc<MonteCarloStrategist>) -> Self {
        Self {
            fast,
            rollout,
            neural: None,
        }
    }

    pub fn with_neural_lane(mut self, lane: Arc<dyn NeuralLane>) -> Self {
        self.neural = Some(lane);
        self
    }

    /// Fast lane: inline, sub-millisecond, low confidence.
    ///
    /// The recommended action is simply the first annotated legal action;
    /// the fast lane ranks positions, not moves.
    pub fn predict_quick(&self, snapshot: &BattleSnapshot) -> HybridPrediction {
        let fast = self.fast.predict(snapshot);
        HybridPrediction {
            win_rate: fast.win_rate,
            recommended_action: snapshot.legal_for(SideId::A).first().cloned(),
            confidence: FAST_CONFIDENCE,
            inference_time: fast.inference_time,
            source: PredictionSource::Fast,
            explanation: None,
            alternatives: Vec::new(),
        }
    }

    /// Slow lane: full rollout search on the blocking pool.
    ///
    /// Fails only if the blocking task itself dies; the search inside never
    /// errors.
    pub async fn predict_precise(
        &self,
        snapshot: &BattleSnapshot,
    ) -> Result<HybridPrediction, StrategistError> {
        let start = Instant::now();
        let rollout = Arc::clone(&self.rollout);
        let owned = snapshot.clone();
        let report = task::spawn_blocking(move || rollout.predict_win_rate(&owned)).await?;
        Ok(self.from_report(report, start.elapsed(), PredictionSource::Slow))
    }

    /// Neural lane: highest confidence when a model is attached; otherwise
    /// answers with the slow lane and tags the result as a fallback.
    pub async fn predict_ultimate(
        &self,
        snapshot: &BattleSnapshot,
    ) -> Result<HybridPrediction, StrategistError> {
        let Some(lane) = &self.neural else {
            debug!("no neural lane attached, falling back to rollout search");
            let mut prediction = self.predict_precise(snapshot).await?;
            prediction.source = PredictionSource::NeuralFallback;
            return Ok(prediction);
        };

        let start = Instant::now();
        let lane = Arc::clone(lane);
        let owned = snapshot.clone();
        let neural = task::spawn_blocking(move || lane.predict(&owned)).await?;

        let mut alternatives: Vec<AlternativeAction> = neural
            .policy
            .iter()
            .map(|(description, probability)| AlternativeAction {
                description: description.clone(),
                win_rate: *probability,
            })
            .collect();
        alternatives.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));

        Ok(HybridPrediction {
            win_rate: neural.win_rate,
            recommended_action: neural.recommended_action,
            confidence: NEURAL_CONFIDENCE,
            inference_time: start.elapsed(),
            source: PredictionSource::Neural,
            explanation: Some(format!(
                "guided search value estimate {:+.3}",
                neural.value_estimate
            )),
            alternatives,
        })
    }

    /// Run the fast and slow lanes back to back on the caller's thread.
    ///
    /// Synchronous convenience for batch analysis; interactive callers
    /// should use [`predict_quick`](Self::predict_quick) plus
    /// [`predict_precise`](Self::predict_precise) instead.
    pub fn predict_both(&self, snapshot: &BattleSnapshot) -> (HybridPrediction, HybridPrediction) {
        let quick = self.predict_quick(snapshot);
        let start = Instant::now();
        let report = self.rollout.predict_win_rate(snapshot);
        let precise = self.from_report(report, start.elapsed(), PredictionSource::Slow);
        (quick, precise)
    }

    pub fn stats(&self) -> HybridStats {
        HybridStats {
            rollouts_per_search: self.rollout.config().rollouts,
            has_neural_lane: self.neural.is_some(),
            fast_confidence: FAST_CONFIDENCE,
            slow_confidence: SLOW_CONFIDENCE,
            neural_confidence: NEURAL_CONFIDENCE,
        }
    }

    fn from_report(
        &self,
        report: RolloutReport,
        inference_time: Duration,
        source: PredictionSource,
    ) -> HybridPrediction {
        let recommended_action = report.optimal_candidate().cloned();
        let explanation = recommended_action.as_ref().map(|action| {
            format!(
                "{} won {:.0}% of {} simulated continuations",
                action.describe(),
                report.optimal_action_win_rate * 100.0,
                report.total_rollouts
            )
        });

        let mut alternatives: Vec<AlternativeAction> = report
            .root_candidates
            .iter()
            .zip(&report.action_win_rates)
            .enumerate()
            .filter(|(i, _)| Some(*i) != report.optimal_action_index)
            .map(|(_, (candidate, win_rate))| AlternativeAction {
                description: candidate.describe(),
                win_rate: *win_rate,
            })
            .collect();
        alternatives.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));

        HybridPrediction {
            win_rate: report.player_a_win_rate,
            recommended_action,
            confidence: SLOW_CONFIDENCE,
            inference_time,
            source,
            explanation,
            alternatives,
        }
    }
}

/// Fast-then-slow delivery over one snapshot: the fast result lands first
/// through its callback, then the slow result replaces it when the search
/// finishes.
pub struct StreamingPredictor {
    hybrid: Arc<HybridStrategist>,
}

impl StreamingPredictor {
    pub fn new(hybrid: Arc<HybridStrategist>) -> Self {
        Self { hybrid }
    }

    pub async fn predict_stream<F, S>(
        &self,
        snapshot: &BattleSnapshot,
        mut on_fast: F,
        mut on_slow: S,
    ) -> Result<(), StrategistError>
    where
        F: FnMut(&HybridPrediction),
        S: FnMut(&HybridPrediction),
    {
        let quick = self.hybrid.predict_quick(snapshot);
        on_fast(&quick);
        let precise = self.hybrid.predict_precise(snapshot).await?;
        on_slow(&precise);
        Ok(())
    }
}
