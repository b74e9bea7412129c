//! Decision engine for VGC doubles: board evaluation, rollout search, and
//! hybrid prediction lanes over the `augur-battle` snapshot schema.
//!
//! # Overview
//!
//! ```text
//! BattleSnapshot (augur-battle)
//!        │
//!        ├─> HeuristicEvaluator   board score + action scoring
//!        │          │
//!        ├─> MonteCarloStrategist flat rollout search, guided playouts
//!        │          │
//!        └─> HybridStrategist     fast / slow / neural lanes
//!                   │
//!                   └─> StreamingPredictor  fast-then-slow callbacks
//! ```
//!
//! The engine is a pure consumer of snapshots: upstream collaborators
//! rebuild state and annotate legal actions, this crate scores and searches.
//! Degenerate inputs degrade locally (uniform distributions, fallback
//! actions); only unusable configuration and failed background tasks
//! surface as [`StrategistError`].

pub mod algorithm;
pub mod error;
pub mod evaluator;
pub mod fast;
pub mod hybrid;
pub mod monte_carlo;
pub mod neural;
pub mod opponent;

pub use algorithm::EvalAlgorithm;
pub use error::StrategistError;
pub use evaluator::{
    ActionScore, EvalWeights, EvaluationResult, GamePlan, HeuristicEvaluator, PlayerEvaluation,
    PokemonRecommendation,
};
pub use fast::{FastFeatures, FastPrediction, FastPredictor, LinearFastPredictor};
pub use hybrid::{
    AlternativeAction, HybridPrediction, HybridStats, HybridStrategist, PredictionSource,
    StreamingPredictor, FAST_CONFIDENCE, NEURAL_CONFIDENCE, SLOW_CONFIDENCE,
};
pub use monte_carlo::{
    ActionStats, MonteCarloConfig, MonteCarloStrategist, RolloutReport, SimAction, SimActionKind,
    SimTurnActions,
};
pub use neural::{NeuralLane, NeuralPrediction};
pub use opponent::{OpponentModel, OpponentSample, StaticOpponentModel};
