//! Named evaluation algorithms
//!
//! Downstream configuration selects a leaf evaluator by name. Selection
//! either succeeds with a usable algorithm or fails fast; there is no
//! silent fallback to a different algorithm.

use crate::error::StrategistError;

/// The leaf evaluation algorithms this engine knows by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalAlgorithm {
    /// Hand-tuned board scoring (always available)
    Heuristic,
    /// Flat Monte-Carlo rollout search (always available)
    MonteCarlo,
    /// Learned value/policy model (interface reserved, not implemented)
    Ml,
}

impl EvalAlgorithm {
    /// Resolve an algorithm from its configuration name
    pub fn from_name(name: &str) -> Result<Self, StrategistError> {
        match name.to_lowercase().as_str() {
            "heuristic" => Ok(EvalAlgorithm::Heuristic),
            "montecarlo" | "monte_carlo" | "mcts" => Ok(EvalAlgorithm::MonteCarlo),
            "ml" => Ok(EvalAlgorithm::Ml),
            other => Err(StrategistError::UnknownAlgorithm(other.to_string())),
        }
    }

    /// Fail fast when a named algorithm has no implementation behind it.
    ///
    /// Returning a meaningless evaluation would be worse than refusing, so
    /// this is a hard error rather than a degraded answer.
    pub fn ensure_available(&self) -> Result<(), StrategistError> {
        match self {
            EvalAlgorithm::Heuristic | EvalAlgorithm::MonteCarlo => Ok(()),
            EvalAlgorithm::Ml => Err(StrategistError::UnimplementedAlgorithm("ml")),
        }
    }
}
