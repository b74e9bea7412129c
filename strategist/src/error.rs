use thiserror::Error;

/// Errors surfaced to callers of the decision engine.
///
/// Degenerate inputs (empty action lists, zero normalizers) and missing
/// optional collaborators are recovered locally and never reach this enum;
/// only unusable configuration and failed background tasks do.
#[derive(Error, Debug)]
pub enum StrategistError {
    #[error("unknown evaluation algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("evaluation algorithm '{0}' has no implementation yet")]
    UnimplementedAlgorithm(&'static str),

    #[error("rollout task failed: {0}")]
    RolloutTask(#[from] tokio::task::JoinError),
}
