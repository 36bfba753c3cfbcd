// Error types shared across layers
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// No viewer is attached, or the attached viewer went away.
    #[error("rendering surface unavailable: {0}")]
    SurfaceUnavailable(&'static str),

    /// The viewer has not drained its buffer; frame `0` was dropped.
    #[error("rendering surface busy, frame {0} dropped")]
    SurfaceBusy(u64),

    #[error("rolling window capacity must be at least 1")]
    EmptyWindow,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
