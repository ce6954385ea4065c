use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("shape of {mask} mask does not match simulation shape: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        mask: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("nest mask contains no nest cells; cannot place ants")]
    NoNestCells,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("kernel radius {radius} exceeds the fixed kernel buffer")]
    KernelTooLarge { radius: usize },

    #[error("buffer holds {found} cells but shape requires {expected}")]
    BufferSize { expected: usize, found: usize },

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
