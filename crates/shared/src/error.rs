use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFieldError {
    #[error("unknown form field: {0}")]
    UnknownField(String),
    #[error("unknown seed type: {0:?}")]
    UnknownSeedType(String),
}
