use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A window was attached while still open in another tree position.
    #[error("double attach: {0}")]
    DoubleAttach(String),
    /// A structural operation referenced a window that is not in the arena.
    #[error("unknown window: {0}")]
    UnknownWindow(String),
    /// A child operation was invoked on the wrong parent.
    #[error("not a child: {0}")]
    NotAChild(String),
    /// Layout failure.
    #[error("layout: {0}")]
    Layout(String),
    /// Content loading failure.
    #[error("load: {0}")]
    Load(String),
    /// Invalid input error.
    #[error("invalid: {0}")]
    Invalid(String),
    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}
