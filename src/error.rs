//! Startup errors for mesh and parameter setup.

use std::fmt;

/// Errors raised while building the web before the first frame.
///
/// Nothing in the per-frame path returns an error: once the buffers exist,
/// stepping and uploading are infallible.
#[derive(Debug, Clone, PartialEq)]
pub enum WebError {
    /// A buffer sized from the grid could not be allocated
    Allocation { buffer: &'static str, len: usize },

    /// Grid dimensions overflow the vertex/index counts or the `u32` index range
    GridTooLarge { width: usize, height: usize },

    /// A parameter is outside its documented range
    InvalidParams(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Allocation { buffer, len } => {
                write!(f, "failed to allocate {} buffer of {} elements", buffer, len)
            }
            WebError::GridTooLarge { width, height } => {
                write!(f, "grid {}x{} is too large to index", width, height)
            }
            WebError::InvalidParams(msg) => write!(f, "invalid parameters: {}", msg),
        }
    }
}

impl std::error::Error for WebError {}

/// Allocate an empty vector with exactly `len` slots, reporting failure
/// instead of aborting.
pub(crate) fn try_with_capacity<T>(buffer: &'static str, len: usize) -> Result<Vec<T>, WebError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| WebError::Allocation { buffer, len })?;
    Ok(v)
}
