//! Indicator calculation errors.

use thiserror::Error;

/// Reasons an indicator produced no derived series.
///
/// Neither case is fatal: the indicator is left with an empty series and a
/// degenerate value range, which renderers treat as "nothing to draw".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Period {period} exceeds series length {len}")]
    EmptyInput { period: usize, len: usize },
    #[error("Invalid indicator parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Fails with `EmptyInput` when `period` bars are not available.
pub(crate) fn require_len(period: usize, len: usize) -> Result<(), IndicatorError> {
    if period > len {
        Err(IndicatorError::EmptyInput { period, len })
    } else {
        Ok(())
    }
}
