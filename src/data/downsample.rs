//! Fixed-stride point reduction for rendering.

use std::borrow::Cow;

use crate::error::{Result, TelemetryError};

/// Reduce `samples` to at most `max_points` verbatim originals.
///
/// Below the threshold the input is returned unchanged (borrowed). Above it,
/// every `ceil(len / max_points)`-th element is picked starting at index 0,
/// so the first sample is always kept and the output length is
/// `ceil(len / stride) <= max_points`.
pub fn reduce<T: Clone>(samples: &[T], max_points: usize) -> Result<Cow<'_, [T]>> {
    if max_points == 0 {
        return Err(TelemetryError::invalid(
            "max_points",
            "must be at least 1",
        ));
    }
    if samples.len() <= max_points {
        return Ok(Cow::Borrowed(samples));
    }
    let stride = samples.len().div_ceil(max_points);
    Ok(Cow::Owned(
        samples.iter().step_by(stride).cloned().collect(),
    ))
}

/// Stride `reduce` would use for `len` samples.
pub fn stride_for(len: usize, max_points: usize) -> Option<usize> {
    if max_points == 0 {
        None
    } else if len <= max_points {
        Some(1)
    } else {
        Some(len.div_ceil(max_points))
    }
}
