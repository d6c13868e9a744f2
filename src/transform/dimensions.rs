//! Target dimension resolution.
//!
//! Reconciles the source image dimensions with zero, one, or two
//! requested target dimensions into a single definite output size:
//!
//! - Neither requested: source dimensions pass through unchanged.
//! - One requested: the other is derived from the source aspect ratio.
//! - Both requested: used verbatim; the source aspect ratio is not
//!   enforced when the caller is explicit about both axes.
//!
//! Derived values round to the nearest integer and clamp to a minimum of
//! 1 pixel. Parameter parsing rejects non-positive values upstream, but
//! the resolver re-validates defensively.

use crate::error::TransformError;

/// A definite output size, computed once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDimensions {
    pub width: u32,
    pub height: u32,
}

/// Resolve requested dimensions against the decoded source size.
///
/// # Arguments
/// * `source_width`, `source_height` - Dimensions of the decoded raster
/// * `requested_width`, `requested_height` - Optional target dimensions
///
/// # Errors
/// `TransformError::InvalidDimensions` when a requested value is
/// non-finite or not positive, or when both values are given and either
/// rounds to zero.
pub fn resolve(
    source_width: u32,
    source_height: u32,
    requested_width: Option<f64>,
    requested_height: Option<f64>,
) -> Result<ResolvedDimensions, TransformError> {
    for value in [requested_width, requested_height].into_iter().flatten() {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid("Invalid resize parameters."));
        }
    }

    let resolved = match (requested_width, requested_height) {
        (None, None) => ResolvedDimensions {
            width: source_width,
            height: source_height,
        },
        (Some(width), None) => ResolvedDimensions {
            width: round_clamped(width),
            height: round_clamped(width * source_height as f64 / source_width as f64),
        },
        (None, Some(height)) => ResolvedDimensions {
            width: round_clamped(height * source_width as f64 / source_height as f64),
            height: round_clamped(height),
        },
        (Some(width), Some(height)) => {
            // Both explicit: verbatim, no aspect enforcement. A value that
            // rounds to zero cannot produce a sane output size.
            let width = width.round();
            let height = height.round();
            if width < 1.0 || height < 1.0 {
                return Err(invalid("Invalid resize parameters."));
            }
            ResolvedDimensions {
                width: width as u32,
                height: height as u32,
            }
        }
    };

    Ok(resolved)
}

/// Round to nearest integer with a minimum of 1 pixel.
fn round_clamped(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

fn invalid(message: &str) -> TransformError {
    TransformError::InvalidDimensions(message.to_string())
}

// =============================================================================
// Tests
// =============================================================================
