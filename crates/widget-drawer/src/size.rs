//! Rendered-height arithmetic.
//!
//! Heights are in pixels. The result is not clamped: a small natural height
//! combined with a negative offset can produce zero or a negative height, and
//! callers that lay out views must handle that themselves.

use crate::entry::SizeOffset;

/// Smallest size offset.
pub const SIZE_MIN: i32 = -5;
/// The "no override" size offset.
pub const SIZE_DEFAULT: i32 = -1;
/// Largest size offset.
pub const SIZE_MAX: i32 = 4;
/// Height change per offset unit, in pixels.
pub const SIZE_STEP: i32 = 100;

/// Computes the height a widget should render at.
///
/// `SIZE_DEFAULT` returns `natural_height` unchanged. Any other offset adds
/// `(offset + 1) * SIZE_STEP`, so offsets below the default shrink the widget
/// and offsets above it grow it. Offset `0` is one step taller than natural.
pub fn rendered_height(natural_height: i32, offset: SizeOffset) -> i32 {
    if offset.is_default() {
        natural_height
    } else {
        natural_height.saturating_add((offset.get() + 1) * SIZE_STEP)
    }
}
