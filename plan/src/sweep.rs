//! Declination sweep geometry
//!
//! The camera arm sweeps a fixed arc. Range controls report normalized
//! positions in 0-100; only the display layer ever sees degrees. The
//! wire payload carries the raw positions, so conversions here are for
//! labels and tooltips, never for the controller.

use crate::{DEGREES_PER_POSITION, SWEEP_START_ANGLE};

/// Convert a normalized position (0-100) to the physical camera angle
/// in degrees. Angles run downward from vertical, so position 0 is
/// straight up (+90) and position 100 is ~20 degrees below horizontal.
pub fn position_to_degrees(position: u32) -> f64 {
    SWEEP_START_ANGLE - position as f64 * DEGREES_PER_POSITION
}

/// Format the angle label shown next to a range handle.
///
/// Degrees are truncated toward zero (not rounded) to match what the
/// controller operators have always seen on the tooltip.
pub fn degree_label(position: u32) -> String {
    format!("{}\u{b0}", position_to_degrees(position).trunc() as i32)
}
