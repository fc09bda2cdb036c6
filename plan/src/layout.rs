//! Step-count label positioning
//!
//! The step-count sliders float a value label over the track. The label
//! is centered on the handle, which would push it past the track edge at
//! the two boundary values, so one handle-width of compensation is
//! applied there.

/// Pixel offset for a slider value label, measured from the left edge of
/// the track. `track_width` and `label_width` are in pixels; `value`
/// must lie within `min..=max` (the numeric input clamps it there).
pub fn label_offset_px(value: i32, min: i32, max: i32, track_width: f64, label_width: f64) -> f64 {
    let per_step = track_width / (max - min) as f64;
    let mut px = (value - min) as f64 * per_step - label_width / 2.0;
    if value == min {
        px += per_step;
    }
    if value == max {
        px -= per_step;
    }
    px
}
