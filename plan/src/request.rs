//! Scan request assembly
//!
//! The controller takes the step counts and range positions exactly as
//! the controls report them, as strings; it does its own integer
//! parsing and bounds checks. Nothing here validates or normalizes.

use serde::{Deserialize, Serialize};

use crate::MAX_SHOTS;

/// Total number of pictures a scan will capture: one per combination of
/// camera declination step and model rotation step. Saturates on
/// overflow so arbitrary inputs still trip the shot limit.
pub fn total_shots(declination_steps: u32, rotation_steps: u32) -> u32 {
    declination_steps.saturating_mul(rotation_steps)
}

/// Advisory mirror of the controller-side shot limit. The request is
/// built and sent regardless; the controller rejects oversized scans
/// itself with HTTP 400.
pub fn exceeds_max_shots(declination_steps: u32, rotation_steps: u32) -> bool {
    total_shots(declination_steps, rotation_steps) > MAX_SHOTS
}

/// The declination range selected on the dual-handle sweep control, as
/// raw normalized positions (0-100).
///
/// The control does not order its handles: `declination_start` may
/// exceed `declination_stop`, and the controller contract expects the
/// pair exactly as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRange {
    pub declination_start: String,
    pub declination_stop: String,
}

impl CaptureRange {
    pub fn new(declination_start: impl Into<String>, declination_stop: impl Into<String>) -> Self {
        Self {
            declination_start: declination_start.into(),
            declination_stop: declination_stop.into(),
        }
    }

    /// Build a range from the control's reported handle pair
    /// (`"a,b"`). The control reports **stop first**: stop is taken
    /// from index 0 and start from index 1. The server contract was
    /// written against that ordering; do not swap without confirming
    /// against the controller.
    pub fn from_handle_pair(pair: &str) -> Option<Self> {
        let mut parts = pair.splitn(2, ',');
        let stop = parts.next()?.trim();
        let start = parts.next()?.trim();
        Some(Self::new(start, stop))
    }
}

/// The JSON body of one `POST /api/scan`. Values are carried as the raw
/// strings read from the controls at trigger time; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub declination_steps: String,
    pub rotation_steps: String,
    pub start: String,
    pub stop: String,
}

/// Assemble the scan payload from the control state at trigger time.
/// Pure construction; sending it is the session client's job.
pub fn build_scan_request(
    declination_steps: impl Into<String>,
    rotation_steps: impl Into<String>,
    range: &CaptureRange,
) -> ScanRequest {
    ScanRequest {
        declination_steps: declination_steps.into(),
        rotation_steps: rotation_steps.into(),
        start: range.declination_start.clone(),
        stop: range.declination_stop.clone(),
    }
}
