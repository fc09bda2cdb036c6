//! Capture Plan Calculator
//!
//! Pure arithmetic for turning the rig's range controls into a capture
//! plan: declination sweep angles, per-axis step counts, total shot
//! counts, and the JSON payload the rig controller consumes. No I/O
//! lives here; the session client in `pgrig_client` does the sending.

mod layout;
mod request;
mod sweep;

pub use layout::*;
pub use request::*;
pub use sweep::*;

/// Top of the declination sweep, in degrees clockwise from vertical.
pub const SWEEP_START_ANGLE: f64 = 90.0;

/// Bottom of the declination sweep, roughly 20 degrees below horizontal.
pub const SWEEP_END_ANGLE: f64 = 200.0;

/// Degrees covered per unit of normalized position (positions run 0-100).
pub const DEGREES_PER_POSITION: f64 = (SWEEP_END_ANGLE - SWEEP_START_ANGLE) / 100.0;

/// Hard limit the controller enforces on a single scan; anything larger
/// is rejected with HTTP 400 server-side.
pub const MAX_SHOTS: u32 = 200;
