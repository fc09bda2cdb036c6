//! Photogrammetry Rig Session Client
//!
//! HTTP client for the rig controller's REST API: resolves the API
//! root (direct controller vs. nginx-proxied), forwards the drive
//! token, submits capture plans, and runs the recurring status poll
//! that feeds the session event log.
//!
//! Capture-plan arithmetic lives in `pgrig_plan`; this crate only moves
//! the resulting payloads over the wire.

mod client;
mod cookies;
mod error;
mod poll;
mod proxy;

pub use client::*;
pub use cookies::*;
pub use error::*;
pub use poll::*;
pub use proxy::*;

/// Port the controller listens on when not fronted by a reverse proxy.
pub const DIRECT_API_PORT: u16 = 8081;

/// Status poll cadence the UI has always used.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;
