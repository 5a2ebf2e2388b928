//! Shared value types for the spinlab demos.
//!
//! # Invariants
//! - Types here are plain values with no behaviour tied to a backend.

mod time;
mod types;

pub use time::FrameClock;
pub use types::{Color, SurfaceSize};
