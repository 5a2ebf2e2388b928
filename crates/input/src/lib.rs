//! Input: the closed set of pointer and keyboard events the orbit controller consumes.
//!
//! # Invariants
//! - Window-system events are translated into [`InputEvent`] at the app edge;
//!   nothing downstream sees raw winit events.
//! - Coordinates and keys are valid by construction; only the text form can fail.

pub mod event;

pub use event::{InputEvent, InputParseError, MotionKey, parse_script};

pub fn crate_info() -> &'static str {
    "spinlab-input v0.1.0"
}
