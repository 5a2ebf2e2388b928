//! Inertial orbit controller: pointer drags and motion keys become yaw/pitch
//! angles, with angular velocity that coasts and decays after release.
//!
//! # Invariants
//! - Yaw and pitch change exactly once per frame from exactly one source:
//!   the pointer move while dragging, [`OrbitState::advance`] while coasting.
//! - While not dragging the angular velocity is scaled by `1 - friction`
//!   every frame and is never reset to zero.
//! - Pitch is unbounded; the model matrix is rebuilt from the angles each
//!   frame instead of being accumulated.
//! - All mutation happens on the thread that owns the state.

pub mod config;
pub mod controller;
pub mod state;

pub use config::{ConfigError, OrbitConfig};
pub use controller::InertialOrbit;
pub use state::{OrbitAngles, OrbitState, Step, handle, parse_steps, replay};

pub fn crate_info() -> &'static str {
    "spinlab-orbit v0.1.0"
}
