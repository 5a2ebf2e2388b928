use crate::config::OrbitConfig;
use crate::state::{OrbitAngles, OrbitState, handle};
use spinlab_input::InputEvent;

/// Owns a config and the live state for a render loop.
///
/// Input callbacks call [`InertialOrbit::handle`]; the frame callback calls
/// [`InertialOrbit::advance`] exactly once per rendered frame.
#[derive(Debug, Clone, Default)]
pub struct InertialOrbit {
    config: OrbitConfig,
    state: OrbitState,
}

impl InertialOrbit {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            state: OrbitState::default(),
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn angles(&self) -> OrbitAngles {
        self.state.angles()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: InputEvent) {
        let was_dragging = self.state.dragging;
        self.state = handle(&self.config, self.state, event);
        match (was_dragging, self.state.dragging) {
            (false, true) => tracing::debug!("drag started"),
            (true, false) => tracing::debug!(
                velocity = ?self.state.angular_velocity,
                "drag ended, coasting"
            ),
            _ => {}
        }
    }

    /// Per-frame step; returns the angles to compose this frame's transform.
    pub fn advance(&mut self) -> OrbitAngles {
        self.state = self.state.advance(&self.config);
        self.state.angles()
    }

    /// Back to rest with the same config.
    pub fn reset(&mut self) {
        self.state = OrbitState::default();
    }
}
