use crate::config::OrbitConfig;
use glam::{Mat4, Vec2};
use spinlab_common::SurfaceSize;
use spinlab_input::{InputEvent, InputParseError, MotionKey};
use std::f32::consts::TAU;
use std::str::FromStr;

/// Yaw and pitch in radians, ready to compose a model transform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitAngles {
    /// Identity rotated about Y by yaw, then about X by pitch.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch) * Mat4::from_rotation_y(self.yaw)
    }
}

/// Complete controller state. Plain value; every operation takes it by value
/// and returns the successor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitState {
    /// Accumulated horizontal angle, radians. Unbounded.
    pub yaw: f32,
    /// Accumulated vertical angle, radians. Unbounded.
    pub pitch: f32,
    /// Per-frame delta applied to `(yaw, pitch)`.
    pub angular_velocity: Vec2,
    /// Primary pointer held over the surface.
    pub dragging: bool,
    /// Last pointer position seen during the current drag.
    pub last_pointer: Option<Vec2>,
}

impl OrbitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angles(&self) -> OrbitAngles {
        OrbitAngles {
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.angles().model_matrix()
    }

    /// Start a drag at `pos`.
    pub fn pointer_down(self, pos: Vec2) -> Self {
        Self {
            dragging: true,
            last_pointer: Some(pos),
            ..self
        }
    }

    /// Convert pointer travel into rotation, applied immediately.
    ///
    /// Horizontal travel drives yaw, vertical travel drives pitch; both are
    /// negated and normalised so one surface width of travel is
    /// `2π * pointer_sensitivity` radians. No-op unless dragging.
    pub fn pointer_move(self, config: &OrbitConfig, pos: Vec2, surface: SurfaceSize) -> Self {
        if !self.dragging {
            return self;
        }
        let Some(last) = self.last_pointer else {
            return Self {
                last_pointer: Some(pos),
                ..self
            };
        };

        let delta = -(pos - last) * TAU / surface.extent() * config.pointer_sensitivity;
        Self {
            yaw: self.yaw + delta.x,
            pitch: self.pitch + delta.y,
            angular_velocity: delta,
            last_pointer: Some(pos),
            ..self
        }
    }

    /// End the drag. Velocity is kept so the rotation coasts on.
    pub fn pointer_up(self) -> Self {
        Self {
            dragging: false,
            last_pointer: None,
            ..self
        }
    }

    /// Pointer left the surface; ends the drag like a release.
    pub fn pointer_leave(self) -> Self {
        self.pointer_up()
    }

    /// Nudge the shared velocity accumulator by `key_speed`.
    pub fn key_press(self, config: &OrbitConfig, key: MotionKey) -> Self {
        Self {
            angular_velocity: self.angular_velocity + key.direction() * config.key_speed,
            ..self
        }
    }

    /// Per-frame step. While coasting, scale the velocity by `1 - friction`
    /// and then add the scaled velocity to the angles. While dragging the
    /// pointer move already rotated this frame, so nothing changes.
    pub fn advance(self, config: &OrbitConfig) -> Self {
        if self.dragging {
            return self;
        }
        let velocity = self.angular_velocity * (1.0 - config.friction);
        Self {
            yaw: self.yaw + velocity.x,
            pitch: self.pitch + velocity.y,
            angular_velocity: velocity,
            ..self
        }
    }
}

/// Dispatch one input event to the matching state transition.
pub fn handle(config: &OrbitConfig, state: OrbitState, event: InputEvent) -> OrbitState {
    match event {
        InputEvent::PointerDown(pos) => state.pointer_down(pos),
        InputEvent::PointerMove { pos, surface } => state.pointer_move(config, pos, surface),
        InputEvent::PointerUp => state.pointer_up(),
        InputEvent::PointerLeave => state.pointer_leave(),
        InputEvent::KeyPress(key) => state.key_press(config, key),
    }
}

/// A scripted unit of work: an input event or one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Input(InputEvent),
    Frame,
}

impl FromStr for Step {
    type Err = InputParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "frame" {
            Ok(Self::Frame)
        } else {
            s.parse().map(Self::Input)
        }
    }
}

/// Parse a `;`-separated script of events and `frame` markers.
/// `frames N` expands to `N` frame steps.
pub fn parse_steps(script: &str) -> Result<Vec<Step>, InputParseError> {
    let mut steps = Vec::new();
    for entry in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(count) = entry.strip_prefix("frames ") {
            let count: usize = count
                .trim()
                .parse()
                .map_err(|_| InputParseError::Number(count.trim().to_string()))?;
            steps.extend(std::iter::repeat_n(Step::Frame, count));
        } else {
            steps.push(entry.parse()?);
        }
    }
    Ok(steps)
}

/// Fold a script into a fresh state. Identical scripts give identical states.
pub fn replay(config: &OrbitConfig, steps: &[Step]) -> OrbitState {
    steps
        .iter()
        .fold(OrbitState::default(), |state, step| match *step {
            Step::Input(event) => handle(config, state, event),
            Step::Frame => state.advance(config),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn cfg() -> OrbitConfig {
        OrbitConfig::default()
    }

    fn surface() -> SurfaceSize {
        SurfaceSize::new(800, 600)
    }

    fn coasting(vx: f32, vy: f32) -> OrbitState {
        OrbitState {
            angular_velocity: Vec2::new(vx, vy),
            ..OrbitState::default()
        }
    }

    #[test]
    fn starts_at_rest() {
        let s = OrbitState::new();
        assert_eq!(s.yaw, 0.0);
        assert_eq!(s.pitch, 0.0);
        assert_eq!(s.angular_velocity, Vec2::ZERO);
        assert!(!s.dragging);
        assert!(s.last_pointer.is_none());
    }

    #[test]
    fn pointer_down_starts_drag() {
        let s = OrbitState::new().pointer_down(Vec2::new(3.0, 4.0));
        assert!(s.dragging);
        assert_eq!(s.last_pointer, Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn move_without_drag_is_noop() {
        let start = coasting(0.2, -0.1);
        let mut s = start;
        for i in 0..10 {
            s = s.pointer_move(&cfg(), Vec2::new(i as f32 * 7.0, 3.0), surface());
        }
        assert_eq!(s, start);
    }

    #[test]
    fn drag_scenario_from_100_to_110() {
        let s = OrbitState::new()
            .pointer_down(Vec2::new(100.0, 100.0))
            .pointer_move(&cfg(), Vec2::new(110.0, 100.0), surface());
        let expected = -10.0 * TAU / 800.0 * 0.3;
        assert!((expected - -0.02356).abs() < 1e-5);
        assert!((s.yaw - expected).abs() < EPS);
        assert!((s.angular_velocity.x - expected).abs() < EPS);
        assert_eq!(s.pitch, 0.0);
        assert_eq!(s.angular_velocity.y, 0.0);
        assert_eq!(s.last_pointer, Some(Vec2::new(110.0, 100.0)));
    }

    #[test]
    fn vertical_drag_uses_surface_height() {
        let s = OrbitState::new()
            .pointer_down(Vec2::ZERO)
            .pointer_move(&cfg(), Vec2::new(0.0, 60.0), surface());
        let expected = -60.0 * TAU / 600.0 * 0.3;
        assert!((s.pitch - expected).abs() < EPS);
        assert!((s.angular_velocity.y - expected).abs() < EPS);
        assert_eq!(s.yaw, 0.0);
    }

    #[test]
    fn move_replaces_velocity_rather_than_adding() {
        let s = OrbitState::new()
            .key_press(&cfg(), MotionKey::Right)
            .pointer_down(Vec2::ZERO)
            .pointer_move(&cfg(), Vec2::new(8.0, 0.0), surface());
        let expected = -8.0 * TAU / 800.0 * 0.3;
        assert!((s.angular_velocity.x - expected).abs() < EPS);
    }

    #[test]
    fn advance_while_dragging_changes_nothing() {
        let dragged = OrbitState::new()
            .pointer_down(Vec2::new(10.0, 10.0))
            .pointer_move(&cfg(), Vec2::new(30.0, 50.0), surface());
        let mut s = dragged;
        for _ in 0..5 {
            s = s.advance(&cfg());
        }
        assert_eq!(s, dragged);
    }

    #[test]
    fn release_keeps_velocity_and_clears_pointer() {
        let dragged = OrbitState::new()
            .pointer_down(Vec2::ZERO)
            .pointer_move(&cfg(), Vec2::new(20.0, 0.0), surface());
        let released = dragged.pointer_up();
        assert!(!released.dragging);
        assert!(released.last_pointer.is_none());
        assert_eq!(released.angular_velocity, dragged.angular_velocity);
        assert_eq!(dragged.pointer_leave(), released);
    }

    #[test]
    fn advance_scales_then_adds() {
        let c = OrbitConfig::with_friction(0.25);
        let s = coasting(0.4, -0.8).advance(&c);
        assert!((s.angular_velocity.x - 0.3).abs() < EPS);
        assert!((s.angular_velocity.y - -0.6).abs() < EPS);
        assert!((s.yaw - 0.3).abs() < EPS);
        assert!((s.pitch - -0.6).abs() < EPS);
    }

    #[test]
    fn rest_state_is_fixed_point() {
        let mut s = OrbitState::new();
        for _ in 0..1000 {
            s = s.advance(&cfg());
            assert_eq!(s.yaw, 0.0);
            assert_eq!(s.pitch, 0.0);
        }
    }

    #[test]
    fn key_d_then_advance() {
        let s = OrbitState::new().key_press(&cfg(), MotionKey::Right);
        assert!((s.angular_velocity.x - 0.05).abs() < EPS);
        let s = s.advance(&cfg());
        assert!((s.angular_velocity.x - 0.0475).abs() < EPS);
        assert!((s.yaw - 0.0475).abs() < EPS);
    }

    #[test]
    fn key_directions() {
        let c = cfg();
        let s = OrbitState::new()
            .key_press(&c, MotionKey::Forward)
            .key_press(&c, MotionKey::Left);
        assert!((s.angular_velocity - Vec2::new(-0.05, -0.05)).length() < EPS);
        let s = s.key_press(&c, MotionKey::Back).key_press(&c, MotionKey::Back);
        assert!((s.angular_velocity.y - 0.05).abs() < EPS);
    }

    #[test]
    fn keys_compose_with_pointer_velocity() {
        let dragged = OrbitState::new()
            .pointer_down(Vec2::ZERO)
            .pointer_move(&cfg(), Vec2::new(0.0, 30.0), surface())
            .pointer_up();
        let nudged = dragged.key_press(&cfg(), MotionKey::Right);
        assert!((nudged.angular_velocity.x - 0.05).abs() < EPS);
        assert_eq!(nudged.angular_velocity.y, dragged.angular_velocity.y);
    }

    #[test]
    fn hundred_frames_of_decay() {
        let mut s = coasting(1.0, 0.0).pointer_up();
        let mut prev = s.angular_velocity.x;
        for _ in 0..100 {
            s = s.advance(&cfg());
            assert!(s.angular_velocity.x < prev);
            assert!(s.angular_velocity.x > 0.0);
            prev = s.angular_velocity.x;
        }
        assert!((s.angular_velocity.x - 0.95_f32.powi(100)).abs() < 1e-5);
        assert!((s.angular_velocity.x - 0.00592).abs() < 1e-5);
    }

    #[test]
    fn decay_magnitude_strictly_decreases() {
        for friction in [0.01, 0.05, 0.5, 0.9] {
            let c = OrbitConfig::with_friction(friction);
            let mut s = coasting(-3.0, 2.0);
            let mut prev = s.angular_velocity.length();
            for _ in 0..10 {
                s = s.advance(&c);
                let len = s.angular_velocity.length();
                assert!(len < prev, "friction {friction}");
                assert!(len > 0.0);
                prev = len;
            }
        }
    }

    #[test]
    fn pitch_is_not_clamped() {
        let mut s = OrbitState::new().pointer_down(Vec2::ZERO);
        for i in 1..=20 {
            s = s.pointer_move(&cfg(), Vec2::new(0.0, -(i as f32) * 300.0), surface());
        }
        assert!(s.pitch > std::f32::consts::PI);
    }

    #[test]
    fn handle_matches_operations() {
        let c = cfg();
        let pos = Vec2::new(40.0, 20.0);
        let s = OrbitState::new();
        assert_eq!(handle(&c, s, InputEvent::PointerDown(pos)), s.pointer_down(pos));

        let dragging = s.pointer_down(Vec2::ZERO);
        assert_eq!(
            handle(
                &c,
                dragging,
                InputEvent::PointerMove {
                    pos,
                    surface: surface()
                }
            ),
            dragging.pointer_move(&c, pos, surface())
        );
        assert_eq!(handle(&c, dragging, InputEvent::PointerUp), dragging.pointer_up());
        assert_eq!(
            handle(&c, dragging, InputEvent::PointerLeave),
            dragging.pointer_leave()
        );
        assert_eq!(
            handle(&c, s, InputEvent::KeyPress(MotionKey::Back)),
            s.key_press(&c, MotionKey::Back)
        );
    }

    #[test]
    fn model_matrix_rotates_y_then_x() {
        let angles = OrbitAngles {
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: std::f32::consts::FRAC_PI_2,
        };
        let m = angles.model_matrix();
        // +X turns to -Z under yaw, then to +Y under pitch.
        let v = m.transform_vector3(glam::Vec3::X);
        assert!((v - glam::Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn model_matrix_at_rest_is_identity() {
        assert_eq!(OrbitState::new().model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn parse_steps_expands_frames() {
        let steps = parse_steps("down 0 0; frame; frames 3; up").unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[1], Step::Frame);
        assert_eq!(steps[4], Step::Frame);
        assert_eq!(steps[5], Step::Input(InputEvent::PointerUp));
        assert!(parse_steps("frames many").is_err());
    }

    #[test]
    fn replay_is_deterministic() {
        let steps = parse_steps(
            "down 100 100; move 130 90 800 600; frame; move 160 80 800 600; frame; up; key d; frames 30",
        )
        .unwrap();
        let a = replay(&cfg(), &steps);
        let b = replay(&cfg(), &steps);
        assert_eq!(a, b);
        assert!(!a.dragging);
        assert!(a.yaw != 0.0);
    }

    #[test]
    fn replay_applies_one_rotation_per_frame() {
        let c = cfg();
        let steps = parse_steps("down 0 0; move 10 0 800 600; frame").unwrap();
        let s = replay(&c, &steps);
        let expected = -10.0 * TAU / 800.0 * 0.3;
        assert!((s.yaw - expected).abs() < EPS);
    }
}
