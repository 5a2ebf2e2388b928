use glam::{Mat4, Vec3};

/// Perspective camera as a demo declares it: lens parameters plus where it
/// sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
        }
    }
}

impl PerspectiveCamera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn clip_range(&self) -> ClipRange {
        ClipRange::new(self.near, self.far)
    }

    pub fn set_clip_range(&mut self, range: ClipRange) {
        self.near = range.near();
        self.far = range.far();
    }
}

/// Near/far pair edited from the UI. `far` is kept at least `min_gap`
/// beyond `near`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRange {
    near: f32,
    far: f32,
    min_gap: f32,
}

impl ClipRange {
    pub const DEFAULT_GAP: f32 = 0.1;

    pub fn new(near: f32, far: f32) -> Self {
        let mut range = Self {
            near,
            far,
            min_gap: Self::DEFAULT_GAP,
        };
        range.set_near(near);
        range
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Move `near`, pushing `far` out if needed.
    pub fn set_near(&mut self, near: f32) {
        self.near = near;
        self.far = self.far.max(near + self.min_gap);
    }

    /// Move `far`. If it lands inside the gap it is pushed back out; `near`
    /// never moves.
    pub fn set_far(&mut self, far: f32) {
        self.far = far;
        self.set_near(self.near);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_matrices_are_finite() {
        let cam = PerspectiveCamera::default();
        let vp = cam.projection_matrix(16.0 / 9.0) * cam.view_matrix();
        assert!(vp.is_finite());
    }

    #[test]
    fn view_looks_at_target() {
        let cam = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 50.0),
            target: Vec3::new(0.0, 5.0, 0.0),
            ..Default::default()
        };
        let target_in_view = cam.view_matrix().transform_point3(cam.target);
        assert!(target_in_view.x.abs() < 1e-4);
        assert!(target_in_view.y.abs() < 1e-4);
        assert!(target_in_view.z < 0.0);
    }

    #[test]
    fn raising_near_pushes_far() {
        let mut range = ClipRange::new(0.1, 1.0);
        range.set_near(5.0);
        assert_eq!(range.near(), 5.0);
        assert!((range.far() - 5.1).abs() < 1e-6);
    }

    #[test]
    fn lowering_far_below_near_is_corrected() {
        let mut range = ClipRange::new(10.0, 1000.0);
        range.set_far(2.0);
        assert_eq!(range.near(), 10.0);
        assert!((range.far() - 10.1).abs() < 1e-5);
    }

    #[test]
    fn far_within_range_is_kept() {
        let mut range = ClipRange::new(0.1, 1000.0);
        range.set_far(40.0);
        assert_eq!(range.far(), 40.0);
        assert_eq!(range.near(), 0.1);
    }

    #[test]
    fn camera_round_trips_clip_range() {
        let mut cam = PerspectiveCamera::default();
        let mut range = cam.clip_range();
        range.set_near(20.0);
        cam.set_clip_range(range);
        assert_eq!(cam.near, 20.0);
        assert_eq!(cam.far, 1000.0);
    }
}
