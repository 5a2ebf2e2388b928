use glam::{Mat4, Vec3};
use spinlab_orbit::OrbitAngles;
use spinlab_render::{PerspectiveCamera, RenderView, Scene};

/// Camera on a sphere around a target, steered by orbit controller angles.
///
/// The scene camera fixes the starting yaw, pitch and distance; controller
/// angles are added on top. Controller pitch is subtracted so that dragging
/// downward raises the eye. Pitch is not clamped: the up vector is taken
/// tangent to the sphere, so the view stays well defined through the poles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    base_yaw: f32,
    base_pitch: f32,
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_camera(&PerspectiveCamera::default(), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn from_camera(camera: &PerspectiveCamera, target: Vec3) -> Self {
        let offset = camera.position - target;
        let distance = offset.length().max(1e-3);
        Self {
            target,
            distance,
            base_yaw: offset.x.atan2(offset.z),
            base_pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            fov_degrees: camera.fov_degrees,
            min_distance: distance * 0.1,
            max_distance: distance * 10.0,
        }
    }

    pub fn for_scene(scene: &Scene) -> Self {
        Self::from_camera(&scene.camera, scene.controls.target)
    }

    fn spherical(&self, angles: OrbitAngles) -> (f32, f32) {
        (self.base_yaw + angles.yaw, self.base_pitch - angles.pitch)
    }

    pub fn eye(&self, angles: OrbitAngles) -> Vec3 {
        let (yaw, pitch) = self.spherical(angles);
        self.target
            + self.distance
                * Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos())
    }

    fn up(&self, angles: OrbitAngles) -> Vec3 {
        let (yaw, pitch) = self.spherical(angles);
        Vec3::new(-pitch.sin() * yaw.sin(), pitch.cos(), -pitch.sin() * yaw.cos())
    }

    /// Scale the distance by 0.9 per wheel step in, 1/0.9 per step out.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance * 0.9_f32.powf(steps))
            .clamp(self.min_distance, self.max_distance);
    }

    pub fn view_matrix(&self, angles: OrbitAngles) -> Mat4 {
        Mat4::look_at_rh(self.eye(angles), self.target, self.up(angles))
    }

    pub fn render_view(&self, angles: OrbitAngles) -> RenderView {
        RenderView {
            eye: self.eye(angles),
            target: self.target,
            up: self.up(angles),
            fov_degrees: self.fov_degrees,
        }
    }

    /// Pick up field-of-view edits made on the scene camera. Near and far
    /// are read from the scene when the projection is built.
    pub fn sync_lens(&mut self, camera: &PerspectiveCamera) {
        self.fov_degrees = camera.fov_degrees;
    }
}
