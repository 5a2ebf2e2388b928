use crate::camera::PerspectiveCamera;
use crate::mesh::{self, LineVertex, MeshData};
use glam::{EulerRot, Mat4, Quat, UVec3, Vec3};
use spinlab_common::Color;
use std::path::PathBuf;

/// Scale applied to frame deltas (milliseconds) before animating objects.
pub const TIME_SCALE: f64 = 0.1;

/// Procedural geometry an object is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Axis-aligned box centred on the origin; `segments` per axis (x, y, z).
    Box { size: Vec3, segments: UVec3 },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
}

impl Primitive {
    pub fn cube(size: f32) -> Self {
        Self::Box {
            size: Vec3::splat(size),
            segments: UVec3::ONE,
        }
    }

    pub fn mesh(&self) -> MeshData {
        match *self {
            Self::Box { size, segments } => mesh::box_mesh(size, segments),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => mesh::sphere_mesh(radius, width_segments, height_segments),
            Self::Plane { width, height } => mesh::plane_mesh(width, height),
        }
    }
}

/// How colour is assigned to a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// One colour per box face, in +X, -X, +Y, -Y, +Z, -Z order.
    PerFace([Color; 6]),
}

impl Paint {
    /// Colour for a vertex in face group `face`.
    pub fn color_for(&self, face: u32) -> Color {
        match self {
            Self::Solid(c) => *c,
            Self::PerFace(faces) => faces[face as usize % faces.len()],
        }
    }
}

/// Lighting model of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Unlit flat colour.
    Basic,
    /// Diffuse + specular under scene lights.
    Phong,
}

/// Which faces of a mesh are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub paint: Paint,
    pub shading: Shading,
    pub opacity: f32,
    pub side: Side,
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Self {
            paint: Paint::Solid(color),
            shading: Shading::Basic,
            opacity: 1.0,
            side: Side::Front,
        }
    }

    pub fn phong(color: Color) -> Self {
        Self {
            shading: Shading::Phong,
            ..Self::basic(color)
        }
    }

    pub fn with_side(self, side: Side) -> Self {
        Self { side, ..self }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// A mesh placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub primitive: Primitive,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    /// Radians added to `rotation` per scaled millisecond.
    pub spin: Vec3,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, primitive: Primitive, material: Material) -> Self {
        Self {
            name: name.into(),
            primitive,
            material,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn at(self, position: Vec3) -> Self {
        Self { position, ..self }
    }

    pub fn rotated(self, rotation: Vec3) -> Self {
        Self { rotation, ..self }
    }

    pub fn spinning(self, spin: Vec3) -> Self {
        Self { spin, ..self }
    }

    pub fn shadows(self, cast: bool, receive: bool) -> Self {
        Self {
            cast_shadow: cast,
            receive_shadow: receive,
            ..self
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Shadow-map settings a light requests. Recorded, not rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    /// Half-width of the orthographic shadow frustum (directional lights).
    pub extent: f32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            map_size: 512,
            near: 0.5,
            far: 500.0,
            extent: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
        target: Vec3,
        shadow: Option<ShadowParams>,
    },
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
        /// Cut-off range; 0 means unlimited.
        distance: f32,
        decay: f32,
        shadow: Option<ShadowParams>,
    },
    Spot {
        color: Color,
        intensity: f32,
        position: Vec3,
        target: Vec3,
        distance: f32,
        /// Cone half-angle in radians.
        angle: f32,
        decay: f32,
    },
}

impl Light {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ambient { .. } => "ambient",
            Self::Hemisphere { .. } => "hemisphere",
            Self::Directional { .. } => "directional",
            Self::Point { .. } => "point",
            Self::Spot { .. } => "spot",
        }
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(
            self,
            Self::Directional {
                shadow: Some(_),
                ..
            } | Self::Point {
                shadow: Some(_),
                ..
            }
        )
    }
}

/// Line-drawn scene aids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Helper {
    /// X red, Y green, Z blue, each `size` long.
    Axes { size: f32 },
    /// Square grid on the XZ plane.
    Grid {
        size: f32,
        divisions: u32,
        center_color: Color,
        line_color: Color,
    },
    /// Small three-axis cross marking a light.
    LightMarker {
        position: Vec3,
        color: Color,
        size: f32,
    },
}

impl Helper {
    pub fn grid(size: f32, divisions: u32) -> Self {
        Self::Grid {
            size,
            divisions,
            center_color: Color::hex(0x444444),
            line_color: Color::hex(0x888888),
        }
    }

    pub fn lines(&self) -> Vec<LineVertex> {
        match *self {
            Self::Axes { size } => mesh::axes_lines(size),
            Self::Grid {
                size,
                divisions,
                center_color,
                line_color,
            } => mesh::grid_lines(size, divisions, center_color, line_color),
            Self::LightMarker {
                position,
                color,
                size,
            } => mesh::marker_lines(position, size, color),
        }
    }
}

/// A model file the demo wants in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub path: PathBuf,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Start the first animation clip once loaded.
    pub play_first_clip: bool,
}

/// Orbit-camera settings of a scene demo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsConfig {
    pub target: Vec3,
    /// Per-frame damping; `None` stops as soon as the drag ends.
    pub damping: Option<f32>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            damping: None,
        }
    }
}

/// Everything a scene demo draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub camera: PerspectiveCamera,
    pub controls: ControlsConfig,
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    pub helpers: Vec<Helper>,
    pub shadows_enabled: bool,
    pub model: Option<ModelRequest>,
    /// Expose fov/near/far editing in the UI.
    pub editable_camera: bool,
}

impl Scene {
    pub fn new(name: impl Into<String>, camera: PerspectiveCamera) -> Self {
        Self {
            name: name.into(),
            background: Color::BLACK,
            camera,
            controls: ControlsConfig {
                target: camera.target,
                damping: None,
            },
            objects: Vec::new(),
            lights: Vec::new(),
            helpers: Vec::new(),
            shadows_enabled: false,
            model: None,
            editable_camera: false,
        }
    }

    pub fn add_object(&mut self, object: SceneObject) -> &mut Self {
        self.objects.push(object);
        self
    }

    pub fn add_light(&mut self, light: Light) -> &mut Self {
        self.lights.push(light);
        self
    }

    pub fn add_helper(&mut self, helper: Helper) -> &mut Self {
        self.helpers.push(helper);
        self
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Advance spinning objects by a frame delta in milliseconds.
    pub fn animate(&mut self, dt_ms: f64) {
        let dt = (dt_ms * TIME_SCALE) as f32;
        for object in self.objects.iter_mut().filter(|o| o.spin != Vec3::ZERO) {
            object.rotation += object.spin * dt;
        }
    }

    /// All helper lines, ready for a line-list draw.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        self.helpers.iter().flat_map(Helper::lines).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_spinner() -> Scene {
        let mut scene = Scene::new("test", PerspectiveCamera::default());
        scene
            .add_object(
                SceneObject::new("spinner", Primitive::cube(1.0), Material::basic(Color::WHITE))
                    .spinning(Vec3::new(0.001, 0.001, 0.0)),
            )
            .add_object(SceneObject::new(
                "still",
                Primitive::cube(1.0),
                Material::basic(Color::WHITE),
            ));
        scene
    }

    #[test]
    fn animate_spins_only_spinning_objects() {
        let mut scene = scene_with_spinner();
        scene.animate(16.0);
        let spinner = scene.object("spinner").unwrap();
        assert!((spinner.rotation.x - 0.0016).abs() < 1e-7);
        assert!((spinner.rotation.y - 0.0016).abs() < 1e-7);
        assert_eq!(spinner.rotation.z, 0.0);
        assert_eq!(scene.object("still").unwrap().rotation, Vec3::ZERO);
    }

    #[test]
    fn per_face_paint_indexes_faces() {
        let faces = [
            Color::hex(0xff0000),
            Color::hex(0x00ff00),
            Color::hex(0x0000ff),
            Color::hex(0xffff00),
            Color::hex(0xff00ff),
            Color::hex(0x00ffff),
        ];
        let paint = Paint::PerFace(faces);
        assert_eq!(paint.color_for(2), faces[2]);
        assert_eq!(Paint::Solid(Color::WHITE).color_for(5), Color::WHITE);
    }

    #[test]
    fn model_matrix_places_object() {
        let object = SceneObject::new("p", Primitive::cube(1.0), Material::basic(Color::WHITE))
            .at(Vec3::new(5.0, 2.0, 0.0));
        let origin = object.model_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(5.0, 2.0, 0.0));
    }

    #[test]
    fn rotated_plane_faces_up() {
        let plane = SceneObject::new(
            "ground",
            Primitive::Plane {
                width: 40.0,
                height: 40.0,
            },
            Material::phong(Color::WHITE),
        )
        .rotated(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        let normal = plane.model_matrix().transform_vector3(Vec3::Z);
        assert!((normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn transparency_follows_opacity() {
        assert!(!Material::phong(Color::WHITE).is_transparent());
        assert!(Material::phong(Color::WHITE).with_opacity(0.5).is_transparent());
    }

    #[test]
    fn shadow_casting_lights() {
        let dir = Light::Directional {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::Y,
            target: Vec3::ZERO,
            shadow: Some(ShadowParams::default()),
        };
        let ambient = Light::Ambient {
            color: Color::WHITE,
            intensity: 0.1,
        };
        assert!(dir.casts_shadow());
        assert!(!ambient.casts_shadow());
        assert_eq!(dir.kind(), "directional");
    }

    #[test]
    fn line_vertices_collects_helpers() {
        let mut scene = Scene::new("lines", PerspectiveCamera::default());
        scene
            .add_helper(Helper::Axes { size: 3.0 })
            .add_helper(Helper::grid(10.0, 10));
        assert_eq!(scene.line_vertices().len(), 6 + 11 * 4);
    }
}
