use crate::camera::PerspectiveCamera;
use crate::scene::{
    ControlsConfig, Helper, Light, Material, ModelRequest, Paint, Primitive, Scene, SceneObject,
    ShadowParams, Side,
};
use glam::{UVec3, Vec3};
use spinlab_common::Color;
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The demos this workspace ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demo {
    Triangle,
    TexturedCube,
    Intro,
    CameraLight,
    ShadowModel,
    Collision,
}

impl Demo {
    pub const ALL: [Demo; 6] = [
        Demo::Triangle,
        Demo::TexturedCube,
        Demo::Intro,
        Demo::CameraLight,
        Demo::ShadowModel,
        Demo::Collision,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::TexturedCube => "textured-cube",
            Self::Intro => "intro",
            Self::CameraLight => "camera-light",
            Self::ShadowModel => "shadow-model",
            Self::Collision => "collision",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Triangle => "per-vertex coloured quad in clip space",
            Self::TexturedCube => "textured skybox cube turned by drag and WASD",
            Self::Intro => "spinning per-face coloured box with axes and grids",
            Self::CameraLight => "primitives under five light types, editable lens",
            Self::ShadowModel => "shadow-flagged scene with a glTF model request",
            Self::Collision => "axes and grid sandbox with a damped orbit camera",
        }
    }

    /// Whether pointer and keys feed the orbit controller in this demo.
    pub fn uses_orbit(self) -> bool {
        !matches!(self, Self::Triangle)
    }

    /// Build the demo's content from scratch.
    pub fn content(self) -> DemoContent {
        tracing::debug!(demo = self.id(), "building demo content");
        match self {
            Self::Triangle => DemoContent::ColorQuad,
            Self::TexturedCube => DemoContent::TexturedCube(TexturedCubeDesc::default()),
            Self::Intro => DemoContent::Scene(intro_scene()),
            Self::CameraLight => DemoContent::Scene(camera_light_scene()),
            Self::ShadowModel => DemoContent::Scene(shadow_model_scene()),
            Self::Collision => DemoContent::Scene(collision_scene()),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.id() == s)
            .ok_or_else(|| {
                let ids: Vec<_> = Self::ALL.iter().map(|d| d.id()).collect();
                format!("unknown demo `{s}` (expected one of: {})", ids.join(", "))
            })
    }
}

/// What a demo draws.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoContent {
    /// Fixed colour quad from [`color_quad`].
    ColorQuad,
    /// Textured cube from [`skybox_cube`] under the orbit model transform.
    TexturedCube(TexturedCubeDesc),
    Scene(Scene),
}

/// Lens and texture of the textured cube demo. The view matrix is identity:
/// the camera sits at the centre of the cube.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturedCubeDesc {
    pub texture: PathBuf,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub scale: f32,
}

impl Default for TexturedCubeDesc {
    fn default() -> Self {
        Self {
            texture: PathBuf::from("skybox.png"),
            fov_degrees: 40.0,
            near: 1.0,
            far: 100.0,
            scale: 5.0,
        }
    }
}

/// Clip-space position and RGB colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

/// Model-space position and texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Full-viewport quad with red, yellow, green and blue corners.
pub fn color_quad() -> (Vec<QuadVertex>, Vec<u16>) {
    let v = |x, y, r, g, b| QuadVertex {
        position: [x, y],
        color: [r, g, b],
    };
    let vertices = vec![
        v(-1.0, -1.0, 1.0, 0.0, 0.0),
        v(1.0, -1.0, 1.0, 1.0, 0.0),
        v(1.0, 1.0, 0.0, 1.0, 0.0),
        v(-1.0, 1.0, 0.0, 0.0, 1.0),
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/// Cube of half-size `scale` whose faces sample a horizontal-cross skybox
/// atlas (4 columns, 3 rows, bottom-left UV origin).
pub fn skybox_cube(scale: f32) -> (Vec<SkyboxVertex>, Vec<u16>) {
    const T: f32 = 1.0 / 3.0;
    const TT: f32 = 2.0 / 3.0;
    #[rustfmt::skip]
    let raw: [([f32; 3], [f32; 2]); 24] = [
        // back
        ([-1.0, -1.0, -1.0], [1.0, T]),  ([1.0, -1.0, -1.0], [0.75, T]),
        ([1.0, 1.0, -1.0], [0.75, TT]),  ([-1.0, 1.0, -1.0], [1.0, TT]),
        // front
        ([-1.0, -1.0, 1.0], [0.25, T]),  ([1.0, -1.0, 1.0], [0.5, T]),
        ([1.0, 1.0, 1.0], [0.5, TT]),    ([-1.0, 1.0, 1.0], [0.25, TT]),
        // left
        ([-1.0, -1.0, -1.0], [0.0, T]),  ([-1.0, 1.0, -1.0], [0.0, TT]),
        ([-1.0, 1.0, 1.0], [0.25, TT]),  ([-1.0, -1.0, 1.0], [0.25, T]),
        // right
        ([1.0, -1.0, -1.0], [0.75, T]),  ([1.0, 1.0, -1.0], [0.75, TT]),
        ([1.0, 1.0, 1.0], [0.5, TT]),    ([1.0, -1.0, 1.0], [0.5, T]),
        // bottom
        ([-1.0, -1.0, -1.0], [0.25, 0.0]), ([-1.0, -1.0, 1.0], [0.25, T]),
        ([1.0, -1.0, 1.0], [0.5, T]),      ([1.0, -1.0, -1.0], [0.5, 0.0]),
        // top
        ([-1.0, 1.0, -1.0], [0.25, 1.0]), ([-1.0, 1.0, 1.0], [0.25, TT]),
        ([1.0, 1.0, 1.0], [0.5, TT]),     ([1.0, 1.0, -1.0], [0.5, 1.0]),
    ];
    let vertices = raw
        .iter()
        .map(|&([x, y, z], uv)| SkyboxVertex {
            position: [x * scale, y * scale, z * scale],
            uv,
        })
        .collect();
    let indices = (0..6u16)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b, b + 2, b + 3]
        })
        .collect();
    (vertices, indices)
}

fn intro_scene() -> Scene {
    let camera = PerspectiveCamera {
        position: Vec3::new(0.0, 0.0, 5.0),
        ..Default::default()
    };
    let mut scene = Scene::new("intro", camera);

    let faces = [
        Color::hex(0xff0000), // right
        Color::hex(0x00ff00), // left
        Color::hex(0x0000ff), // top
        Color::hex(0xffff00), // bottom
        Color::hex(0xff00ff), // front
        Color::hex(0x00ffff), // back
    ];
    let material = Material {
        paint: Paint::PerFace(faces),
        ..Material::basic(Color::WHITE)
    };
    let cube = SceneObject::new(
        "cube",
        Primitive::Box {
            size: Vec3::ONE,
            segments: UVec3::new(1, 4, 1),
        },
        material,
    )
    .spinning(Vec3::new(0.001, 0.001, 0.0));

    scene
        .add_object(cube)
        .add_helper(Helper::Axes { size: 3.0 })
        .add_helper(Helper::Grid {
            size: 10.0,
            divisions: 100,
            center_color: Color::hex(0xff0000),
            line_color: Color::hex(0x00ffff),
        })
        .add_helper(Helper::Grid {
            size: 10.0,
            divisions: 10,
            center_color: Color::hex(0x00ff00),
            line_color: Color::hex(0xffffff),
        });
    scene
}

/// Ground plane, sphere and box shared by the lighting demos.
fn ground(color: u32, side: Side) -> SceneObject {
    SceneObject::new(
        "ground",
        Primitive::Plane {
            width: 40.0,
            height: 40.0,
        },
        Material::phong(Color::hex(color)).with_side(side),
    )
    .rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
}

fn sphere(material: Material) -> SceneObject {
    let radius = 7.0;
    SceneObject::new(
        "sphere",
        Primitive::Sphere {
            radius,
            width_segments: 12,
            height_segments: 8,
        },
        material,
    )
    .at(Vec3::new(-radius - 1.0, radius + 2.0, 0.0))
}

fn small_box() -> SceneObject {
    let size = 4.0;
    SceneObject::new(
        "box",
        Primitive::cube(size),
        Material::phong(Color::hex(0x88aacc)),
    )
    .at(Vec3::new(size + 1.0, size / 2.0, 0.0))
}

fn lighting_camera() -> PerspectiveCamera {
    PerspectiveCamera {
        position: Vec3::new(0.0, 0.0, 50.0),
        target: Vec3::new(0.0, 5.0, 0.0),
        ..Default::default()
    }
}

fn camera_light_scene() -> Scene {
    let mut scene = Scene::new("camera-light", lighting_camera());
    scene.editable_camera = true;

    scene
        .add_object(ground(0x888888, Side::Double))
        .add_object(sphere(Material::phong(Color::hex(0xffaa88))))
        .add_object(small_box());

    let hemi_position = Vec3::Y;
    let dir_position = Vec3::new(0.0, 10.0, 0.0);
    let point_position = Vec3::new(0.0, 1.0, 0.0);
    let spot_position = Vec3::new(-30.0, 20.0, 0.0);

    scene
        .add_light(Light::Ambient {
            color: Color::WHITE,
            intensity: 0.1,
        })
        .add_light(Light::Hemisphere {
            sky: Color::hex(0xb1e1ff),
            ground: Color::hex(0xb97a20),
            intensity: 0.5,
        })
        .add_light(Light::Directional {
            color: Color::WHITE,
            intensity: 1.0,
            position: dir_position,
            target: Vec3::new(-5.0, 0.0, 0.0),
            shadow: None,
        })
        .add_light(Light::Point {
            color: Color::hex(0xffff00),
            intensity: 150.0,
            position: point_position,
            distance: 10.0,
            decay: 2.0,
            shadow: None,
        })
        .add_light(Light::Spot {
            color: Color::hex(0xff0000),
            intensity: 150.0,
            position: spot_position,
            target: Vec3::new(10.0, 10.0, 0.0),
            distance: 300.0,
            angle: 35.0_f32.to_radians(),
            decay: 2.0,
        });

    scene
        .add_helper(Helper::LightMarker {
            position: hemi_position,
            color: Color::hex(0xb1e1ff),
            size: 5.0,
        })
        .add_helper(Helper::LightMarker {
            position: dir_position,
            color: Color::WHITE,
            size: 5.0,
        })
        .add_helper(Helper::LightMarker {
            position: point_position,
            color: Color::hex(0xffff00),
            size: 2.0,
        })
        .add_helper(Helper::LightMarker {
            position: spot_position,
            color: Color::hex(0xff0000),
            size: 1.0,
        });
    scene
}

fn shadow_model_scene() -> Scene {
    let mut scene = Scene::new("shadow-model", lighting_camera());
    scene.shadows_enabled = true;

    let room = 50.0;
    scene
        .add_object(ground(0xaaeeaa, Side::Front).shadows(true, true))
        .add_object(sphere(
            Material::phong(Color::hex(0xffaa88)).with_opacity(0.5),
        ))
        .add_object(
            SceneObject::new(
                "room",
                Primitive::cube(room),
                Material::phong(Color::hex(0xaaaaff)).with_side(Side::Back),
            )
            .at(Vec3::new(0.0, room / 3.0, 0.0))
            .shadows(false, true),
        )
        .add_object(small_box());

    scene
        .add_light(Light::Directional {
            color: Color::hex(0xff0000),
            intensity: 0.5,
            position: Vec3::new(20.0, 20.0, 0.0),
            target: Vec3::ZERO,
            shadow: Some(ShadowParams {
                map_size: 1024,
                near: 0.1,
                far: 10.0,
                extent: 1.0,
            }),
        })
        .add_light(Light::Point {
            color: Color::hex(0xffff00),
            intensity: 50.0,
            position: Vec3::new(0.0, 2.0, 0.0),
            distance: 100.0,
            decay: 1.2,
            shadow: Some(ShadowParams {
                map_size: 1024,
                ..ShadowParams::default()
            }),
        });

    scene.model = Some(ModelRequest {
        path: PathBuf::from("astronaut.glb"),
        cast_shadow: true,
        receive_shadow: true,
        play_first_clip: true,
    });
    scene
}

fn collision_scene() -> Scene {
    let camera = PerspectiveCamera {
        position: Vec3::new(5.0, 5.0, 8.0),
        ..Default::default()
    };
    let mut scene = Scene::new("collision", camera);
    scene.background = Color::hex(0x111111);
    scene.shadows_enabled = true;
    scene.controls = ControlsConfig {
        target: Vec3::ZERO,
        damping: Some(0.06),
    };
    scene
        .add_helper(Helper::Axes { size: 3.0 })
        .add_helper(Helper::grid(10.0, 10));
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_of(demo: Demo) -> Scene {
        match demo.content() {
            DemoContent::Scene(scene) => scene,
            other => panic!("{demo} is not a scene demo: {other:?}"),
        }
    }

    #[test]
    fn ids_round_trip() {
        for demo in Demo::ALL {
            assert_eq!(demo.to_string().parse::<Demo>(), Ok(demo));
        }
        assert!("nope".parse::<Demo>().is_err());
    }

    #[test]
    fn raw_demos_are_not_scenes() {
        assert_eq!(Demo::Triangle.content(), DemoContent::ColorQuad);
        assert!(matches!(
            Demo::TexturedCube.content(),
            DemoContent::TexturedCube(_)
        ));
        assert!(!Demo::Triangle.uses_orbit());
        assert!(Demo::TexturedCube.uses_orbit());
    }

    #[test]
    fn quad_is_two_triangles() {
        let (verts, indices) = color_quad();
        assert_eq!(verts.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(verts[0].color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn skybox_cube_is_scaled() {
        let (verts, indices) = skybox_cube(5.0);
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(verts.iter().all(|v| v.position.iter().all(|c| c.abs() == 5.0)));
        assert!(
            verts
                .iter()
                .all(|v| (0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1]))
        );
    }

    #[test]
    fn intro_has_spinning_box_and_helpers() {
        let scene = scene_of(Demo::Intro);
        let cube = scene.object("cube").unwrap();
        assert!(matches!(cube.material.paint, Paint::PerFace(_)));
        assert_ne!(cube.spin, Vec3::ZERO);
        assert_eq!(scene.helpers.len(), 3);
        assert!(scene.lights.is_empty());
    }

    #[test]
    fn camera_light_has_five_light_kinds() {
        let scene = scene_of(Demo::CameraLight);
        let kinds: Vec<_> = scene.lights.iter().map(Light::kind).collect();
        assert_eq!(
            kinds,
            ["ambient", "hemisphere", "directional", "point", "spot"]
        );
        assert!(scene.editable_camera);
        assert_eq!(scene.controls.target, Vec3::new(0.0, 5.0, 0.0));
        let sphere = scene.object("sphere").unwrap();
        assert_eq!(sphere.position, Vec3::new(-8.0, 9.0, 0.0));
    }

    #[test]
    fn shadow_model_requests_model_and_shadows() {
        let scene = scene_of(Demo::ShadowModel);
        assert!(scene.shadows_enabled);
        assert!(scene.lights.iter().all(Light::casts_shadow));
        let model = scene.model.as_ref().unwrap();
        assert_eq!(model.path, PathBuf::from("astronaut.glb"));
        assert!(scene.object("sphere").unwrap().material.is_transparent());
        assert_eq!(scene.object("room").unwrap().material.side, Side::Back);
    }

    #[test]
    fn collision_is_damped() {
        let scene = scene_of(Demo::Collision);
        assert_eq!(scene.controls.damping, Some(0.06));
        assert!(scene.objects.is_empty());
        assert_eq!(scene.camera.position, Vec3::new(5.0, 5.0, 8.0));
    }
}
