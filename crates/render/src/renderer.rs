use crate::scene::{Light, Primitive, Scene};
use glam::Vec3;
use std::fmt::Write;

/// Camera/view configuration for rendering one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Camera up direction.
    pub up: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 75.0,
        }
    }
}

impl RenderView {
    /// The view a scene starts from, before any orbiting.
    pub fn of_scene(scene: &Scene) -> Self {
        Self {
            eye: scene.camera.position,
            target: scene.controls.target,
            up: Vec3::Y,
            fov_degrees: scene.camera.fov_degrees,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of a scene. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn vec3(v: Vec3) -> String {
    format!("({:.1}, {:.1}, {:.1})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        // Writing into a String cannot fail.
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene {} (objects={}, lights={}, helpers={}) ===",
            scene.name,
            scene.objects.len(),
            scene.lights.len(),
            scene.helpers.len()
        );
        let _ = writeln!(
            out,
            "Camera: eye={} target={} fov={:.0} near={} far={}",
            vec3(view.eye),
            vec3(view.target),
            view.fov_degrees,
            scene.camera.near,
            scene.camera.far
        );
        if let Some(damping) = scene.controls.damping {
            let _ = writeln!(out, "Controls: damping={damping}");
        }
        let _ = writeln!(out, "Shadows: {}", if scene.shadows_enabled { "on" } else { "off" });

        for object in &scene.objects {
            let shape = match object.primitive {
                Primitive::Box { size, .. } => format!("box {}", vec3(size)),
                Primitive::Sphere { radius, .. } => format!("sphere r={radius}"),
                Primitive::Plane { width, height } => format!("plane {width}x{height}"),
            };
            let _ = writeln!(
                out,
                "  [{}] {} pos={} opacity={} side={:?}",
                object.name,
                shape,
                vec3(object.position),
                object.material.opacity,
                object.material.side
            );
        }

        for light in &scene.lights {
            let position = match light {
                Light::Directional { position, .. }
                | Light::Point { position, .. }
                | Light::Spot { position, .. } => format!(" pos={}", vec3(*position)),
                Light::Ambient { .. } | Light::Hemisphere { .. } => String::new(),
            };
            let shadow = if light.casts_shadow() { " shadow" } else { "" };
            let _ = writeln!(out, "  light {}{}{}", light.kind(), position, shadow);
        }

        if let Some(model) = &scene.model {
            let _ = writeln!(out, "  model {}", model.path.display());
        }

        out
    }
}
