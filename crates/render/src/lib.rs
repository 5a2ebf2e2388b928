//! Rendering adapter: renderer-agnostic scene description and demo content.
//!
//! # Invariants
//! - Scenes are declarative data; backends read them and never reshape them.
//! - Shadow flags and model requests are carried as data; drawing shadows or
//!   parsing model files is the backend's business.
//! - Mesh generation winds front faces counter-clockwise.

mod camera;
mod demos;
mod error;
mod mesh;
mod renderer;
mod scene;

pub use camera::{ClipRange, PerspectiveCamera};
pub use demos::{Demo, DemoContent, QuadVertex, SkyboxVertex, TexturedCubeDesc, color_quad, skybox_cube};
pub use error::RenderError;
pub use mesh::{LineVertex, MeshData, axes_lines, grid_lines, marker_lines};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{
    ControlsConfig, Helper, Light, Material, ModelRequest, Paint, Primitive, Scene, SceneObject,
    Shading, ShadowParams, Side, TIME_SCALE,
};

pub fn crate_info() -> &'static str {
    "spinlab-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
