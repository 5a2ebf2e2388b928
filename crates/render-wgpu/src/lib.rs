//! wgpu render backend for the spinlab demos.
//!
//! Draws the colour quad, the textured skybox cube and lit declarative
//! scenes. Scene demos are viewed through an [`OrbitCamera`] driven by the
//! orbit controller's angles.
//!
//! # Invariants
//! - Renderers never mutate the scene or the controller.
//! - Shader compilation failures surface as [`spinlab_render::RenderError`],
//!   never as panics.

mod camera;
mod cube;
mod demo;
mod gpu;
mod model;
mod quad;
mod scene;
mod shaders;
mod texture;

pub use camera::OrbitCamera;
pub use cube::TexturedCubeRenderer;
pub use demo::DemoRenderer;
pub use gpu::{GpuContext, compile_shader};
pub use model::{GlbHeader, load_glb, parse_glb_header};
pub use quad::QuadRenderer;
pub use scene::{LightsUniform, MAX_LIGHTS_PER_KIND, SceneFrame, SceneRenderer};
pub use texture::{checker, load_or_checker, load_rgba};
