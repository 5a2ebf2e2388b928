use crate::cube::TexturedCubeRenderer;
use crate::quad::QuadRenderer;
use crate::scene::SceneRenderer;
use spinlab_render::{DemoContent, RenderError};

/// The GPU side of one demo.
pub enum DemoRenderer {
    Quad(QuadRenderer),
    Cube(TexturedCubeRenderer),
    Scene(SceneRenderer),
}

impl DemoRenderer {
    /// Build the pipelines for `content`. A scene's model request is not
    /// loaded here; see [`SceneRenderer::load_model`].
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        content: &DemoContent,
    ) -> Result<Self, RenderError> {
        Ok(match content {
            DemoContent::ColorQuad => Self::Quad(QuadRenderer::new(device, surface_format)?),
            DemoContent::TexturedCube(desc) => Self::Cube(TexturedCubeRenderer::new(
                device,
                queue,
                surface_format,
                width,
                height,
                desc.clone(),
            )?),
            DemoContent::Scene(scene) => Self::Scene(SceneRenderer::new(
                device,
                surface_format,
                width,
                height,
                scene,
            )?),
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        match self {
            Self::Quad(_) => {}
            Self::Cube(cube) => cube.resize(device, width, height),
            Self::Scene(scene) => scene.resize(device, width, height),
        }
    }
}
