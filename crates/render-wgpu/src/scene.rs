use crate::gpu::{clear_color, compile_shader, create_depth_texture, depth_state};
use crate::model;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use spinlab_common::Color;
use spinlab_render::{
    Light, Material, MeshData, ModelRequest, RenderError, RenderView, Renderer, Scene, Shading,
    Side,
};
use wgpu::util::DeviceExt;

pub const MAX_LIGHTS_PER_KIND: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
struct DirectionalLightRaw {
    direction: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
struct PointLightRaw {
    position: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
struct SpotLightRaw {
    position: [f32; 4],
    direction: [f32; 4],
    color: [f32; 4],
}

/// Scene lights packed for the lit shader. Colours are premultiplied by
/// intensity; lights past [`MAX_LIGHTS_PER_KIND`] of a kind are dropped.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
pub struct LightsUniform {
    ambient: [f32; 4],
    sky: [f32; 4],
    ground: [f32; 4],
    counts: [u32; 4],
    directional: [DirectionalLightRaw; MAX_LIGHTS_PER_KIND],
    point: [PointLightRaw; MAX_LIGHTS_PER_KIND],
    spot: [SpotLightRaw; MAX_LIGHTS_PER_KIND],
}

fn radiance(color: Color, intensity: f32, w: f32) -> [f32; 4] {
    let [r, g, b] = color.rgb();
    [r * intensity, g * intensity, b * intensity, w]
}

fn accumulate(into: &mut [f32; 4], color: Color, intensity: f32) {
    for (channel, value) in into.iter_mut().zip(color.rgb()) {
        *channel += value * intensity;
    }
}

impl LightsUniform {
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut raw = Self::default();
        let (mut dirs, mut points, mut spots) = (0usize, 0usize, 0usize);

        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    accumulate(&mut raw.ambient, color, intensity);
                }
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } => {
                    accumulate(&mut raw.sky, sky, intensity);
                    accumulate(&mut raw.ground, ground, intensity);
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    target,
                    ..
                } if dirs < MAX_LIGHTS_PER_KIND => {
                    let direction = (position - target).try_normalize().unwrap_or(Vec3::Y);
                    raw.directional[dirs] = DirectionalLightRaw {
                        direction: direction.extend(0.0).to_array(),
                        color: radiance(color, intensity, 0.0),
                    };
                    dirs += 1;
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                    distance,
                    decay,
                    ..
                } if points < MAX_LIGHTS_PER_KIND => {
                    raw.point[points] = PointLightRaw {
                        position: position.extend(distance).to_array(),
                        color: radiance(color, intensity, decay),
                    };
                    points += 1;
                }
                Light::Spot {
                    color,
                    intensity,
                    position,
                    target,
                    distance,
                    angle,
                    decay,
                } if spots < MAX_LIGHTS_PER_KIND => {
                    let direction = (target - position).try_normalize().unwrap_or(Vec3::NEG_Y);
                    raw.spot[spots] = SpotLightRaw {
                        position: position.extend(distance).to_array(),
                        direction: direction.extend(angle.cos()).to_array(),
                        color: radiance(color, intensity, decay),
                    };
                    spots += 1;
                }
                _ => tracing::warn!(kind = light.kind(), "light limit reached, ignoring light"),
            }
        }
        raw.counts = [dirs as u32, points as u32, spots as u32, 0];
        raw
    }

    pub fn counts(&self) -> [u32; 3] {
        [self.counts[0], self.counts[1], self.counts[2]]
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    params: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, material: &Material) -> Self {
        let cols = model.to_cols_array_2d();
        let lit = if material.shading == Shading::Phong { 1.0 } else { 0.0 };
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            params: [material.opacity, lit, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LineVertexRaw {
    position: [f32; 3],
    color: [f32; 4],
}

fn bake_vertices(mesh: &MeshData, material: &Material) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.faces)
        .map(|((&position, &normal), &face)| Vertex {
            position,
            normal,
            color: material.paint.color_for(face).0,
        })
        .collect()
}

/// Index into the pipeline table for a side and blend mode.
fn pipeline_slot(side: Side, transparent: bool) -> usize {
    let side = match side {
        Side::Front => 0,
        Side::Back => 1,
        Side::Double => 2,
    };
    side * 2 + usize::from(transparent)
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, mesh: &MeshData, material: &Material) -> Self {
        let vertices = bake_vertices(mesh, material);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_instance_buffer")),
            contents: bytemuck::bytes_of(&InstanceData::new(Mat4::IDENTITY, material)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instance_buffer,
        }
    }
}

/// A model placeholder drawn alongside the scene objects.
struct ModelProxy {
    mesh: GpuMesh,
    material: Material,
}

/// Lit scene renderer: objects with per-side culling, opaque before
/// transparent, and helper lines.
pub struct SceneRenderer {
    pipelines: Vec<wgpu::RenderPipeline>,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    model: Option<ModelProxy>,
    line_buffer: Option<wgpu::Buffer>,
    line_vertex_count: u32,
    depth_texture: wgpu::TextureView,
    aspect: f32,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> Result<Self, RenderError> {
        let scene_shader = compile_shader(device, "scene_shader", shaders::SCENE_SHADER)?;
        let line_shader = compile_shader(device, "line_shader", shaders::LINE_SHADER)?;

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                eye: [0.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lights_buffer"),
            contents: bytemuck::bytes_of(&LightsUniform::from_lights(&scene.lights)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let mut pipelines = Vec::with_capacity(6);
        for side in [Side::Front, Side::Back, Side::Double] {
            for transparent in [false, true] {
                debug_assert_eq!(pipelines.len(), pipeline_slot(side, transparent));
                pipelines.push(Self::mesh_pipeline(
                    device,
                    &pipeline_layout,
                    &scene_shader,
                    surface_format,
                    side,
                    transparent,
                ));
            }
        }

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertexRaw>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(wgpu::CompareFunction::Less, true)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let meshes = scene
            .objects
            .iter()
            .map(|object| {
                GpuMesh::new(device, &object.name, &object.primitive.mesh(), &object.material)
            })
            .collect();

        let lines: Vec<LineVertexRaw> = scene
            .line_vertices()
            .iter()
            .map(|v| LineVertexRaw {
                position: v.position.to_array(),
                color: v.color.0,
            })
            .collect();
        let line_buffer = (!lines.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("line_vertex_buffer"),
                contents: bytemuck::cast_slice(&lines),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        tracing::debug!(
            scene = %scene.name,
            objects = scene.objects.len(),
            lines = lines.len(),
            "scene uploaded"
        );

        Ok(Self {
            pipelines,
            line_pipeline,
            camera_buffer,
            bind_group,
            meshes,
            model: None,
            line_buffer,
            line_vertex_count: lines.len() as u32,
            depth_texture: create_depth_texture(device, width, height),
            aspect: width.max(1) as f32 / height.max(1) as f32,
        })
    }

    fn mesh_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        side: Side,
        transparent: bool,
    ) -> wgpu::RenderPipeline {
        let cull_mode = match side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        };
        let blend = if transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("scene_pipeline_{side:?}_{transparent}")),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x4,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(wgpu::CompareFunction::Less, !transparent)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Validate the requested model and add its placeholder to the draw list.
    /// Errors leave the scene drawable without the model.
    pub fn load_model(
        &mut self,
        device: &wgpu::Device,
        request: &ModelRequest,
    ) -> Result<(), RenderError> {
        let header = model::load_glb(&request.path)?;
        tracing::info!(
            path = %request.path.display(),
            bytes = header.length,
            "model accepted"
        );
        let material = Material::phong(Color::hex(0xdddddd));
        let mesh = GpuMesh::new(device, "model", &model::placeholder(request).mesh(), &material);
        self.model = Some(ModelProxy { mesh, material });
        Ok(())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_projection(&self, scene: &Scene, view: &RenderView) -> Mat4 {
        let projection = Mat4::perspective_rh(
            view.fov_degrees.to_radians(),
            self.aspect,
            scene.camera.near,
            scene.camera.far,
        );
        projection * Mat4::look_at_rh(view.eye, view.target, view.up)
    }

    pub fn draw(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &Scene,
        view: &RenderView,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: self.view_projection(scene, view).to_cols_array_2d(),
                eye: view.eye.extend(1.0).to_array(),
            }),
        );

        // (mesh, material, distance to eye)
        let mut draws: Vec<(&GpuMesh, &Material, f32)> = Vec::with_capacity(self.meshes.len() + 1);
        for (mesh, object) in self.meshes.iter().zip(&scene.objects) {
            let model = object.model_matrix();
            queue.write_buffer(
                &mesh.instance_buffer,
                0,
                bytemuck::bytes_of(&InstanceData::new(model, &object.material)),
            );
            draws.push((mesh, &object.material, object.position.distance(view.eye)));
        }
        if let Some(proxy) = &self.model {
            draws.push((&proxy.mesh, &proxy.material, view.eye.length()));
        }

        // Opaque first; transparent back to front.
        draws.sort_by(|a, b| {
            let (ta, tb) = (a.1.is_transparent(), b.1.is_transparent());
            ta.cmp(&tb).then_with(|| {
                if ta {
                    b.2.total_cmp(&a.2)
                } else {
                    std::cmp::Ordering::Equal
                }
            })
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.background)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.bind_group, &[]);

            if let Some(lines) = &self.line_buffer {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, lines.slice(..));
                pass.draw(0..self.line_vertex_count, 0..1);
            }

            for (mesh, material, _) in draws {
                let slot = pipeline_slot(material.side, material.is_transparent());
                pass.set_pipeline(&self.pipelines[slot]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, mesh.instance_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// One frame target for [`SceneRenderer`], usable through the generic
/// [`Renderer`] interface.
pub struct SceneFrame<'a> {
    pub renderer: &'a SceneRenderer,
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target: &'a wgpu::TextureView,
}

impl Renderer for SceneFrame<'_> {
    type Output = ();

    fn render(&self, scene: &Scene, view: &RenderView) {
        self.renderer
            .draw(self.device, self.queue, self.target, scene, view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinlab_render::{Demo, DemoContent, Paint, Primitive};

    fn scene_of(demo: Demo) -> Scene {
        match demo.content() {
            DemoContent::Scene(scene) => scene,
            other => panic!("{demo} is not a scene demo: {other:?}"),
        }
    }

    #[test]
    fn camera_light_packs_every_kind() {
        let lights = LightsUniform::from_lights(&scene_of(Demo::CameraLight).lights);
        assert_eq!(lights.counts(), [1, 1, 1]);
        assert!((lights.ambient[0] - 0.1).abs() < 1e-6);
        assert!(lights.sky[2] > 0.0 && lights.ground[0] > 0.0);
        // Spot cone cosine rides in direction.w
        assert!((lights.spot[0].direction[3] - 35.0_f32.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn directional_points_toward_light() {
        let lights = LightsUniform::from_lights(&[Light::Directional {
            color: Color::WHITE,
            intensity: 2.0,
            position: Vec3::new(0.0, 10.0, 0.0),
            target: Vec3::ZERO,
            shadow: None,
        }]);
        assert_eq!(lights.directional[0].direction, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(lights.directional[0].color, [2.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn point_light_carries_range_and_decay() {
        let lights = LightsUniform::from_lights(&scene_of(Demo::ShadowModel).lights);
        assert_eq!(lights.counts(), [1, 1, 0]);
        assert_eq!(lights.point[0].position, [0.0, 2.0, 0.0, 100.0]);
        assert!((lights.point[0].color[3] - 1.2).abs() < 1e-6);
        // No ambient light in this scene
        assert_eq!(lights.ambient, [0.0; 4]);
    }

    #[test]
    fn excess_lights_are_dropped() {
        let point = Light::Point {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vec3::ZERO,
            distance: 0.0,
            decay: 2.0,
            shadow: None,
        };
        let lights = LightsUniform::from_lights(&[point; 6]);
        assert_eq!(lights.counts(), [0, MAX_LIGHTS_PER_KIND as u32, 0]);
    }

    #[test]
    fn pipeline_slots_are_distinct() {
        let mut slots: Vec<usize> = [Side::Front, Side::Back, Side::Double]
            .into_iter()
            .flat_map(|side| [pipeline_slot(side, false), pipeline_slot(side, true)])
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn baked_colours_follow_faces() {
        let faces = [
            Color::hex(0xff0000),
            Color::hex(0x00ff00),
            Color::hex(0x0000ff),
            Color::hex(0xffff00),
            Color::hex(0xff00ff),
            Color::hex(0x00ffff),
        ];
        let material = Material {
            paint: Paint::PerFace(faces),
            ..Material::basic(Color::WHITE)
        };
        let mesh = Primitive::cube(1.0).mesh();
        let vertices = bake_vertices(&mesh, &material);
        assert_eq!(vertices.len(), mesh.vertex_count());
        for (vertex, &face) in vertices.iter().zip(&mesh.faces) {
            assert_eq!(vertex.color, faces[face as usize].0);
        }
    }

    #[test]
    fn instance_flags_shading_and_opacity() {
        let basic = InstanceData::new(Mat4::IDENTITY, &Material::basic(Color::WHITE));
        assert_eq!(basic.params[..2], [1.0, 0.0]);
        let glass = InstanceData::new(
            Mat4::IDENTITY,
            &Material::phong(Color::WHITE).with_opacity(0.5),
        );
        assert_eq!(glass.params[..2], [0.5, 1.0]);
    }
}
