use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use spinlab_common::{FrameClock, SurfaceSize};
use spinlab_input::{InputEvent, MotionKey};
use spinlab_orbit::{InertialOrbit, OrbitConfig};
use spinlab_render::{Demo, DemoContent, RenderError, Renderer};
use spinlab_render_wgpu::{DemoRenderer, GpuContext, OrbitCamera, SceneFrame};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "spinlab-desktop", about = "Run one spinlab demo in a window")]
struct Cli {
    /// Demo to run
    #[arg(long, default_value = "textured-cube")]
    demo: Demo,

    /// Orbit controller config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the coasting friction
    #[arg(long)]
    friction: Option<f32>,

    /// Texture for the textured cube
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Model file for scenes that request one
    #[arg(long)]
    model: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Controller settings for a demo: the config file if given, otherwise the
/// scene's own damping, otherwise defaults; `--friction` wins over all.
fn orbit_config(cli: &Cli, content: &DemoContent) -> Result<OrbitConfig> {
    let mut config = match &cli.config {
        Some(path) => OrbitConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match content {
            DemoContent::Scene(scene) => scene
                .controls
                .damping
                .map(OrbitConfig::with_friction)
                .unwrap_or_default(),
            _ => OrbitConfig::default(),
        },
    };
    if let Some(friction) = cli.friction {
        config.friction = friction;
    }
    config.validate()?;
    Ok(config)
}

/// Events the controller needs even when egui claims them: a drag that
/// ends over the panel must still release the pointer.
fn forward_despite_egui(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::MouseInput {
            state: ElementState::Released,
            ..
        } | WindowEvent::CursorLeft { .. }
    )
}

fn motion_key(code: KeyCode) -> Option<MotionKey> {
    match code {
        KeyCode::KeyW => Some(MotionKey::Forward),
        KeyCode::KeyA => Some(MotionKey::Left),
        KeyCode::KeyS => Some(MotionKey::Back),
        KeyCode::KeyD => Some(MotionKey::Right),
        _ => None,
    }
}

/// Application state.
struct AppState {
    demo: Demo,
    content: DemoContent,
    orbit: InertialOrbit,
    camera: Option<OrbitCamera>,
    surface_size: SurfaceSize,
    cursor: Vec2,
    show_panel: bool,
    started: Instant,
    clock: FrameClock,
}

impl AppState {
    fn new(cli: &Cli) -> Result<Self> {
        let mut content = cli.demo.content();
        match (&mut content, &cli.texture, &cli.model) {
            (DemoContent::TexturedCube(desc), Some(texture), _) => desc.texture = texture.clone(),
            (DemoContent::Scene(scene), _, Some(model)) => match &mut scene.model {
                Some(request) => request.path = model.clone(),
                None => tracing::warn!(demo = %cli.demo, "demo requests no model, ignoring --model"),
            },
            _ => {}
        }

        let config = orbit_config(cli, &content)?;
        tracing::info!(
            demo = %cli.demo,
            friction = config.friction,
            "orbit controller configured"
        );

        let camera = match &content {
            DemoContent::Scene(scene) => Some(OrbitCamera::for_scene(scene)),
            _ => None,
        };

        Ok(Self {
            demo: cli.demo,
            content,
            orbit: InertialOrbit::new(config),
            camera,
            surface_size: SurfaceSize::default(),
            cursor: Vec2::ZERO,
            show_panel: false,
            started: Instant::now(),
            clock: FrameClock::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface_size = SurfaceSize::new(width, height);
    }

    fn feed(&mut self, event: InputEvent) {
        if self.demo.uses_orbit() {
            self.orbit.handle(event);
        }
    }

    fn update(&mut self) {
        let dt_ms = self
            .clock
            .tick(self.started.elapsed().as_secs_f64() * 1000.0);

        if let DemoContent::Scene(scene) = &mut self.content {
            scene.animate(dt_ms);
            if let Some(camera) = &mut self.camera {
                camera.sync_lens(&scene.camera);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }
        if key == KeyCode::F1 {
            self.show_panel = !self.show_panel;
            return;
        }
        if let Some(motion) = motion_key(key) {
            self.feed(InputEvent::KeyPress(motion));
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::SidePanel::left("orbit_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading(self.demo.id());
                ui.label(self.demo.description());
                ui.separator();

                let state = *self.orbit.state();
                ui.label(format!("Yaw: {:.3}  Pitch: {:.3}", state.yaw, state.pitch));
                ui.label(format!(
                    "Velocity: ({:.4}, {:.4})",
                    state.angular_velocity.x, state.angular_velocity.y
                ));
                ui.label(format!(
                    "Friction: {:.2}{}",
                    self.orbit.config().friction,
                    if state.dragging { "  (dragging)" } else { "" }
                ));
                if ui.button("Reset orbit").clicked() {
                    self.orbit.reset();
                }

                if let DemoContent::Scene(scene) = &mut self.content {
                    if scene.editable_camera {
                        ui.separator();
                        ui.heading("Camera");
                        ui.add(
                            egui::Slider::new(&mut scene.camera.fov_degrees, 1.0..=180.0)
                                .text("fov"),
                        );
                        let mut range = scene.camera.clip_range();
                        let mut near = range.near();
                        let mut far = range.far();
                        ui.horizontal(|ui| {
                            if ui
                                .add(egui::DragValue::new(&mut near).prefix("near: ").speed(0.1))
                                .changed()
                            {
                                range.set_near(near.max(0.1));
                            }
                            if ui
                                .add(egui::DragValue::new(&mut far).prefix("far: ").speed(0.1))
                                .changed()
                            {
                                range.set_far(far);
                            }
                        });
                        scene.camera.set_clip_range(range);
                    }
                }

                ui.separator();
                ui.small("F1: Toggle panel | LMB drag: Orbit | WASD: Nudge | Wheel: Zoom");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    gpu: Option<GpuContext>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<DemoRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            gpu: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(format!("spinlab: {}", self.state.demo))
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::CreateSurface(e.to_string()))?;
        let gpu = GpuContext::new(&instance, &surface)?;

        let size = window.inner_size();
        let config = gpu.surface_config(&surface, size.width, size.height)?;
        surface.configure(&gpu.device, &config);
        self.state.resize(config.width, config.height);

        let mut renderer = DemoRenderer::new(
            &gpu.device,
            &gpu.queue,
            config.format,
            config.width,
            config.height,
            &self.state.content,
        )?;
        if let (DemoRenderer::Scene(scene_renderer), DemoContent::Scene(scene)) =
            (&mut renderer, &self.state.content)
        {
            if let Some(request) = &scene.model {
                match scene_renderer.load_model(&gpu.device, request) {
                    Ok(()) => {}
                    Err(e) if e.is_fatal() => return Err(e.into()),
                    Err(e) => tracing::error!("{e}"),
                }
            }
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, config.format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.gpu = Some(gpu);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self) {
        self.state.update();

        let (Some(surface), Some(gpu), Some(config), Some(renderer)) =
            (&self.surface, &self.gpu, &self.config, &self.renderer)
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&gpu.device, config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Draw from the current angles, then step the controller.
        let angles = self.state.orbit.angles();
        match (renderer, &self.state.content) {
            (DemoRenderer::Quad(quad), _) => quad.render(&gpu.device, &gpu.queue, &view),
            (DemoRenderer::Cube(cube), _) => cube.render(
                &gpu.device,
                &gpu.queue,
                &view,
                angles.model_matrix(),
                self.state.surface_size.aspect(),
            ),
            (DemoRenderer::Scene(scene_renderer), DemoContent::Scene(scene)) => {
                let camera = self.state.camera.unwrap_or_else(|| OrbitCamera::for_scene(scene));
                SceneFrame {
                    renderer: scene_renderer,
                    device: &gpu.device,
                    queue: &gpu.queue,
                    target: &view,
                }
                .render(scene, &camera.render_view(angles));
            }
            (DemoRenderer::Scene(_), _) => {
                tracing::error!("scene renderer without scene content");
            }
        }
        if self.state.demo.uses_orbit() {
            self.state.orbit.advance();
        }

        self.draw_egui(&view);

        output.present();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn draw_egui(&mut self, view: &wgpu::TextureView) {
        let (Some(window), Some(gpu), Some(config), Some(egui_winit), Some(egui_renderer)) = (
            &self.window,
            &self.gpu,
            &self.config,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        ) else {
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("failed to start renderer: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CursorMoved { position, .. } = &event {
            self.state.cursor = Vec2::new(position.x as f32, position.y as f32);
        }
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed && !forward_despite_egui(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(gpu), Some(config)) =
                    (&self.surface, &self.gpu, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(&gpu.device, config);
                    self.state.resize(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                let event = match btn_state {
                    ElementState::Pressed => InputEvent::PointerDown(self.state.cursor),
                    ElementState::Released => InputEvent::PointerUp,
                };
                self.state.feed(event);
            }
            WindowEvent::CursorMoved { .. } => {
                self.state.feed(InputEvent::PointerMove {
                    pos: self.state.cursor,
                    surface: self.state.surface_size,
                });
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.feed(InputEvent::PointerLeave);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                if let Some(camera) = &mut self.state.camera {
                    camera.zoom(steps);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(demo = %cli.demo, "spinlab-desktop starting");

    let state = AppState::new(&cli)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("spinlab-desktop").chain(args.iter().copied()))
    }

    #[test]
    fn collision_demo_uses_scene_damping() {
        let cli = cli(&["--demo", "collision"]);
        let config = orbit_config(&cli, &cli.demo.content()).unwrap();
        assert_eq!(config.friction, 0.06);
    }

    #[test]
    fn friction_flag_wins() {
        let cli = cli(&["--demo", "collision", "--friction", "0.2"]);
        let config = orbit_config(&cli, &cli.demo.content()).unwrap();
        assert_eq!(config.friction, 0.2);
    }

    #[test]
    fn out_of_range_friction_is_rejected() {
        let cli = cli(&["--friction", "1.5"]);
        assert!(orbit_config(&cli, &cli.demo.content()).is_err());
    }

    fn mouse(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: unsafe { winit::event::DeviceId::dummy() },
            state,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn pointer_release_reaches_controller_under_panel() {
        assert!(forward_despite_egui(&mouse(ElementState::Released)));
        assert!(forward_despite_egui(&WindowEvent::CursorLeft {
            device_id: unsafe { winit::event::DeviceId::dummy() },
        }));
        assert!(!forward_despite_egui(&mouse(ElementState::Pressed)));
        assert!(!forward_despite_egui(&WindowEvent::CursorMoved {
            device_id: unsafe { winit::event::DeviceId::dummy() },
            position: winit::dpi::PhysicalPosition::new(10.0, 10.0),
        }));
    }

    #[test]
    fn drag_released_over_panel_resumes_coasting() {
        let mut state = AppState::new(&cli(&["--demo", "textured-cube"])).unwrap();
        state.resize(800, 600);
        state.feed(InputEvent::PointerDown(Vec2::new(100.0, 100.0)));
        state.feed(InputEvent::PointerMove {
            pos: Vec2::new(140.0, 100.0),
            surface: state.surface_size,
        });
        let release = mouse(ElementState::Released);
        assert!(forward_despite_egui(&release));
        state.feed(InputEvent::PointerUp);
        assert!(!state.orbit.state().dragging);

        let before = state.orbit.angles();
        state.orbit.advance();
        assert_ne!(state.orbit.angles(), before);
    }

    #[test]
    fn wasd_maps_to_motion_keys() {
        assert_eq!(motion_key(KeyCode::KeyW), Some(MotionKey::Forward));
        assert_eq!(motion_key(KeyCode::KeyD), Some(MotionKey::Right));
        assert_eq!(motion_key(KeyCode::KeyQ), None);
    }
}
