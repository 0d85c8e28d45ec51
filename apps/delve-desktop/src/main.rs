use anyhow::{Context, Result};
use clap::Parser;
use delve_input::{Action, PointerButton, PointerDispatcher, PointerEvent, move_to_handler};
use delve_level::{GenerationConfig, Level, LevelGenerator};
use delve_motion::{MotionConfig, MotionState, PlayerRig};
use delve_render::{Scene, ScenePicker, SceneBox};
use delve_render_wgpu::WgpuRenderer;
use delve_tools::LevelInspector;
use egui::Context as EguiContext;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "delve-desktop", about = "Explore generated dungeons")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// RNG seed for the level sequence; omit for a random one
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generation parameters (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn key_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::KeyR => Some(Action::Regenerate),
        KeyCode::Escape => Some(Action::Stop),
        KeyCode::F1 => Some(Action::ToggleInspector),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Application state.
struct AppState {
    generator: LevelGenerator,
    rng: ChaCha8Rng,
    level: Level,
    scene: Scene,
    motion: MotionConfig,
    rig: PlayerRig,
    dispatcher: PointerDispatcher,
    show_inspector: bool,
    generation: u64,
    cursor: Vec2,
    last_frame: Instant,
}

impl AppState {
    fn new(generator: LevelGenerator, mut rng: ChaCha8Rng) -> Self {
        let level = generator.generate(&mut rng);
        let scene = Scene::from_level(&level);
        let motion = MotionConfig::default();
        let rig = PlayerRig::new(&motion);

        let mut dispatcher = PointerDispatcher::new();
        dispatcher.register(PointerButton::Secondary, move_to_handler());

        Self {
            generator,
            rng,
            level,
            scene,
            motion,
            rig,
            dispatcher,
            show_inspector: true,
            generation: 0,
            cursor: Vec2::ZERO,
            last_frame: Instant::now(),
        }
    }

    /// Replace the level and put the player back at the spawn point.
    fn regenerate(&mut self) {
        self.level = self.generator.generate(&mut self.rng);
        self.scene = Scene::from_level(&self.level);
        let aspect = self.rig.camera.aspect;
        self.rig = PlayerRig::new(&self.motion);
        self.rig.camera.aspect = aspect;
        self.generation += 1;
        tracing::info!(
            generation = self.generation,
            rooms = self.level.rooms().len(),
            "level regenerated"
        );
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::MoveTo(point) => self.rig.move_to(point),
            Action::Stop => self.rig.stop(),
            Action::Regenerate => self.regenerate(),
            Action::ToggleInspector => self.show_inspector = !self.show_inspector,
            Action::Noop => {}
        }
    }

    fn pointer_pressed(&mut self, button: PointerButton, viewport: Vec2) {
        let event = PointerEvent::new(self.cursor, viewport, button);
        let picker = ScenePicker::new(&self.scene, self.rig.camera.view_projection());
        let actions = self.dispatcher.dispatch(&event, &picker);
        for action in actions {
            self.apply(action);
        }
    }

    fn update(&mut self, dt: f32) {
        let was_moving = self.rig.controller.target().is_some();
        let state = self.rig.update(dt);
        if was_moving && state == MotionState::Idle {
            let p = self.rig.position();
            tracing::info!(x = p.x, z = p.z, "arrived");
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.show_inspector {
            return actions;
        }

        let summary = LevelInspector::summary(&self.level);

        egui::SidePanel::left("inspector")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Delve");
                ui.separator();
                ui.label(format!("Level #{}", self.generation));
                ui.label(format!(
                    "Rooms: {}  Corridors: {}  Length: {:.1}",
                    summary.room_count, summary.corridor_count, summary.length
                ));
                ui.label(format!("Enemies: {}", summary.enemy_count));
                for (kind, n) in &summary.enemies_by_kind {
                    ui.label(format!("  {kind}: {n}"));
                }
                for (style, n) in &summary.rooms_by_style {
                    ui.label(format!("  {style} rooms: {n}"));
                }
                ui.separator();

                let p = self.rig.position();
                ui.label(format!("Player: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
                ui.label(if self.rig.body.is_sleeping() {
                    "Body: resting"
                } else {
                    "Body: awake"
                });
                match self.rig.controller.target() {
                    Some(t) => ui.label(format!("Target: ({:.1}, {:.1})", t.x, t.z)),
                    None => ui.label("Target: none"),
                };

                ui.horizontal(|ui| {
                    if ui.button("Regenerate (R)").clicked() {
                        actions.push(Action::Regenerate);
                    }
                    if ui.button("Stop (Esc)").clicked() {
                        actions.push(Action::Stop);
                    }
                });

                ui.separator();
                ui.heading("Rooms");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for id in 0..self.level.rooms().len() {
                        let Some(info) = LevelInspector::inspect_room(&self.level, id) else {
                            continue;
                        };
                        ui.collapsing(format!("Room {id} [{}]", info.style), |ui| {
                            ui.label(info.to_string());
                            for (kind, pos) in &info.enemies {
                                ui.label(format!(
                                    "{kind} at ({:.1}, {:.1}, {:.1})",
                                    pos[0], pos[1], pos[2]
                                ));
                            }
                        });
                    }
                });

                ui.separator();
                ui.small("RMB: Move | R: Regenerate | Esc: Stop | F1: Toggle Inspector");
            });

        actions
    }
}

/// Window, surface and GPU resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Delve")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("delve_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(self.config.width as f32, self.config.height as f32)
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Draw the scene and the inspector. Returns actions raised by the UI.
    fn frame(&mut self, state: &mut AppState, egui_ctx: &EguiContext) -> Vec<Action> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Vec::new();
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return Vec::new();
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.fit_grid(&self.device, state.scene.extent());
        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            state.rig.camera.view_projection(),
            &state.scene,
            Some(SceneBox::player(state.rig.position())),
        );

        let mut actions = Vec::new();
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            actions = state.draw_ui(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        actions
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.rig.camera.aspect = gpu.aspect();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                self.state.rig.camera.aspect = gpu.aspect();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(action) = key_action(key) {
                    self.state.apply(action);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button,
                state: ElementState::Pressed,
                ..
            } => {
                if let Some(button) = pointer_button(button) {
                    self.state.pointer_pressed(button, gpu.viewport());
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                self.state.update(dt);

                for action in gpu.frame(&mut self.state, &self.egui_ctx) {
                    self.state.apply(action);
                }
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => GenerationConfig::from_path(path)
            .with_context(|| format!("loading generation config from {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    let generator = LevelGenerator::new(config).context("invalid generation config")?;
    let rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    tracing::info!(seed = ?cli.seed, "delve-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(generator, rng));
    event_loop.run_app(&mut app)?;

    Ok(())
}
