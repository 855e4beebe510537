//! voxedit - interactive voxel editor

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use voxedit::core::{
    config::EditorConfig,
    input::InputState,
    logging,
    time::FrameTimer,
    Error, Result,
};
use voxedit::editor::{EditorContext, HudAction, HudManager, InteractionLoop};
use voxedit::render::{CpuRenderer, DisplayPipeline, GpuContext};
use voxedit::voxel::SaveSlots;

struct App {
    config: EditorConfig,
    slots: SaveSlots,
    load_on_start: Option<PathBuf>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    display: Option<DisplayPipeline>,
    editor: Option<InteractionLoop<CpuRenderer>>,
    input: InputState,
    hud: HudManager,
    timer: FrameTimer,
}

impl App {
    fn new(config: EditorConfig, load_on_start: Option<PathBuf>) -> Self {
        Self {
            slots: SaveSlots::new(config.saveslot_dir.clone()),
            input: InputState::new(config.window_width, config.window_height),
            timer: FrameTimer::new(Duration::from_millis(config.frame_delay_ms)),
            hud: HudManager::default(),
            config,
            load_on_start,
            window: None,
            gpu: None,
            display: None,
            editor: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("voxedit")
            .with_inner_size(PhysicalSize::new(self.config.window_width, self.config.window_height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| Error::Window(e.to_string()))?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let context = EditorContext::with_cpu_renderer(self.config.clone(), size.width, size.height);
        let (render_w, render_h) = context.render_resolution;
        let mut editor = InteractionLoop::new(context);

        if let Some(path) = self.load_on_start.take() {
            let grid = self.slots.load(&path)?;
            editor.renderer_mut().replace_grid(grid);
        }

        let display = DisplayPipeline::new(&gpu.device, gpu.format(), render_w, render_h);
        self.input = InputState::new(size.width, size.height);
        HudManager::print_help();

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.display = Some(display);
        self.editor = Some(editor);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (render_w, render_h) = self.config.render_resolution(width, height);

        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(display) = &mut self.display {
                display.resize(&gpu.device, render_w, render_h);
            }
        }
        if let Some(editor) = &mut self.editor {
            editor.renderer_mut().resize(render_w, render_h);
            editor.set_render_resolution(render_w, render_h);
        }
    }

    fn run_action(&mut self, action: HudAction) -> Result<()> {
        let Some(editor) = &mut self.editor else {
            return Ok(());
        };

        match action {
            HudAction::Save => {
                self.slots.save(editor.renderer().grid())?;
            }
            HudAction::LoadLatest => match self.slots.latest()? {
                Some(path) => editor.renderer_mut().replace_grid(self.slots.load(&path)?),
                None => log::warn!("No save slots in {}", self.slots.dir().display()),
            },
            HudAction::LoadSlot(index) => match self.slots.list()?.get(index) {
                Some(path) => editor.renderer_mut().replace_grid(self.slots.load(path)?),
                None => log::warn!("No save slot #{}", index + 1),
            },
            HudAction::Screenshot => {
                let path = save_screenshot(editor.renderer(), self.slots.dir())?;
                log::info!("Screenshot saved to {}", path.display());
            }
        }
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.timer.tick();

        if self.input.is_key_just_pressed(KeyCode::Escape) {
            self.shutdown();
            event_loop.exit();
            return;
        }
        if self.input.is_key_just_pressed(KeyCode::F1) {
            HudManager::print_help();
        }

        let hud = self.hud.update(&self.input);
        if let Some(action) = hud.action {
            if let Err(e) = self.run_action(action) {
                log::error!("{:?} failed: {}", action, e);
            }
        }

        let (Some(editor), Some(gpu), Some(display)) =
            (self.editor.as_mut(), self.gpu.as_ref(), self.display.as_ref())
        else {
            return;
        };

        let input = self.input.snapshot();
        editor.frame(&input, &hud);
        editor.accumulate();
        display.upload(&gpu.queue, &editor.renderer().fetch_image());

        match gpu.get_current_texture() {
            Ok(output) => {
                let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame_encoder"),
                });
                display.render(&mut encoder, &view);
                gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
            }
            Err(e) => log::warn!("Skipping frame: {}", e),
        }

        if let Some(window) = &self.window {
            window.set_title(&self.hud.status_line(
                self.timer.fps(),
                editor.renderer().sample_count(),
                editor.renderer().grid().len(),
            ));
        }

        self.input.end_frame();
        self.timer.pace();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn shutdown(&mut self) {
        if let Some(editor) = self.editor.take() {
            let context = editor.shutdown();
            log::info!(
                "Session ended after {} frames with {} voxels",
                self.timer.frame_count(),
                context.voxel_count()
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Startup failed: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
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

/// Write the current image as `screenshot_<frame>.png` next to the save slots
fn save_screenshot(renderer: &CpuRenderer, dir: &Path) -> Result<PathBuf> {
    use image::ImageEncoder;

    std::fs::create_dir_all(dir)?;
    let (width, height) = renderer.resolution();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let path = dir.join(format!("screenshot_{}.png", stamp));

    let file = std::fs::File::create(&path)?;
    image::codecs::png::PngEncoder::new(std::io::BufWriter::new(file))
        .write_image(&renderer.fetch_image(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| Error::Image(e.to_string()))?;

    Ok(path)
}

fn main() {
    logging::init();
    log::info!("voxedit starting...");

    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_config_arg(&args) {
        Some(path) => match EditorConfig::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => EditorConfig::default(),
    };

    if let Some(dir) = parse_slots_arg(&args) {
        config.saveslot_dir = dir;
    }
    log::info!("Save slots: {}", config.saveslot_dir.display());

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(config, parse_load_arg(&args));
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}

/// Value following `flag` (or its short form) on the command line
fn parse_path_arg(args: &[String], long: &str, short: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == long || args[i] == short {
            if let Some(value) = args.get(i + 1) {
                return Some(PathBuf::from(value));
            }
        }
    }
    None
}

/// Parse --config argument (JSON editor config)
fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    parse_path_arg(args, "--config", "-c")
}

/// Parse --slots argument (save slot directory)
fn parse_slots_arg(args: &[String]) -> Option<PathBuf> {
    parse_path_arg(args, "--slots", "-s")
}

/// Parse --load argument (slot file to open at startup)
fn parse_load_arg(args: &[String]) -> Option<PathBuf> {
    parse_path_arg(args, "--load", "-l")
}
