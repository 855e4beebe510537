//! Explicit editor context handed to the interaction loop

use crate::core::camera::Camera;
use crate::core::config::EditorConfig;
use crate::render::{CpuRenderer, VoxelRenderer};
use crate::voxel::{Voxel, VoxelGrid};

/// Half-width in cells of the platform a fresh grid starts with
const STARTER_PLATFORM_HALF_EXTENT: i32 = 2;

/// Everything the interaction loop needs from its surroundings
pub struct EditorContext<R> {
    pub config: EditorConfig,
    pub renderer: R,
    /// Resolution of the renderer's image in pixels
    pub render_resolution: (u32, u32),
    started: bool,
}

impl<R: VoxelRenderer> EditorContext<R> {
    pub fn new(config: EditorConfig, renderer: R, render_resolution: (u32, u32)) -> Self {
        Self {
            config,
            renderer,
            render_resolution,
            started: false,
        }
    }

    /// Push the initial camera pose to the renderer and clear its image
    pub fn startup(&mut self) {
        if self.started {
            return;
        }
        let position = self.config.camera.initial_position();
        let look_at = self.config.camera.initial_look_at();
        self.renderer.set_camera_pos(position.x, position.y, position.z);
        self.renderer.set_look_at(look_at.x, look_at.y, look_at.z);
        self.renderer.reset_framebuffer();
        self.started = true;

        log::info!(
            "Editor started: render {}x{}, {} samples/frame",
            self.render_resolution.0,
            self.render_resolution.1,
            self.config.samples_per_frame
        );
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        self.renderer.clear_highlighted_voxel();
        self.started = false;
        log::info!("Editor shut down");
    }
}

impl EditorContext<CpuRenderer> {
    /// Context backed by the CPU tracer over a grid seeded with a starter platform
    pub fn with_cpu_renderer(config: EditorConfig, window_width: u32, window_height: u32) -> Self {
        let mut grid = VoxelGrid::new(config.grid_resolution, config.voxel_size);
        grid.seed_platform(STARTER_PLATFORM_HALF_EXTENT, Voxel::new(180, 180, 180));

        let (width, height) = config.render_resolution(window_width, window_height);
        let camera = Camera::look_at(
            config.camera.initial_position(),
            config.camera.initial_look_at(),
            config.camera.up(),
        );
        let renderer = CpuRenderer::new(grid, camera, width, height);

        Self::new(config, renderer, (width, height))
    }

    /// Voxel count reported in the shutdown log
    pub fn voxel_count(&self) -> usize {
        self.renderer.grid().len()
    }
}
