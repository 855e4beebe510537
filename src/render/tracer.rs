//! Progressive CPU ray tracer over a [`VoxelGrid`]
//!
//! Every call to [`CpuRenderer::accumulate`] traces one jittered sample per
//! pixel and adds it to a running sum; the displayed image is the average.
//! Any change to the scene or the camera must be followed by
//! `reset_framebuffer` or old samples bleed into the new view.

use rayon::prelude::*;

use crate::core::camera::Camera;
use crate::core::types::{IVec2, IVec3, Vec2, Vec3};
use crate::math::Ray;
use crate::voxel::{GridHit, Voxel, VoxelGrid};
use super::renderer::VoxelRenderer;

const SKY_HORIZON: Vec3 = Vec3::new(0.85, 0.9, 1.0);
const SKY_ZENITH: Vec3 = Vec3::new(0.35, 0.55, 0.9);
const FLOOR_LIGHT: Vec3 = Vec3::new(0.75, 0.75, 0.72);
const FLOOR_DARK: Vec3 = Vec3::new(0.55, 0.55, 0.52);
const HIGHLIGHT_TINT: Vec3 = Vec3::new(1.0, 0.85, 0.3);
const AMBIENT: f32 = 0.35;
const SHADOW_BIAS: f32 = 1e-3;

/// Software renderer implementing the editor's renderer contract
pub struct CpuRenderer {
    grid: VoxelGrid,
    camera: Camera,
    width: u32,
    height: u32,
    /// Running sum of samples, row 0 is the bottom row
    accum: Vec<Vec3>,
    samples: u32,
    highlighted: Option<IVec3>,
    sun_dir: Vec3,
}

impl CpuRenderer {
    pub fn new(grid: VoxelGrid, mut camera: Camera, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        camera.set_aspect(width as f32, height as f32);

        Self {
            grid,
            camera,
            width,
            height,
            accum: vec![Vec3::ZERO; (width * height) as usize],
            samples: 0,
            highlighted: None,
            sun_dir: Vec3::new(0.4, 1.0, 0.3).normalize(),
        }
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Swap in a new grid (after loading a save slot)
    pub fn replace_grid(&mut self, grid: VoxelGrid) {
        self.grid = grid;
        self.highlighted = None;
        self.reset_framebuffer();
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Currently highlighted cell
    pub fn highlighted(&self) -> Option<IVec3> {
        self.highlighted
    }

    /// Number of samples averaged into the current image
    pub fn sample_count(&self) -> u32 {
        self.samples
    }

    /// Change the trace resolution, discarding accumulated samples
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.camera.set_aspect(self.width as f32, self.height as f32);
        self.accum = vec![Vec3::ZERO; (self.width * self.height) as usize];
        self.samples = 0;
    }

    fn pixel_ray(&self, pixel: IVec2) -> Ray {
        self.camera.primary_ray(
            pixel.x as f32 + 0.5,
            pixel.y as f32 + 0.5,
            self.width,
            self.height,
        )
    }

    /// Trace one sample per pixel into the accumulation buffer
    pub fn accumulate(&mut self) {
        let seed = self.samples;
        let width = self.width as usize;
        let (w, h) = (self.width, self.height);
        let camera = &self.camera;
        let scene = Scene {
            grid: &self.grid,
            highlighted: self.highlighted,
            sun_dir: self.sun_dir,
        };

        self.accum
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, sum) in row.iter_mut().enumerate() {
                    let jx = hash_2d(x as i32, y as i32, seed.wrapping_mul(2));
                    let jy = hash_2d(x as i32, y as i32, seed.wrapping_mul(2).wrapping_add(1));
                    let ray = camera.primary_ray(x as f32 + jx, y as f32 + jy, w, h);
                    *sum += scene.shade(&ray);
                }
            });

        self.samples += 1;
    }

    /// Averaged image as tightly packed RGBA8, top row first
    pub fn fetch_image(&self) -> Vec<u8> {
        let width = self.width as usize;
        let inv = 1.0 / self.samples.max(1) as f32;

        let pixels: Vec<[u8; 4]> = self
            .accum
            .par_chunks(width)
            .rev()
            .flat_map_iter(|row| row.iter().map(move |sum| to_rgba8(*sum * inv)))
            .collect();

        bytemuck::cast_slice(&pixels).to_vec()
    }
}

impl VoxelRenderer for CpuRenderer {
    fn raycast_voxel_grid(&mut self, pixel: IVec2, solid: bool) -> Option<IVec3> {
        let ray = self.pixel_ray(pixel);
        let hit = self.grid.raycast(&ray, solid);

        if solid && self.highlighted != hit {
            self.highlighted = hit;
            self.reset_framebuffer();
        }
        hit
    }

    fn add_voxel(&mut self, cell: IVec3, color: Vec3) {
        if !self.grid.set(cell, Voxel::from_rgb_f32(color)) {
            log::debug!("Ignoring add outside the grid at {:?}", cell);
        }
    }

    fn delete_voxel(&mut self, cell: IVec3) {
        self.grid.remove(cell);
        if self.highlighted == Some(cell) {
            self.highlighted = None;
        }
    }

    fn clear_highlighted_voxel(&mut self) {
        if self.highlighted.take().is_some() {
            self.reset_framebuffer();
        }
    }

    fn set_camera_pos(&mut self, x: f32, y: f32, z: f32) {
        self.camera.position = Vec3::new(x, y, z);
    }

    fn set_look_at(&mut self, x: f32, y: f32, z: f32) {
        self.camera.look_at = Vec3::new(x, y, z);
    }

    fn reset_framebuffer(&mut self) {
        self.accum.fill(Vec3::ZERO);
        self.samples = 0;
    }
}

/// Read-only view of what a sample needs, shared across worker threads
struct Scene<'a> {
    grid: &'a VoxelGrid,
    highlighted: Option<IVec3>,
    sun_dir: Vec3,
}

impl Scene<'_> {
    fn shade(&self, ray: &Ray) -> Vec3 {
        if let Some(GridHit::Voxel { cell, normal, t }) = self.grid.trace(ray) {
            let normal = if normal == IVec3::ZERO {
                -ray.direction
            } else {
                normal.as_vec3()
            };
            let albedo = self.grid.get(cell).map(|v| v.to_rgb_f32()).unwrap_or(Vec3::ONE);
            let color = albedo * self.light(ray.at(t), normal);

            return if self.highlighted == Some(cell) {
                color.lerp(HIGHLIGHT_TINT, 0.35)
            } else {
                color
            };
        }

        if let Some(t) = ray.intersects_plane_y(0.0) {
            let p = ray.at(t);
            let cell = (Vec2::new(p.x, p.z) / (self.grid.voxel_size() * 4.0)).floor().as_ivec2();
            let albedo = if (cell.x + cell.y) & 1 == 0 { FLOOR_LIGHT } else { FLOOR_DARK };
            // Fade the floor into the sky with distance
            let fade = (t / 20.0).min(1.0);
            return (albedo * self.light(p, Vec3::Y)).lerp(SKY_HORIZON, fade);
        }

        let k = ray.direction.y.max(0.0);
        SKY_HORIZON.lerp(SKY_ZENITH, k)
    }

    fn light(&self, point: Vec3, normal: Vec3) -> Vec3 {
        let n_dot_l = normal.dot(self.sun_dir).max(0.0);
        if n_dot_l == 0.0 {
            return Vec3::splat(AMBIENT);
        }

        let shadow_ray = Ray::new(point + normal * SHADOW_BIAS, self.sun_dir);
        let lit = !matches!(self.grid.trace(&shadow_ray), Some(GridHit::Voxel { .. }));
        let direct = if lit { n_dot_l } else { 0.0 };

        Vec3::splat(AMBIENT + (1.0 - AMBIENT) * direct)
    }
}

/// Integer hash producing a value in [0, 1].
fn hash_2d(ix: i32, iy: i32, seed: u32) -> f32 {
    let mut h = (ix as u32).wrapping_mul(374761393)
        .wrapping_add((iy as u32).wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

fn to_rgba8(linear: Vec3) -> [u8; 4] {
    let srgb = linear.clamp(Vec3::ZERO, Vec3::ONE).powf(1.0 / 2.2) * 255.0;
    [srgb.x.round() as u8, srgb.y.round() as u8, srgb.z.round() as u8, 255]
}
