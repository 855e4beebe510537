use criterion::{criterion_group, criterion_main, Criterion, black_box};

use voxedit::core::camera::Camera;
use voxedit::core::types::{IVec2, IVec3};
use voxedit::math::Ray;
use voxedit::render::{CpuRenderer, VoxelRenderer};
use voxedit::voxel::{Voxel, VoxelGrid};

use glam::Vec3;

fn test_grid() -> VoxelGrid {
    let mut grid = VoxelGrid::new(64, 1.0 / 32.0);
    grid.seed_platform(8, Voxel::new(180, 180, 180));
    for y in 1..12 {
        grid.set(IVec3::new(32, y, 32), Voxel::new(200, 80, 80));
    }
    grid
}

fn bench_grid_raycast_hit(c: &mut Criterion) {
    let grid = test_grid();
    let origin = Vec3::new(1.0, 1.5, 2.0);
    let ray = Ray::new(origin, (Vec3::ZERO - origin).normalize());

    c.bench_function("grid_raycast_hit", |b| {
        b.iter(|| grid.raycast(black_box(&ray), black_box(true)));
    });
}

fn bench_grid_raycast_floor(c: &mut Criterion) {
    let grid = VoxelGrid::new(64, 1.0 / 32.0);
    let origin = Vec3::new(1.0, 1.5, 2.0);
    let ray = Ray::new(origin, (Vec3::new(-0.5, 0.0, -0.7) - origin).normalize());

    c.bench_function("grid_raycast_floor", |b| {
        b.iter(|| grid.raycast(black_box(&ray), black_box(false)));
    });
}

fn bench_pixel_raycast(c: &mut Criterion) {
    let mut renderer = CpuRenderer::new(test_grid(), Camera::default(), 320, 180);

    c.bench_function("renderer_pixel_raycast", |b| {
        b.iter(|| renderer.raycast_voxel_grid(black_box(IVec2::new(160, 90)), true));
    });
}

fn bench_accumulate_320x180(c: &mut Criterion) {
    let mut renderer = CpuRenderer::new(test_grid(), Camera::default(), 320, 180);

    c.bench_function("accumulate_320x180", |b| {
        b.iter(|| renderer.accumulate());
    });
}

criterion_group!(
    benches,
    bench_grid_raycast_hit,
    bench_grid_raycast_floor,
    bench_pixel_raycast,
    bench_accumulate_320x180,
);
criterion_main!(benches);
