//! Sparse bounded voxel grid with DDA ray traversal
//!
//! The grid covers `[0, resolution)` cells on each axis. In world space it is
//! centred on the origin in x/z and rests on the floor plane y = 0.

use std::collections::HashMap;

use crate::core::types::{IVec3, Vec3};
use crate::math::{Aabb, Ray};
use super::voxel::Voxel;

/// Result of tracing a ray through the grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GridHit {
    /// Ray struck an occupied cell
    Voxel {
        cell: IVec3,
        /// Outward normal of the face the ray entered through (zero if the
        /// ray started inside the cell)
        normal: IVec3,
        t: f32,
    },
    /// Ray reached the floor inside the grid footprint without striking a voxel
    Floor {
        /// Empty bottom-layer cell directly above the floor hit
        cell: IVec3,
        t: f32,
    },
}

/// Sparse voxel storage keyed by integer cell index
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    resolution: u32,
    voxel_size: f32,
    cells: HashMap<IVec3, Voxel>,
}

impl VoxelGrid {
    /// Create an empty grid
    pub fn new(resolution: u32, voxel_size: f32) -> Self {
        Self {
            resolution,
            voxel_size,
            cells: HashMap::new(),
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Number of solid voxels
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all solid voxels
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, Voxel)> + '_ {
        self.cells.iter().map(|(cell, voxel)| (*cell, *voxel))
    }

    /// World-space bounds of the whole grid
    pub fn bounds(&self) -> Aabb {
        let extent = self.resolution as f32 * self.voxel_size;
        let half = extent * 0.5;
        Aabb::new(Vec3::new(-half, 0.0, -half), Vec3::new(half, extent, half))
    }

    /// Whether a cell index lies inside the grid
    pub fn contains(&self, cell: IVec3) -> bool {
        let res = self.resolution as i32;
        cell.cmpge(IVec3::ZERO).all() && cell.cmplt(IVec3::splat(res)).all()
    }

    pub fn get(&self, cell: IVec3) -> Option<Voxel> {
        self.cells.get(&cell).copied()
    }

    pub fn is_solid(&self, cell: IVec3) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Place a voxel. Returns false (and stores nothing) for out-of-bounds cells.
    pub fn set(&mut self, cell: IVec3, voxel: Voxel) -> bool {
        if !self.contains(cell) {
            return false;
        }
        self.cells.insert(cell, voxel);
        true
    }

    /// Remove a voxel, returning it if the cell was occupied
    pub fn remove(&mut self, cell: IVec3) -> Option<Voxel> {
        self.cells.remove(&cell)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Cell containing a world-space point (may be out of bounds)
    pub fn cell_of(&self, point: Vec3) -> IVec3 {
        ((point - self.bounds().min) / self.voxel_size).floor().as_ivec3()
    }

    /// World-space centre of a cell
    pub fn cell_center(&self, cell: IVec3) -> Vec3 {
        self.bounds().min + (cell.as_vec3() + 0.5) * self.voxel_size
    }

    /// Fill a square single-layer platform of `2 * half_extent` cells per side
    /// centred on the grid's floor.
    pub fn seed_platform(&mut self, half_extent: i32, voxel: Voxel) {
        let mid = self.resolution as i32 / 2;
        for x in (mid - half_extent)..(mid + half_extent) {
            for z in (mid - half_extent)..(mid + half_extent) {
                self.set(IVec3::new(x, 0, z), voxel);
            }
        }
    }

    /// Cell query used for editing.
    ///
    /// `solid = true` returns the first occupied cell along the ray.
    /// `solid = false` returns the empty cell where a new voxel would go:
    /// the neighbour across the struck face, or the floor cell under the ray.
    pub fn raycast(&self, ray: &Ray, solid: bool) -> Option<IVec3> {
        match self.trace(ray)? {
            GridHit::Voxel { cell, normal, .. } => {
                if solid {
                    return Some(cell);
                }
                let neighbour = cell + normal;
                (normal != IVec3::ZERO && self.contains(neighbour)).then_some(neighbour)
            }
            GridHit::Floor { cell, .. } => (!solid).then_some(cell),
        }
    }

    /// Walk the ray through the grid with a 3D DDA (Amanatides & Woo).
    pub fn trace(&self, ray: &Ray) -> Option<GridHit> {
        let bounds = self.bounds();
        let (t_enter, _) = ray.intersects_aabb(&bounds)?;
        let res = self.resolution as i32;
        let dx = self.voxel_size;

        let entry = ray.at(t_enter);
        let mut cell = ((entry - bounds.min) / dx)
            .floor()
            .as_ivec3()
            .clamp(IVec3::ZERO, IVec3::splat(res - 1));

        let step = IVec3::new(
            axis_step(ray.direction.x),
            axis_step(ray.direction.y),
            axis_step(ray.direction.z),
        );

        let mut t_max = Vec3::splat(f32::INFINITY);
        let mut t_delta = Vec3::splat(f32::INFINITY);
        for axis in 0..3 {
            if step[axis] == 0 {
                continue;
            }
            let next = cell[axis] + if step[axis] > 0 { 1 } else { 0 };
            let boundary = bounds.min[axis] + next as f32 * dx;
            t_max[axis] = (boundary - ray.origin[axis]) * ray.inv_direction[axis];
            t_delta[axis] = (dx * ray.inv_direction[axis]).abs();
        }

        let mut t = t_enter;
        let mut normal = if t_enter > 0.0 {
            entry_normal(ray, &bounds, step)
        } else {
            IVec3::ZERO
        };

        loop {
            if self.is_solid(cell) {
                return Some(GridHit::Voxel { cell, normal, t });
            }

            let axis = if t_max.x < t_max.y {
                if t_max.x < t_max.z { 0 } else { 2 }
            } else if t_max.y < t_max.z {
                1
            } else {
                2
            };

            if t_max[axis].is_infinite() {
                return None;
            }

            t = t_max[axis];
            t_max[axis] += t_delta[axis];
            cell[axis] += step[axis];
            normal = IVec3::ZERO;
            normal[axis] = -step[axis];

            if cell[axis] < 0 || cell[axis] >= res {
                // Leaving through the bottom face lands on the floor
                if axis == 1 && step.y < 0 {
                    cell.y = 0;
                    return Some(GridHit::Floor { cell, t });
                }
                return None;
            }
        }
    }
}

fn axis_step(d: f32) -> i32 {
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}

/// Outward normal of the bounds face a ray enters through
fn entry_normal(ray: &Ray, bounds: &Aabb, step: IVec3) -> IVec3 {
    let t1 = (bounds.min - ray.origin) * ray.inv_direction;
    let t2 = (bounds.max - ray.origin) * ray.inv_direction;
    let t_near = t1.min(t2);

    let mut axis = 0;
    for a in 1..3 {
        if step[a] != 0 && (step[axis] == 0 || t_near[a] > t_near[axis]) {
            axis = a;
        }
    }

    let mut normal = IVec3::ZERO;
    normal[axis] = -step[axis];
    normal
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: u32 = 64;
    const DX: f32 = 1.0 / 32.0;

    fn grid() -> VoxelGrid {
        VoxelGrid::new(RES, DX)
    }

    fn down_through(grid: &VoxelGrid, cell: IVec3) -> Ray {
        let c = grid.cell_center(cell);
        Ray::new(Vec3::new(c.x, 5.0, c.z), Vec3::NEG_Y)
    }

    #[test]
    fn test_bounds() {
        let bounds = grid().bounds();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_cell_mapping() {
        let grid = grid();
        let cell = IVec3::new(10, 3, 40);
        assert_eq!(grid.cell_of(grid.cell_center(cell)), cell);
        assert_eq!(grid.cell_of(Vec3::new(0.001, 0.001, 0.001)), IVec3::new(32, 0, 32));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = grid();
        assert!(!grid.set(IVec3::new(-1, 0, 0), Voxel::new(1, 2, 3)));
        assert!(!grid.set(IVec3::new(0, 64, 0), Voxel::new(1, 2, 3)));
        assert!(grid.set(IVec3::new(0, 63, 0), Voxel::new(1, 2, 3)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_empty_grid_hits_floor() {
        let grid = grid();
        let target = IVec3::new(20, 0, 45);
        let ray = down_through(&grid, target);

        assert_eq!(grid.raycast(&ray, false), Some(target));
        assert_eq!(grid.raycast(&ray, true), None);
    }

    #[test]
    fn test_vertical_hit_and_place_above() {
        let mut grid = grid();
        let cell = IVec3::new(32, 0, 32);
        grid.set(cell, Voxel::new(255, 0, 0));
        let ray = down_through(&grid, cell);

        assert_eq!(grid.raycast(&ray, true), Some(cell));
        assert_eq!(grid.raycast(&ray, false), Some(IVec3::new(32, 1, 32)));

        match grid.trace(&ray) {
            Some(GridHit::Voxel { t, normal, .. }) => {
                assert!((t - (5.0 - DX)).abs() < 1e-4);
                assert_eq!(normal, IVec3::Y);
            }
            other => panic!("expected voxel hit, got {:?}", other),
        }
    }

    #[test]
    fn test_horizontal_hit_places_on_near_side() {
        let mut grid = grid();
        let cell = IVec3::new(40, 5, 12);
        grid.set(cell, Voxel::new(0, 255, 0));

        let c = grid.cell_center(cell);
        let ray = Ray::new(Vec3::new(-3.0, c.y, c.z), Vec3::X);

        assert_eq!(grid.raycast(&ray, true), Some(cell));
        assert_eq!(grid.raycast(&ray, false), Some(IVec3::new(39, 5, 12)));
    }

    #[test]
    fn test_diagonal_ray() {
        let mut grid = grid();
        let cell = IVec3::new(32, 0, 32);
        grid.set(cell, Voxel::new(1, 1, 1));

        let origin = Vec3::new(1.0, 1.5, 2.0);
        let target = grid.cell_center(cell);
        let ray = Ray::new(origin, (target - origin).normalize());

        assert_eq!(grid.raycast(&ray, true), Some(cell));
        let place = grid.raycast(&ray, false).unwrap();
        assert_eq!((place - cell).abs().element_sum(), 1);
        assert!(!grid.is_solid(place));
    }

    #[test]
    fn test_miss() {
        let grid = grid();
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::Y);
        assert!(grid.trace(&ray).is_none());
    }

    #[test]
    fn test_hit_at_entry_cell_has_no_outside_neighbour() {
        let mut grid = grid();
        let cell = IVec3::new(0, 5, 12);
        grid.set(cell, Voxel::new(1, 1, 1));
        let c = grid.cell_center(cell);
        let ray = Ray::new(Vec3::new(-3.0, c.y, c.z), Vec3::X);

        assert_eq!(grid.raycast(&ray, true), Some(cell));
        assert_eq!(grid.raycast(&ray, false), None);
    }

    #[test]
    fn test_seed_platform() {
        let mut grid = grid();
        grid.seed_platform(2, Voxel::new(9, 9, 9));
        assert_eq!(grid.len(), 16);
        assert!(grid.is_solid(IVec3::new(30, 0, 30)));
        assert!(grid.is_solid(IVec3::new(33, 0, 33)));
        assert!(!grid.is_solid(IVec3::new(34, 0, 33)));
    }
}
