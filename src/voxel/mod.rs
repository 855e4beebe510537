//! Voxel data structures and persistence

pub mod voxel;
pub mod grid;
pub mod slots;

pub use voxel::Voxel;
pub use grid::{GridHit, VoxelGrid};
pub use slots::SaveSlots;
