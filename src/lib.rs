//! voxedit - interactive voxel scene editor

pub mod core;
pub mod math;
pub mod voxel;
pub mod render;
pub mod editor;
