//! Voxel data type

use bytemuck::{Pod, Zeroable};
use rkyv::{Archive, Deserialize, Serialize};

use crate::core::types::Vec3;

/// Single solid voxel - an sRGB-ish 8-bit color
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Archive, Deserialize, Serialize)]
pub struct Voxel {
    pub color: [u8; 3],
}

impl Voxel {
    /// Create voxel from RGB888 values
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { color: [r, g, b] }
    }

    /// Create voxel from a [0, 1] float color, clamping out-of-range channels
    pub fn from_rgb_f32(rgb: Vec3) -> Self {
        let c = (rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        Self::new(c.x as u8, c.y as u8, c.z as u8)
    }

    /// Color as [0, 1] floats
    pub fn to_rgb_f32(&self) -> Vec3 {
        Vec3::new(
            self.color[0] as f32,
            self.color[1] as f32,
            self.color[2] as f32,
        ) / 255.0
    }
}
