//! Renderer contract consumed by the interaction layer

use crate::core::types::{IVec2, IVec3, Vec3};

/// Operations the camera and edit gesture need from whatever owns the voxel
/// grid and the accumulated image.
///
/// Pixels are in render-resolution coordinates with the origin at the
/// bottom-left corner of the image.
pub trait VoxelRenderer {
    /// Cast the primary ray through `pixel` into the grid.
    ///
    /// With `solid = true` returns the first occupied cell and marks it as the
    /// highlighted cell. With `solid = false` returns the empty cell where a
    /// new voxel would be placed. `None` when nothing suitable is hit.
    fn raycast_voxel_grid(&mut self, pixel: IVec2, solid: bool) -> Option<IVec3>;

    /// Fill a cell with a color in [0, 1]
    fn add_voxel(&mut self, cell: IVec3, color: Vec3);

    /// Empty a cell
    fn delete_voxel(&mut self, cell: IVec3);

    /// Drop the highlight set by the last solid raycast
    fn clear_highlighted_voxel(&mut self);

    fn set_camera_pos(&mut self, x: f32, y: f32, z: f32);

    fn set_look_at(&mut self, x: f32, y: f32, z: f32);

    /// Discard accumulated samples
    fn reset_framebuffer(&mut self);
}
