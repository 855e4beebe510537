//! Scripted renderer for exercising the interaction layer without a GPU

use std::collections::VecDeque;

use crate::core::types::{IVec2, IVec3, Vec3};
use super::renderer::VoxelRenderer;

/// One call made against the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum RendererCall {
    Raycast { pixel: IVec2, solid: bool },
    AddVoxel { cell: IVec3, color: Vec3 },
    DeleteVoxel { cell: IVec3 },
    ClearHighlight,
    SetCameraPos(Vec3),
    SetLookAt(Vec3),
    ResetFramebuffer,
}

/// Records every call and answers raycasts from a script.
///
/// Queued answers are consumed first; once the queue for a kind of raycast is
/// empty the matching default is returned.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RendererCall>,
    pub solid_hits: VecDeque<Option<IVec3>>,
    pub empty_hits: VecDeque<Option<IVec3>>,
    pub default_solid_hit: Option<IVec3>,
    pub default_empty_hit: Option<IVec3>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every solid raycast with `solid` and every placement raycast with `empty`
    pub fn with_hits(solid: Option<IVec3>, empty: Option<IVec3>) -> Self {
        Self {
            default_solid_hit: solid,
            default_empty_hit: empty,
            ..Default::default()
        }
    }

    pub fn count(&self, pred: impl Fn(&RendererCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn raycasts(&self) -> usize {
        self.count(|c| matches!(c, RendererCall::Raycast { .. }))
    }

    pub fn adds(&self) -> Vec<IVec3> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RendererCall::AddVoxel { cell, .. } => Some(*cell),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<IVec3> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RendererCall::DeleteVoxel { cell } => Some(*cell),
                _ => None,
            })
            .collect()
    }

    pub fn clears(&self) -> usize {
        self.count(|c| *c == RendererCall::ClearHighlight)
    }

    pub fn resets(&self) -> usize {
        self.count(|c| *c == RendererCall::ResetFramebuffer)
    }

    pub fn take_calls(&mut self) -> Vec<RendererCall> {
        std::mem::take(&mut self.calls)
    }
}

impl VoxelRenderer for RecordingRenderer {
    fn raycast_voxel_grid(&mut self, pixel: IVec2, solid: bool) -> Option<IVec3> {
        self.calls.push(RendererCall::Raycast { pixel, solid });
        if solid {
            self.solid_hits.pop_front().unwrap_or(self.default_solid_hit)
        } else {
            self.empty_hits.pop_front().unwrap_or(self.default_empty_hit)
        }
    }

    fn add_voxel(&mut self, cell: IVec3, color: Vec3) {
        self.calls.push(RendererCall::AddVoxel { cell, color });
    }

    fn delete_voxel(&mut self, cell: IVec3) {
        self.calls.push(RendererCall::DeleteVoxel { cell });
    }

    fn clear_highlighted_voxel(&mut self) {
        self.calls.push(RendererCall::ClearHighlight);
    }

    fn set_camera_pos(&mut self, x: f32, y: f32, z: f32) {
        self.calls.push(RendererCall::SetCameraPos(Vec3::new(x, y, z)));
    }

    fn set_look_at(&mut self, x: f32, y: f32, z: f32) {
        self.calls.push(RendererCall::SetLookAt(Vec3::new(x, y, z)));
    }

    fn reset_framebuffer(&mut self) {
        self.calls.push(RendererCall::ResetFramebuffer);
    }
}
