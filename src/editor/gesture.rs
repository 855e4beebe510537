//! Edit gesture state machine
//!
//! Turns per-frame pointer and button state into at most one voxel mutation
//! per press. After a mutation fires the gesture is `Held` and ignores the
//! buttons until a button is released or the pointer moves far enough from
//! where the mutation fired to count as a new target.

use crate::core::config::EditConfig;
use crate::core::input::FrameInput;
use crate::core::types::{IVec2, IVec3, Vec2, Vec3};
use crate::render::VoxelRenderer;
use super::arbitration::MouseOwner;

/// Observable gesture state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureState {
    /// Eligible to raycast and mutate
    #[default]
    Ready,
    /// A mutation already fired for the current press
    Held,
}

/// Grid change committed by a gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Added(IVec3),
    Deleted(IVec3),
}

pub struct EditGesture {
    state: GestureState,
    last_pointer: Option<Vec2>,
    /// Pointer position at the frame the current hold's mutation fired
    held_anchor: Option<Vec2>,
    pointer_moved: bool,
    /// Squared distance from the anchor that re-arms a held gesture
    rearm_threshold_sq: f32,
    add_color: Vec3,
    /// Render resolution used to turn the normalized pointer into a pixel
    render_resolution: (u32, u32),
}

impl EditGesture {
    pub fn new(config: &EditConfig, render_resolution: (u32, u32)) -> Self {
        Self {
            state: GestureState::Ready,
            last_pointer: None,
            held_anchor: None,
            pointer_moved: false,
            rearm_threshold_sq: config.rearm_threshold_sq,
            add_color: Vec3::from_array(config.add_color),
            render_resolution,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Whether the pointer position changed during the last processed frame
    pub fn pointer_moved(&self) -> bool {
        self.pointer_moved
    }

    pub fn set_render_resolution(&mut self, width: u32, height: u32) {
        self.render_resolution = (width.max(1), height.max(1));
    }

    /// Return to `Ready` and forget the previous pointer position
    pub fn reset(&mut self) {
        self.state = GestureState::Ready;
        self.last_pointer = None;
        self.held_anchor = None;
        self.pointer_moved = false;
    }

    /// Render pixel under a normalized pointer position
    pub fn pointer_pixel(&self, pointer: Vec2) -> IVec2 {
        let (w, h) = self.render_resolution;
        let px = (pointer.x * w as f32).floor() as i32;
        let py = (pointer.y * h as f32).floor() as i32;
        IVec2::new(px.clamp(0, w as i32 - 1), py.clamp(0, h as i32 - 1))
    }

    /// Run one frame of the gesture
    pub fn process<R: VoxelRenderer>(
        &mut self,
        input: &FrameInput,
        owner: MouseOwner,
        renderer: &mut R,
    ) -> Option<Mutation> {
        let pointer = input.pointer;
        self.pointer_moved = self.last_pointer != Some(pointer);
        self.last_pointer = Some(pointer);

        match self.state {
            GestureState::Ready if owner.is_editor() => self.try_mutate(input, renderer),
            GestureState::Ready => None,
            GestureState::Held => {
                let drift_sq = self
                    .held_anchor
                    .map_or(0.0, |anchor| (pointer - anchor).length_squared());
                if input.button_released || drift_sq > self.rearm_threshold_sq {
                    self.state = GestureState::Ready;
                    self.held_anchor = None;
                }
                None
            }
        }
    }

    fn try_mutate<R: VoxelRenderer>(&mut self, input: &FrameInput, renderer: &mut R) -> Option<Mutation> {
        let pixel = self.pointer_pixel(input.pointer);
        let highlighted = renderer.raycast_voxel_grid(pixel, true);

        if input.primary_held {
            let cell = renderer.raycast_voxel_grid(pixel, false)?;
            renderer.add_voxel(cell, self.add_color);
            self.hold(input.pointer);
            log::debug!("Added voxel at {:?}", cell);
            return Some(Mutation::Added(cell));
        }

        if input.secondary_held {
            let cell = highlighted?;
            renderer.delete_voxel(cell);
            self.hold(input.pointer);
            log::debug!("Deleted voxel at {:?}", cell);
            return Some(Mutation::Deleted(cell));
        }

        None
    }

    fn hold(&mut self, pointer: Vec2) {
        self.state = GestureState::Held;
        self.held_anchor = Some(pointer);
    }
}
