//! Per-frame composition of camera, edit gesture and mode toggle

use crate::core::camera_controller::OrbitCamera;
use crate::core::input::FrameInput;
use crate::render::{CpuRenderer, VoxelRenderer};
use super::arbitration::MouseOwner;
use super::context::EditorContext;
use super::gesture::{EditGesture, Mutation};
use super::hud::HudUpdate;

/// What a frame did to the scene
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Accumulated image was discarded this frame
    pub invalidated: bool,
    pub mutation: Option<Mutation>,
}

/// Drives the camera and the edit gesture once per frame
pub struct InteractionLoop<R> {
    context: EditorContext<R>,
    camera: OrbitCamera,
    gesture: EditGesture,
    in_edit_mode: bool,
}

impl<R: VoxelRenderer> InteractionLoop<R> {
    /// Build the loop and start the context
    pub fn new(mut context: EditorContext<R>) -> Self {
        context.startup();
        let camera = OrbitCamera::from_config(&context.config.camera);
        let gesture = EditGesture::new(&context.config.edit, context.render_resolution);

        Self {
            context,
            camera,
            gesture,
            in_edit_mode: false,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn gesture(&self) -> &EditGesture {
        &self.gesture
    }

    pub fn context(&self) -> &EditorContext<R> {
        &self.context
    }

    pub fn renderer(&self) -> &R {
        &self.context.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.context.renderer
    }

    pub fn in_edit_mode(&self) -> bool {
        self.in_edit_mode
    }

    /// Track a new render resolution for pointer-to-pixel mapping
    pub fn set_render_resolution(&mut self, width: u32, height: u32) {
        self.context.render_resolution = (width, height);
        self.gesture.set_render_resolution(width, height);
    }

    /// Run one frame. The camera is always updated after the edit gesture and
    /// the framebuffer is reset at most once.
    pub fn frame(&mut self, input: &FrameInput, hud: &HudUpdate) -> FrameOutcome {
        let renderer = &mut self.context.renderer;
        let owner = MouseOwner::resolve(&self.camera, input);
        self.in_edit_mode = hud.in_edit_mode;

        let mut outcome = FrameOutcome::default();

        if self.in_edit_mode {
            if hud.edit_mode_changed {
                self.gesture.reset();
            }
            outcome.mutation = self.gesture.process(input, owner, renderer);
            outcome.invalidated = outcome.mutation.is_some() || self.gesture.pointer_moved();
        } else if hud.edit_mode_changed {
            renderer.clear_highlighted_voxel();
        }

        if self.camera.update_from_input(input) {
            let position = self.camera.position();
            let look_at = self.camera.look_at();
            renderer.set_camera_pos(position.x, position.y, position.z);
            renderer.set_look_at(look_at.x, look_at.y, look_at.z);
            outcome.invalidated = true;
        }

        if outcome.invalidated {
            renderer.reset_framebuffer();
        }

        outcome
    }

    /// Stop the context and hand it back
    pub fn shutdown(mut self) -> EditorContext<R> {
        self.context.shutdown();
        self.context
    }
}

impl InteractionLoop<CpuRenderer> {
    /// Run the configured number of accumulation passes
    pub fn accumulate(&mut self) {
        for _ in 0..self.context.config.samples_per_frame.max(1) {
            self.context.renderer.accumulate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EditorConfig;
    use crate::core::input::{MoveKey, MoveKeys};
    use crate::core::types::{IVec3, Vec2};
    use crate::render::recording::{RecordingRenderer, RendererCall};

    const SOLID: IVec3 = IVec3::new(3, 0, 3);
    const EMPTY: IVec3 = IVec3::new(3, 1, 3);

    fn interaction() -> InteractionLoop<RecordingRenderer> {
        let renderer = RecordingRenderer::with_hits(Some(SOLID), Some(EMPTY));
        let context = EditorContext::new(EditorConfig::default(), renderer, (100, 100));
        let mut interaction = InteractionLoop::new(context);
        interaction.renderer_mut().take_calls();
        interaction
    }

    fn edit(changed: bool) -> HudUpdate {
        HudUpdate { in_edit_mode: true, edit_mode_changed: changed, action: None }
    }

    fn view(changed: bool) -> HudUpdate {
        HudUpdate { in_edit_mode: false, edit_mode_changed: changed, action: None }
    }

    fn at(x: f32, y: f32) -> FrameInput {
        FrameInput { pointer: Vec2::new(x, y), ..Default::default() }
    }

    #[test]
    fn test_new_starts_context() {
        let renderer = RecordingRenderer::new();
        let context = EditorContext::new(EditorConfig::default(), renderer, (100, 100));
        let interaction = InteractionLoop::new(context);
        assert!(interaction.context().is_started());
        assert_eq!(interaction.renderer().resets(), 1);
    }

    #[test]
    fn test_idle_view_frame_does_nothing() {
        let mut interaction = interaction();
        let outcome = interaction.frame(&at(0.5, 0.5), &view(false));
        assert_eq!(outcome, FrameOutcome::default());
        assert!(interaction.renderer().calls.is_empty());
    }

    #[test]
    fn test_leaving_edit_mode_clears_highlight_once() {
        let mut interaction = interaction();
        interaction.frame(&at(0.5, 0.5), &edit(true));
        interaction.frame(&at(0.5, 0.5), &edit(false));
        interaction.renderer_mut().take_calls();

        interaction.frame(&at(0.5, 0.5), &view(true));
        interaction.frame(&at(0.5, 0.5), &view(false));

        let renderer = interaction.renderer();
        assert_eq!(renderer.calls, vec![RendererCall::ClearHighlight]);
        assert!(renderer.adds().is_empty() && renderer.deletes().is_empty());
        assert!(!interaction.in_edit_mode());
    }

    #[test]
    fn test_edit_mutation_invalidates() {
        let mut interaction = interaction();
        interaction.frame(&at(0.5, 0.5), &edit(true));
        interaction.renderer_mut().take_calls();

        let click = FrameInput { primary_held: true, ..at(0.5, 0.5) };
        let outcome = interaction.frame(&click, &edit(false));

        assert_eq!(outcome.mutation, Some(Mutation::Added(EMPTY)));
        assert!(outcome.invalidated);
        assert_eq!(interaction.renderer().resets(), 1);
    }

    #[test]
    fn test_still_pointer_in_edit_mode_keeps_image() {
        let mut interaction = interaction();
        // First edit frame has no previous pointer and counts as moved
        assert!(interaction.frame(&at(0.5, 0.5), &edit(true)).invalidated);

        let outcome = interaction.frame(&at(0.5, 0.5), &edit(false));
        assert!(!outcome.invalidated);

        let outcome = interaction.frame(&at(0.6, 0.5), &edit(false));
        assert!(outcome.invalidated);
    }

    #[test]
    fn test_edit_and_move_reset_once() {
        let mut interaction = interaction();
        interaction.frame(&at(0.5, 0.5), &edit(true));
        interaction.renderer_mut().take_calls();

        let input = FrameInput {
            pointer: Vec2::new(0.7, 0.5),
            primary_held: true,
            move_keys: MoveKeys::NONE.with(MoveKey::Forward),
            ..Default::default()
        };
        let outcome = interaction.frame(&input, &edit(false));

        assert!(outcome.invalidated);
        assert!(outcome.mutation.is_some());
        assert_eq!(interaction.renderer().resets(), 1);

        // Camera pose reaches the renderer after the edit
        let calls = &interaction.renderer().calls;
        let add = calls.iter().position(|c| matches!(c, RendererCall::AddVoxel { .. }));
        let pose = calls.iter().position(|c| matches!(c, RendererCall::SetCameraPos(_)));
        assert!(add < pose);
    }

    #[test]
    fn test_camera_move_pushes_pose() {
        let mut interaction = interaction();
        let input = FrameInput { move_keys: MoveKeys::NONE.with(MoveKey::Up), ..Default::default() };

        let outcome = interaction.frame(&input, &view(false));
        assert!(outcome.invalidated);

        let position = interaction.camera().position();
        let look_at = interaction.camera().look_at();
        assert_eq!(
            interaction.renderer().calls,
            vec![
                RendererCall::SetCameraPos(position),
                RendererCall::SetLookAt(look_at),
                RendererCall::ResetFramebuffer,
            ]
        );
    }

    #[test]
    fn test_rotation_modifier_blocks_edits() {
        let mut interaction = interaction();
        interaction.frame(&at(0.5, 0.5), &edit(true));
        interaction.renderer_mut().take_calls();

        for i in 0..5 {
            let input = FrameInput {
                primary_held: true,
                modifier_held: true,
                ..at(0.5 + i as f32 * 0.01, 0.5)
            };
            assert!(interaction.frame(&input, &edit(false)).mutation.is_none());
        }

        assert_eq!(interaction.renderer().raycasts(), 0);
        assert!(interaction.renderer().adds().is_empty());
    }

    #[test]
    fn test_reentering_edit_mode_rearms() {
        let mut interaction = interaction();
        let click = FrameInput { primary_held: true, ..at(0.5, 0.5) };

        interaction.frame(&click, &edit(true));
        interaction.frame(&click, &view(true));
        interaction.frame(&click, &edit(true));

        assert_eq!(interaction.renderer().adds().len(), 2);
    }

    #[test]
    fn test_shutdown_returns_context() {
        let interaction = interaction();
        let context = interaction.shutdown();
        assert!(!context.is_started());
        assert_eq!(context.renderer.clears(), 1);
    }
}
