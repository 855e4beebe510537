//! Keyboard HUD: mode toggle, save/load and screenshot bindings

use winit::keyboard::KeyCode;

use crate::core::input::InputState;

const SLOT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// One-shot request raised by the HUD
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudAction {
    Save,
    LoadLatest,
    /// Load the n-th slot (0-based) in listing order
    LoadSlot(usize),
    Screenshot,
}

/// Result of one HUD frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudUpdate {
    pub in_edit_mode: bool,
    /// Mode flipped this frame
    pub edit_mode_changed: bool,
    pub action: Option<HudAction>,
}

/// Tracks editor mode and maps function keys to actions
#[derive(Debug, Default)]
pub struct HudManager {
    in_edit_mode: bool,
}

impl HudManager {
    pub fn new(in_edit_mode: bool) -> Self {
        Self { in_edit_mode }
    }

    pub fn in_edit_mode(&self) -> bool {
        self.in_edit_mode
    }

    pub fn update(&mut self, input: &InputState) -> HudUpdate {
        self.apply_keys(|key| input.is_key_just_pressed(key))
    }

    fn apply_keys(&mut self, just_pressed: impl Fn(KeyCode) -> bool) -> HudUpdate {
        let edit_mode_changed = just_pressed(KeyCode::Tab);
        if edit_mode_changed {
            self.in_edit_mode = !self.in_edit_mode;
            log::info!("{} mode", if self.in_edit_mode { "Edit" } else { "View" });
        }

        let action = if just_pressed(KeyCode::F5) {
            Some(HudAction::Save)
        } else if just_pressed(KeyCode::F9) {
            Some(HudAction::LoadLatest)
        } else if just_pressed(KeyCode::F12) {
            Some(HudAction::Screenshot)
        } else {
            SLOT_KEYS
                .iter()
                .position(|key| just_pressed(*key))
                .map(HudAction::LoadSlot)
        };

        HudUpdate {
            in_edit_mode: self.in_edit_mode,
            edit_mode_changed,
            action,
        }
    }

    /// Window title text
    pub fn status_line(&self, fps: f32, samples: u32, voxels: usize) -> String {
        let mode = if self.in_edit_mode { "EDIT" } else { "VIEW" };
        format!(
            "voxedit | {} | {:.0} fps | {} spp | {} voxels | Tab: mode  F1: help",
            mode, fps, samples, voxels
        )
    }

    pub fn print_help() {
        log::info!("=== Controls ===");
        log::info!("  Tab         - Toggle edit/view mode");
        log::info!("  Ctrl + LMB  - Orbit camera");
        log::info!("  W/A/S/D     - Move forward/left/back/right");
        log::info!("  E/Q         - Move up/down");
        log::info!("  LMB         - Add voxel (edit mode)");
        log::info!("  RMB         - Remove voxel (edit mode)");
        log::info!("  F5          - Save to a new slot");
        log::info!("  F9          - Load most recent slot");
        log::info!("  1-9         - Load slot by index");
        log::info!("  F12         - Screenshot");
        log::info!("  F1          - Show this help");
        log::info!("  Escape      - Quit");
    }
}
