//! Interactive editing: input arbitration, edit gesture, HUD and the frame loop

pub mod arbitration;
pub mod gesture;
pub mod context;
pub mod hud;
pub mod interaction;

pub use arbitration::MouseOwner;
pub use gesture::{EditGesture, GestureState, Mutation};
pub use context::EditorContext;
pub use hud::{HudAction, HudManager, HudUpdate};
pub use interaction::{FrameOutcome, InteractionLoop};
