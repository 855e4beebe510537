//! Error types for the voxel editor

use thiserror::Error;

/// Main error type for the editor.
///
/// The interaction core (camera, gesture, loop) never produces one of these;
/// they come from the edges: config files, save slots, GPU setup, screenshots.
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Save slot error: {0}")]
    SaveSlot(String),

    #[error("Image error: {0}")]
    Image(String),
}
