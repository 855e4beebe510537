//! Core editor types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod config;
pub mod time;
pub mod input;
pub mod camera;
pub mod camera_controller;

pub use types::*;
pub use error::Error;
