//! Rendering: the renderer contract, the CPU tracer and GPU presentation

pub mod renderer;
pub mod tracer;
pub mod context;
pub mod display;
#[cfg(test)]
pub mod recording;

pub use renderer::VoxelRenderer;
pub use tracer::CpuRenderer;
pub use context::GpuContext;
pub use display::DisplayPipeline;
