//! Frame rendering
//!
//! The [`FrameRenderer`] walks the scene once per tick against a
//! [`RenderContext`]. [`RenderEngine`] is the wgpu implementation of that
//! context; [`RecordingContext`](context::RecordingContext) stands in for it
//! in tests.

pub mod context;
pub mod frame_renderer;
pub mod options;
pub mod pipeline_manager;
pub mod render_engine;

use crate::gfx::program::UniformError;

// Re-export main types
pub use context::{MeshHandle, PrimitiveKind, RenderContext};
pub use frame_renderer::FrameRenderer;
pub use options::{RasterState, RenderOptions, ShadingMode};
pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineKey, PipelineManager};
pub use render_engine::RenderEngine;

/// Error type for drawing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("mesh {0} was not created by this context")]
    UnknownMesh(usize),

    #[error(transparent)]
    Uniform(#[from] UniformError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
