//! Lightbench
//!
//! An interactive viewer for experimenting with multi-light Phong and
//! Gouraud shading, built on wgpu and winit.
//!
//! The frame logic lives in [`gfx::rendering::FrameRenderer`] and talks to
//! the GPU only through [`gfx::rendering::RenderContext`], so it can be
//! driven by the wgpu [`gfx::rendering::RenderEngine`] or by a recording
//! context in tests.

pub mod app;
pub mod config;
pub mod gfx;
pub mod state;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LightbenchApp;
pub use config::ViewerConfig;
pub use state::ViewerState;
