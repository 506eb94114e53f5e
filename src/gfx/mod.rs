//! # Graphics Module
//!
//! Everything between the viewer state and the GPU.
//!
//! - **Camera** ([`camera`]) - look-at camera and keyboard/mouse navigation
//! - **Transform stack** ([`transform_stack`]) - save/restore of the model-view matrix
//! - **Lighting** ([`lighting`]) - up to eight point, directional or spot lights
//! - **Programs** ([`program`]) - named uniform slots in the shaders' layout
//! - **Rendering** ([`rendering`]) - per-tick frame walk and the wgpu backend
//! - **Scene** ([`scene`]) - the fixed object list and OBJ loading
//!
//! A frame is produced by [`FrameRenderer::tick`](rendering::FrameRenderer::tick)
//! against any [`RenderContext`](rendering::RenderContext):
//!
//! ```no_run
//! use lightbench::gfx::rendering::{context::RecordingContext, FrameRenderer};
//! use lightbench::gfx::scene::{ModelPaths, Scene, SceneMeshes};
//! use lightbench::state::ViewerState;
//!
//! let scene = Scene::standard(SceneMeshes::load(&ModelPaths::default()));
//! let mut renderer = FrameRenderer::new(ViewerState::default(), scene);
//! let mut ctx = RecordingContext::new();
//! renderer.init(&mut ctx);
//! renderer.tick(&mut ctx).unwrap();
//! ```

pub mod camera;
pub mod geometry;
pub mod lighting;
pub mod program;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod transform_stack;

// Re-export commonly used types
pub use camera::Camera;
pub use rendering::{FrameRenderer, RenderEngine};
