// src/gfx/resources/mod.rs
//! GPU-facing resources: materials and the depth attachment.

pub mod material;
pub mod texture_resource;

// Re-export main types
pub use material::{Material, MaterialRef};
pub use texture_resource::TextureResource;
