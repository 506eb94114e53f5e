//! # Scene
//!
//! The fixed list of objects the viewer draws: a platform with a cube, a
//! cow, a torus and a bunny placed one per quadrant. Each entry pairs a
//! [`Drawable`] with its local transform and a material reference.
//!
//! The bunny and cow come from OBJ files ([`loader`]); when a file is
//! missing a sphere is drawn in its place.

pub mod loader;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use loader::{load_obj, load_or_placeholder, MeshLoadError};
pub use object::{Drawable, Mesh, SceneObject};
pub use scene::{ModelPaths, Scene, SceneMeshes};
pub use vertex::Vertex3D;
