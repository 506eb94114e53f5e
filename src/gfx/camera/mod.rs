pub mod camera_utils;
pub mod look_at_camera;
pub mod navigation;

// Re-export main types
pub use look_at_camera::{Camera, CameraPose};
pub use navigation::{NavKey, NavigationController, ViewerKey};
