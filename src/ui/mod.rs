//! # User Interface Module
//!
//! Dear ImGui editing panel for the viewer.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`bindings`] - named getter/setter pairs over the viewer state
//! - [`panel`] - the window that draws those bindings
//!
//! When the panel has focus, camera navigation is suspended: the
//! application asks [`UiManager::handle_input`] first and only forwards
//! events the UI did not capture.

pub mod bindings;
pub mod manager;
pub mod panel;

// Re-export main types
pub use bindings::{BindingError, BindingValue, FieldBinding, PanelBindings, Widget};
pub use manager::UiManager;
pub use panel::editing_panel;
