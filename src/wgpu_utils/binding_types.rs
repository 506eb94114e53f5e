// src/wgpu_utils/binding_types.rs
//! WGPU binding type utilities

/// Uniform buffer bound at a per-draw dynamic offset.
///
/// `min_size` is the size of one block as the shaders declare it.
pub fn dynamic_uniform(min_size: u64) -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: true,
        min_binding_size: wgpu::BufferSize::new(min_size),
    }
}
