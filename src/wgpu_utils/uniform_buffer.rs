// src/wgpu_utils/uniform_buffer.rs
//! Uniform buffer holding one block per draw, bound at dynamic offsets.
//!
//! Each draw call stages a copy of the active program's uniform block. The
//! copies are written to the GPU in one go before the frame is encoded, so
//! every draw sees the values that were current when it was issued.

/// Rounds `value` up to a multiple of `alignment`.
pub fn align_to(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

/// CPU side of a per-draw uniform buffer: blocks packed at a fixed stride.
#[derive(Debug, Clone)]
pub struct UniformStaging {
    block_size: u64,
    stride: u64,
    bytes: Vec<u8>,
}

impl UniformStaging {
    /// `alignment` is the device's `min_uniform_buffer_offset_alignment`.
    pub fn new(block_size: u64, alignment: u64) -> Self {
        Self {
            block_size,
            stride: align_to(block_size, alignment.max(1)),
            bytes: Vec::new(),
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Appends a block and returns its dynamic offset.
    ///
    /// Blocks shorter than `block_size` are zero-padded.
    pub fn push(&mut self, block: &[u8]) -> u32 {
        debug_assert!(block.len() as u64 <= self.block_size);
        let offset = self.bytes.len() as u64;
        self.bytes.extend_from_slice(block);
        self.bytes.resize((offset + self.stride) as usize, 0);
        offset as u32
    }

    pub fn len(&self) -> usize {
        (self.bytes.len() as u64 / self.stride) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

/// GPU buffer that grows to fit the staged blocks.
pub struct DynamicUniformBuffer {
    buffer: wgpu::Buffer,
    staging: UniformStaging,
    label: String,
}

impl DynamicUniformBuffer {
    pub fn new(device: &wgpu::Device, label: &str, block_size: u64, initial_blocks: u64) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let staging = UniformStaging::new(block_size, alignment);
        let buffer = Self::create_buffer(device, label, staging.stride() * initial_blocks.max(1));

        Self {
            buffer,
            staging,
            label: label.to_string(),
        }
    }

    fn create_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn staging_mut(&mut self) -> &mut UniformStaging {
        &mut self.staging
    }

    /// Writes the staged blocks to the GPU.
    ///
    /// Returns `true` when the buffer had to be reallocated, in which case
    /// bind groups referencing it must be rebuilt.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        let needed = self.staging.bytes().len() as u64;
        let mut grew = false;
        if needed > self.buffer.size() {
            let size = needed.next_power_of_two().max(self.staging.stride());
            log::debug!("growing uniform buffer '{}' to {} bytes", self.label, size);
            self.buffer = Self::create_buffer(device, &self.label, size);
            grew = true;
        }
        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, self.staging.bytes());
        }
        grew
    }

    /// Binding covering a single block; the dynamic offset selects which.
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(self.staging.block_size()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(1008, 256), 1024);
        assert_eq!(align_to(1024, 256), 1024);
        assert_eq!(align_to(1, 64), 64);
    }

    #[test]
    fn test_blocks_land_at_stride_offsets() {
        let mut staging = UniformStaging::new(1008, 256);
        assert_eq!(staging.stride(), 1024);

        let first = vec![1u8; 1008];
        let second = vec![2u8; 1008];
        assert_eq!(staging.push(&first), 0);
        assert_eq!(staging.push(&second), 1024);
        assert_eq!(staging.len(), 2);
        assert_eq!(staging.bytes().len(), 2048);

        assert!(staging.bytes()[..1008].iter().all(|&b| b == 1));
        assert!(staging.bytes()[1008..1024].iter().all(|&b| b == 0));
        assert!(staging.bytes()[1024..2032].iter().all(|&b| b == 2));

        staging.clear();
        assert!(staging.is_empty());
    }
}
