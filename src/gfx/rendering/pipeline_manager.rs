//! Render pipeline management
//!
//! One pipeline per combination of shading program, topology and raster
//! state, created the first time a draw asks for it.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::{
    rendering::{
        context::PrimitiveKind,
        options::{RasterState, ShadingMode},
    },
    scene::vertex::Vertex3D,
};

/// Everything that selects a distinct pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub mode: ShadingMode,
    pub kind: PrimitiveKind,
    pub raster: RasterState,
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: ShadingMode,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_write_enabled: bool,
    pub depth_compare: CompareFunction,
    pub depth_format: TextureFormat,
    pub color_format: TextureFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Phong Pipeline".to_string(),
            shader: ShadingMode::Phong,
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            depth_format: TextureFormat::Depth32Float,
            color_format: TextureFormat::Bgra8Unorm,
        }
    }
}

impl PipelineConfig {
    /// Derives the pipeline state for a key.
    ///
    /// With the depth test off the pipeline still has a depth attachment but
    /// always passes and never writes.
    ///
    /// # Arguments
    /// * `key` - Program, topology and raster state to build for
    /// * `color_format` - Format of the surface the pipeline renders to
    /// * `depth_format` - Format of the depth attachment
    pub fn for_key(key: PipelineKey, color_format: TextureFormat, depth_format: TextureFormat) -> Self {
        let (depth_write_enabled, depth_compare) = if key.raster.depth_test {
            (true, CompareFunction::Less)
        } else {
            (false, CompareFunction::Always)
        };

        Self {
            label: format!(
                "{} {:?} cull={} depth={}",
                key.mode.label(),
                key.kind,
                key.raster.backface_culling,
                key.raster.depth_test
            ),
            shader: key.mode,
            depth_format,
            color_format,
            ..Self::default()
        }
        .with_primitive_topology(match key.kind {
            PrimitiveKind::Triangles => PrimitiveTopology::TriangleList,
            PrimitiveKind::Lines => PrimitiveTopology::LineList,
        })
        .with_cull_mode(key.raster.backface_culling.then_some(Face::Back))
        .with_depth(depth_write_enabled, depth_compare)
    }

    /// Sets the face culling mode (builder pattern)
    ///
    /// # Arguments
    /// * `face` - Face to cull, or `None` to draw both sides
    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Sets primitive topology for this pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `topology` - Primitive topology (TriangleList, LineList)
    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }

    /// Sets depth writes and the depth comparison (builder pattern)
    ///
    /// # Arguments
    /// * `write_enabled` - Whether fragments write their depth
    /// * `compare` - Comparison a fragment must pass to be kept
    pub fn with_depth(mut self, write_enabled: bool, compare: CompareFunction) -> Self {
        self.depth_write_enabled = write_enabled;
        self.depth_compare = compare;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no shader loaded for the {0:?} program")]
    MissingShader(ShadingMode),
}

/// Caches pipelines by [`PipelineKey`], creating them lazily.
///
/// All pipelines share one bind group layout: the per-draw uniform block at
/// group 0, binding 0.
pub struct PipelineManager {
    device: Arc<Device>,
    color_format: TextureFormat,
    depth_format: TextureFormat,
    bind_group_layout: BindGroupLayout,
    shader_modules: HashMap<ShadingMode, ShaderModule>,
    pipelines: HashMap<PipelineKey, RenderPipeline>,
}

impl PipelineManager {
    /// Creates an empty pipeline cache
    ///
    /// # Arguments
    /// * `device` - WGPU device used to compile shaders and pipelines
    /// * `color_format` - Surface format every pipeline renders to
    /// * `depth_format` - Depth attachment format
    /// * `bind_group_layout` - Layout of the per-draw uniform block
    pub fn new(
        device: Arc<Device>,
        color_format: TextureFormat,
        depth_format: TextureFormat,
        bind_group_layout: BindGroupLayout,
    ) -> Self {
        Self {
            device,
            color_format,
            depth_format,
            bind_group_layout,
            shader_modules: HashMap::new(),
            pipelines: HashMap::new(),
        }
    }

    /// Compiles the WGSL source for a shading program.
    ///
    /// Pipelines already built from an older module for the same program
    /// are dropped and rebuilt on demand.
    ///
    /// # Arguments
    /// * `mode` - Shading program the source belongs to
    /// * `source` - WGSL source with `vs_main` and `fs_main` entry points
    pub fn load_shader(&mut self, mode: ShadingMode, source: &str) {
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(mode.label()),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(mode, module);
        self.pipelines.retain(|key, _| key.mode != mode);
    }

    /// Creates the pipeline for `key` if it does not exist yet.
    ///
    /// # Arguments
    /// * `key` - Pipeline to create
    ///
    /// # Returns
    /// `PipelineError::MissingShader` if the program's shader was never loaded
    pub fn ensure(&mut self, key: PipelineKey) -> Result<(), PipelineError> {
        if self.pipelines.contains_key(&key) {
            return Ok(());
        }

        let config = PipelineConfig::for_key(key, self.color_format, self.depth_format);
        let pipeline = self.create_pipeline_from_config(&config)?;
        log::debug!("created pipeline '{}'", config.label);
        self.pipelines.insert(key, pipeline);
        Ok(())
    }

    /// Pipeline previously created by [`PipelineManager::ensure`].
    ///
    /// # Returns
    /// The cached pipeline, or `None` if `key` was never ensured
    pub fn get_pipeline(&self, key: &PipelineKey) -> Option<&RenderPipeline> {
        self.pipelines.get(key)
    }

    /// Creates a render pipeline from configuration
    fn create_pipeline_from_config(&self, config: &PipelineConfig) -> Result<RenderPipeline, PipelineError> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or(PipelineError::MissingShader(config.shader))?;

        let pipeline_layout = self.device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", config.label)),
            bind_group_layouts: &[&self.bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: config.color_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: config.primitive_topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: config.depth_format,
                depth_write_enabled: config.depth_write_enabled,
                depth_compare: config.depth_compare,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kind: PrimitiveKind, backface_culling: bool, depth_test: bool) -> PipelineKey {
        PipelineKey {
            mode: ShadingMode::Gouraud,
            kind,
            raster: RasterState {
                backface_culling,
                depth_test,
            },
        }
    }

    #[test]
    fn test_default_state_culls_and_depth_tests() {
        let config = PipelineConfig::for_key(
            key(PrimitiveKind::Triangles, true, true),
            TextureFormat::Rgba8Unorm,
            TextureFormat::Depth32Float,
        );
        assert_eq!(config.shader, ShadingMode::Gouraud);
        assert_eq!(config.primitive_topology, PrimitiveTopology::TriangleList);
        assert_eq!(config.cull_mode, Some(Face::Back));
        assert!(config.depth_write_enabled);
        assert_eq!(config.depth_compare, CompareFunction::Less);
        assert_eq!(config.color_format, TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn test_disabled_state_maps_to_pass_through() {
        let config = PipelineConfig::for_key(
            key(PrimitiveKind::Lines, false, false),
            TextureFormat::Bgra8Unorm,
            TextureFormat::Depth32Float,
        );
        assert_eq!(config.primitive_topology, PrimitiveTopology::LineList);
        assert_eq!(config.cull_mode, None);
        assert!(!config.depth_write_enabled);
        assert_eq!(config.depth_compare, CompareFunction::Always);
    }

    #[test]
    fn test_labels_distinguish_keys() {
        let a = PipelineConfig::for_key(
            key(PrimitiveKind::Lines, false, true),
            TextureFormat::Bgra8Unorm,
            TextureFormat::Depth32Float,
        );
        let b = PipelineConfig::for_key(
            key(PrimitiveKind::Lines, true, true),
            TextureFormat::Bgra8Unorm,
            TextureFormat::Depth32Float,
        );
        assert_ne!(a.label, b.label);
    }
}
