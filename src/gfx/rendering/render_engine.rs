//! wgpu implementation of [`RenderContext`].
//!
//! Draw calls are recorded during a tick together with a copy of the active
//! program's uniform block, then replayed in a single render pass by
//! [`RenderEngine::present`].

use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        program::{ShaderProgram, UniformLayout},
        resources::TextureResource,
        scene::vertex::Vertex3D,
    },
    wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc, DynamicUniformBuffer},
};

use super::{
    context::{mesh_indices, MeshHandle, PrimitiveKind, ProgramSet, RenderContext},
    options::{RasterState, ShadingMode},
    pipeline_manager::{PipelineKey, PipelineManager},
    RenderError,
};

const PHONG_SHADER: &str = include_str!("phong.wgsl");
const GOURAUD_SHADER: &str = include_str!("gouraud.wgsl");

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    edge_buffer: wgpu::Buffer,
}

struct QueuedDraw {
    key: PipelineKey,
    mesh: usize,
    count: u32,
    offset: u32,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: wgpu::TextureFormat,
    pub pipeline_manager: PipelineManager,

    uniform_layout: BindGroupLayoutWithDesc,
    uniforms: DynamicUniformBuffer,
    uniform_bind_group: wgpu::BindGroup,

    programs: ProgramSet,
    raster: RasterState,
    meshes: Vec<GpuMesh>,
    draws: Vec<QueuedDraw>,
    clear_requested: bool,
}

impl RenderEngine {
    /// Creates a render engine for the given window.
    ///
    /// Both shading programs are compiled here; pipelines are created on
    /// first use.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;
        log::info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create a device")?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let layout = UniformLayout::standard();
        let block_size = layout.size() as u64;
        let uniform_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::dynamic_uniform(block_size))
            .create(&device, "Uniforms Layout");
        let uniforms = DynamicUniformBuffer::new(&device, "Per-Draw Uniforms", block_size, 16);
        let uniform_bind_group = BindGroupBuilder::new(&uniform_layout)
            .resource(uniforms.binding_resource())
            .create(&device, "Per-Draw Uniforms");

        let mut pipeline_manager = PipelineManager::new(
            device.clone(),
            format,
            TextureResource::DEPTH_FORMAT,
            uniform_layout.layout.clone(),
        );
        pipeline_manager.load_shader(ShadingMode::Phong, PHONG_SHADER);
        pipeline_manager.load_shader(ShadingMode::Gouraud, GOURAUD_SHADER);

        log::info!("render engine ready ({width}x{height}, {format:?})");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            uniform_layout,
            uniforms,
            uniform_bind_group,
            programs: ProgramSet::new(layout.clone(), layout),
            raster: RasterState::default(),
            meshes: Vec::new(),
            draws: Vec::new(),
            clear_requested: false,
        })
    }

    /// Submits the draws recorded since the last call, then the overlay.
    ///
    /// A lost or outdated surface is reconfigured and the frame dropped, as
    /// is a timed-out one.
    pub fn present<F>(&mut self, overlay: F) -> Result<(), RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated; reconfiguring and skipping the frame");
                self.surface.configure(&self.device, &self.config);
                self.discard_frame();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring the next frame; skipping it");
                self.discard_frame();
                return Ok(());
            }
            Err(err) => {
                self.discard_frame();
                return Err(err.into());
            }
        };

        let ensured = self
            .draws
            .iter()
            .try_for_each(|draw| self.pipeline_manager.ensure(draw.key));
        if let Err(err) = ensured {
            self.discard_frame();
            return Err(err.into());
        }
        if self.uniforms.upload(&self.device, &self.queue) {
            self.uniform_bind_group = BindGroupBuilder::new(&self.uniform_layout)
                .resource(self.uniforms.binding_resource())
                .create(&self.device, "Per-Draw Uniforms");
        }

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (color_load, depth_load) = if self.clear_requested {
                (wgpu::LoadOp::Clear(wgpu::Color::BLACK), wgpu::LoadOp::Clear(1.0))
            } else {
                (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for draw in &self.draws {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(&draw.key) else {
                    continue;
                };
                let mesh = &self.meshes[draw.mesh];
                let indices = match draw.key.kind {
                    PrimitiveKind::Triangles => &mesh.index_buffer,
                    PrimitiveKind::Lines => &mesh.edge_buffer,
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[draw.offset]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..draw.count, 0, 0..1);
            }
        }

        overlay(&self.device, &self.queue, &mut encoder, &surface_texture_view);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        log::trace!("presented {} draws", self.draws.len());
        self.discard_frame();
        Ok(())
    }

    fn discard_frame(&mut self) {
        self.draws.clear();
        self.uniforms.staging_mut().clear();
        self.clear_requested = false;
    }

    /// Resizes the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

impl RenderContext for RenderEngine {
    fn create_mesh(&mut self, label: &str, vertices: &[Vertex3D], indices: &[u32]) -> MeshHandle {
        let (triangles, edges) = mesh_indices(indices);
        let buffer = |suffix: &str, contents: &[u8], usage: wgpu::BufferUsages| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} {suffix}")),
                contents,
                usage,
            })
        };

        let mesh = GpuMesh {
            vertex_buffer: buffer("Vertex Buffer", bytemuck::cast_slice(vertices), wgpu::BufferUsages::VERTEX),
            index_buffer: buffer("Index Buffer", bytemuck::cast_slice(&triangles), wgpu::BufferUsages::INDEX),
            edge_buffer: buffer("Edge Buffer", bytemuck::cast_slice(&edges), wgpu::BufferUsages::INDEX),
        };
        self.meshes.push(mesh);

        MeshHandle {
            id: self.meshes.len() - 1,
            vertex_count: vertices.len() as u32,
            index_count: triangles.len() as u32,
            edge_index_count: edges.len() as u32,
        }
    }

    fn clear(&mut self) {
        self.clear_requested = true;
    }

    fn set_raster_state(&mut self, state: RasterState) {
        self.raster = state;
    }

    fn use_program(&mut self, mode: ShadingMode) {
        self.programs.select(mode);
    }

    fn program(&mut self) -> &mut dyn ShaderProgram {
        self.programs.active_mut()
    }

    fn draw(&mut self, mesh: MeshHandle, kind: PrimitiveKind) -> Result<(), RenderError> {
        if mesh.id >= self.meshes.len() {
            return Err(RenderError::UnknownMesh(mesh.id));
        }
        let count = mesh.element_count(kind);
        if count == 0 {
            return Ok(());
        }

        let offset = self.uniforms.staging_mut().push(self.programs.active().bytes());
        self.draws.push(QueuedDraw {
            key: PipelineKey {
                mode: self.programs.active_mode(),
                kind,
                raster: self.raster,
            },
            mesh: mesh.id,
            count,
            offset,
        });
        Ok(())
    }
}
