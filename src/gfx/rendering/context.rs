//! The drawing surface handed to drawables and the frame renderer.
//!
//! [`RenderContext`] mirrors the handful of GL calls the viewer relies on:
//! clear, program selection, fixed-function state, uniform writes and indexed
//! draws. [`RecordingContext`] implements it without a GPU and keeps every
//! draw with the uniform values it saw.

use crate::gfx::{
    geometry::edge_indices,
    program::{ShaderProgram, UniformBlock, UniformLayout},
    rendering::options::{RasterState, ShadingMode},
    scene::vertex::Vertex3D,
};

use super::RenderError;

/// How a mesh's indices are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveKind {
    #[default]
    Triangles,
    /// Each triangle edge once, as a line list.
    Lines,
}

/// Uploaded mesh: an index into the context's buffers plus element counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    pub id: usize,
    pub vertex_count: u32,
    pub index_count: u32,
    pub edge_index_count: u32,
}

impl MeshHandle {
    pub fn element_count(&self, kind: PrimitiveKind) -> u32 {
        match kind {
            PrimitiveKind::Triangles => self.index_count,
            PrimitiveKind::Lines => self.edge_index_count,
        }
    }
}

pub trait RenderContext {
    /// Uploads a triangle mesh; the edge list for [`PrimitiveKind::Lines`]
    /// is derived here.
    fn create_mesh(&mut self, label: &str, vertices: &[Vertex3D], indices: &[u32]) -> MeshHandle;

    /// Clears colour to black and depth to the far plane.
    fn clear(&mut self);

    fn set_raster_state(&mut self, state: RasterState);

    fn use_program(&mut self, mode: ShadingMode);

    /// Uniform slots of the program selected by [`RenderContext::use_program`].
    fn program(&mut self) -> &mut dyn ShaderProgram;

    /// Issues an indexed draw with the current program, uniforms and state.
    fn draw(&mut self, mesh: MeshHandle, kind: PrimitiveKind) -> Result<(), RenderError>;
}

/// The Phong and Gouraud uniform blocks and which one is active.
#[derive(Debug, Clone)]
pub struct ProgramSet {
    phong: UniformBlock,
    gouraud: UniformBlock,
    active: ShadingMode,
}

impl Default for ProgramSet {
    fn default() -> Self {
        Self::new(UniformLayout::standard(), UniformLayout::standard())
    }
}

impl ProgramSet {
    pub fn new(phong: UniformLayout, gouraud: UniformLayout) -> Self {
        Self {
            phong: UniformBlock::new(phong),
            gouraud: UniformBlock::new(gouraud),
            active: ShadingMode::Phong,
        }
    }

    pub fn select(&mut self, mode: ShadingMode) {
        self.active = mode;
    }

    pub fn active_mode(&self) -> ShadingMode {
        self.active
    }

    pub fn active(&self) -> &UniformBlock {
        self.get(self.active)
    }

    pub fn active_mut(&mut self) -> &mut UniformBlock {
        match self.active {
            ShadingMode::Phong => &mut self.phong,
            ShadingMode::Gouraud => &mut self.gouraud,
        }
    }

    pub fn get(&self, mode: ShadingMode) -> &UniformBlock {
        match mode {
            ShadingMode::Phong => &self.phong,
            ShadingMode::Gouraud => &self.gouraud,
        }
    }
}

/// Index lists for both primitive kinds, built once at upload.
pub fn mesh_indices(indices: &[u32]) -> (Vec<u32>, Vec<u32>) {
    (indices.to_vec(), edge_indices(indices))
}

/// One draw as the recording context saw it.
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub mesh: MeshHandle,
    pub kind: PrimitiveKind,
    pub mode: ShadingMode,
    pub raster: RasterState,
    pub uniforms: UniformBlock,
}

/// GPU-free [`RenderContext`] that records what would have been drawn.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    programs: ProgramSet,
    raster: RasterState,
    meshes: Vec<String>,
    pub clears: usize,
    pub draws: Vec<RecordedDraw>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose two programs expose the given slot tables.
    pub fn with_layouts(phong: UniformLayout, gouraud: UniformLayout) -> Self {
        Self {
            programs: ProgramSet::new(phong, gouraud),
            ..Self::default()
        }
    }

    pub fn mesh_label(&self, mesh: MeshHandle) -> Option<&str> {
        self.meshes.get(mesh.id).map(String::as_str)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn programs(&self) -> &ProgramSet {
        &self.programs
    }

    /// Forgets recorded draws and clears, keeping meshes and uniforms.
    pub fn reset_frame(&mut self) {
        self.clears = 0;
        self.draws.clear();
    }
}

impl RenderContext for RecordingContext {
    fn create_mesh(&mut self, label: &str, vertices: &[Vertex3D], indices: &[u32]) -> MeshHandle {
        let (triangles, edges) = mesh_indices(indices);
        self.meshes.push(label.to_string());
        MeshHandle {
            id: self.meshes.len() - 1,
            vertex_count: vertices.len() as u32,
            index_count: triangles.len() as u32,
            edge_index_count: edges.len() as u32,
        }
    }

    fn clear(&mut self) {
        self.clears += 1;
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
        self.draws.push(RecordedDraw {
            mesh,
            kind,
            mode: self.programs.active_mode(),
            raster: self.raster,
            uniforms: self.programs.active().clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{geometry::generate_cube, program::UniformValue};

    #[test]
    fn test_draw_snapshots_uniforms() {
        let mut ctx = RecordingContext::new();
        let (vertices, indices) = generate_cube().to_scene_format();
        let cube = ctx.create_mesh("cube", &vertices, &indices);

        ctx.program().set_named("u_n_lights", UniformValue::Int(1)).unwrap();
        ctx.draw(cube, PrimitiveKind::Triangles).unwrap();
        ctx.program().set_named("u_n_lights", UniformValue::Int(2)).unwrap();
        ctx.draw(cube, PrimitiveKind::Lines).unwrap();

        assert_eq!(ctx.draws[0].uniforms.read("u_n_lights"), Some(UniformValue::Int(1)));
        assert_eq!(ctx.draws[1].uniforms.read("u_n_lights"), Some(UniformValue::Int(2)));
        assert_eq!(ctx.mesh_label(cube), Some("cube"));
    }

    #[test]
    fn test_programs_keep_separate_uniforms() {
        let mut ctx = RecordingContext::new();
        ctx.use_program(ShadingMode::Gouraud);
        ctx.program().set_named("u_n_lights", UniformValue::Int(5)).unwrap();
        ctx.use_program(ShadingMode::Phong);

        assert_eq!(
            ctx.programs().get(ShadingMode::Gouraud).read("u_n_lights"),
            Some(UniformValue::Int(5))
        );
        assert_eq!(
            ctx.programs().get(ShadingMode::Phong).read("u_n_lights"),
            Some(UniformValue::Int(0))
        );
    }

    #[test]
    fn test_mesh_handle_counts() {
        let mut ctx = RecordingContext::new();
        let (vertices, indices) = generate_cube().to_scene_format();
        let cube = ctx.create_mesh("cube", &vertices, &indices);
        assert_eq!(cube.vertex_count, 24);
        assert_eq!(cube.element_count(PrimitiveKind::Triangles), 36);
        // 6 faces x (4 sides + 1 diagonal)
        assert_eq!(cube.element_count(PrimitiveKind::Lines), 60);
    }

    #[test]
    fn test_unknown_mesh_is_an_error() {
        let mut ctx = RecordingContext::new();
        let bogus = MeshHandle {
            id: 3,
            vertex_count: 0,
            index_count: 0,
            edge_index_count: 0,
        };
        assert!(matches!(
            ctx.draw(bogus, PrimitiveKind::Triangles),
            Err(RenderError::UnknownMesh(3))
        ));
    }
}
