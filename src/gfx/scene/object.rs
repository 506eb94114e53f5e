use cgmath::Matrix4;

use crate::gfx::{
    geometry::GeometryData,
    rendering::{
        context::{MeshHandle, PrimitiveKind, RenderContext},
        RenderError,
    },
    resources::MaterialRef,
};

/// Something that uploads its buffers once and can then be drawn.
pub trait Drawable {
    fn init(&mut self, ctx: &mut dyn RenderContext);

    /// Draws with whatever program, uniforms and state are current.
    /// Drawing before `init` does nothing.
    fn draw(&self, ctx: &mut dyn RenderContext, kind: PrimitiveKind) -> Result<(), RenderError>;
}

/// Triangle mesh owned on the CPU until `init` uploads it.
pub struct Mesh {
    label: String,
    geometry: GeometryData,
    handle: Option<MeshHandle>,
}

impl Mesh {
    pub fn new(label: impl Into<String>, geometry: GeometryData) -> Self {
        Self {
            label: label.into(),
            geometry,
            handle: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    /// Buffers created by `init`, if it has run.
    pub fn handle(&self) -> Option<MeshHandle> {
        self.handle
    }
}

impl Drawable for Mesh {
    fn init(&mut self, ctx: &mut dyn RenderContext) {
        if self.handle.is_some() {
            return;
        }
        let (vertices, indices) = self.geometry.to_scene_format();
        let handle = ctx.create_mesh(&self.label, &vertices, &indices);
        log::debug!(
            "uploaded mesh '{}' ({} vertices, {} triangles)",
            self.label,
            handle.vertex_count,
            handle.index_count / 3
        );
        self.handle = Some(handle);
    }

    fn draw(&self, ctx: &mut dyn RenderContext, kind: PrimitiveKind) -> Result<(), RenderError> {
        match self.handle {
            Some(handle) => ctx.draw(handle, kind),
            None => Ok(()),
        }
    }
}

/// One entry of the fixed scene list.
pub struct SceneObject {
    pub name: &'static str,
    pub drawable: Box<dyn Drawable>,
    pub local_transform: Matrix4<f32>,
    pub material: MaterialRef,
}

impl SceneObject {
    pub fn new(
        name: &'static str,
        drawable: impl Drawable + 'static,
        local_transform: Matrix4<f32>,
        material: MaterialRef,
    ) -> Self {
        Self {
            name,
            drawable: Box::new(drawable),
            local_transform,
            material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{geometry::generate_cube, rendering::context::RecordingContext};

    #[test]
    fn test_draw_before_init_is_a_no_op() {
        let mesh = Mesh::new("cube", generate_cube());
        let mut ctx = RecordingContext::new();
        mesh.draw(&mut ctx, PrimitiveKind::Triangles).unwrap();
        assert!(ctx.draws.is_empty());
    }

    #[test]
    fn test_init_uploads_once() {
        let mut mesh = Mesh::new("cube", generate_cube());
        let mut ctx = RecordingContext::new();
        mesh.init(&mut ctx);
        mesh.init(&mut ctx);
        assert_eq!(ctx.mesh_count(), 1);

        mesh.draw(&mut ctx, PrimitiveKind::Triangles).unwrap();
        assert_eq!(ctx.draws.len(), 1);
        assert_eq!(Some(ctx.draws[0].mesh), mesh.handle());
    }
}
