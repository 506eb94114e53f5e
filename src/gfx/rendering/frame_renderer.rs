//! Once-per-tick walk over the scene.

use crate::{
    gfx::{
        camera::{camera_utils::normal_matrix, NavKey, NavigationController, ViewerKey},
        program::UniformValue,
        scene::Scene,
        transform_stack::TransformStack,
    },
    state::ViewerState,
};

use super::{context::PrimitiveKind, RenderContext, RenderError};

/// Owns the viewer state and draws the scene from it.
///
/// Input handlers mutate the state between ticks; [`FrameRenderer::tick`]
/// reads it wholesale at the start of the next one.
pub struct FrameRenderer {
    pub state: ViewerState,
    pub navigation: NavigationController,
    scene: Scene,
    stack: TransformStack,
    frames: u64,
}

impl FrameRenderer {
    pub fn new(state: ViewerState, scene: Scene) -> Self {
        Self {
            state,
            navigation: NavigationController::default(),
            scene,
            stack: TransformStack::new(),
            frames: 0,
        }
    }

    /// Uploads the scene's meshes. Call once before the first tick.
    pub fn init(&mut self, ctx: &mut dyn RenderContext) {
        self.scene.init(ctx);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws one frame and returns the number of objects drawn.
    pub fn tick(&mut self, ctx: &mut dyn RenderContext) -> Result<usize, RenderError> {
        let Self {
            state,
            navigation,
            scene,
            stack,
            frames,
        } = self;

        navigation.apply_movement(&mut state.camera);

        ctx.clear();
        ctx.use_program(state.options.shading_mode);
        ctx.set_raster_state(state.options.raster_state());

        let view = state.camera.view();
        let projection = state.camera.projection();
        ctx.program()
            .set_named("u_projection", UniformValue::Mat4(projection))?;

        state
            .lights
            .upload(ctx.program(), &view, state.options.light_space)?;

        let kind = if state.options.wireframe {
            PrimitiveKind::Lines
        } else {
            PrimitiveKind::Triangles
        };

        stack.load(view);
        for object in &scene.objects {
            stack.scoped(|stack| -> Result<(), RenderError> {
                stack.multiply(object.local_transform);
                let model_view = stack.current();

                let program = ctx.program();
                program.set_named("u_model_view", UniformValue::Mat4(model_view))?;
                program.set_named("u_normals", UniformValue::Mat3(normal_matrix(&model_view)))?;
                object.material.resolve(&state.material).upload(program)?;

                object.drawable.draw(ctx, kind)
            })?;
        }

        *frames += 1;
        log::trace!("frame {}: {} objects", frames, scene.len());
        Ok(scene.len())
    }

    /// Applies a key press or release. Reset acts on press only.
    pub fn handle_key(&mut self, key: ViewerKey, pressed: bool) {
        match key {
            ViewerKey::Nav(nav) => self.navigation.set_key(nav, pressed),
            ViewerKey::Reset if pressed => self.state.reset(),
            ViewerKey::Reset => {}
        }
    }

    pub fn is_key_held(&self, key: NavKey) -> bool {
        self.navigation.is_held(key)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.navigation.pointer_down(x, y);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.navigation.pointer_moved(x, y, &mut self.state.camera);
    }

    pub fn pointer_up(&mut self) {
        self.navigation.pointer_up();
    }

    pub fn pointer_left(&mut self) {
        self.navigation.pointer_left();
    }

    /// New viewport size; only the aspect ratio is affected.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.camera.resize_projection(width, height);
    }
}
