use crate::gfx::{
    camera::Camera, lighting::LightSet, rendering::RenderOptions, resources::Material,
};

/// Everything the user can edit, owned by the frame renderer.
///
/// Navigation, the editing panel and input handling borrow it between ticks.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub camera: Camera,
    pub material: Material,
    initial_material: Material,
    pub lights: LightSet,
    pub options: RenderOptions,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(Camera::default(), Material::default(), LightSet::default(), RenderOptions::default())
    }
}

impl ViewerState {
    pub fn new(camera: Camera, material: Material, lights: LightSet, options: RenderOptions) -> Self {
        Self {
            camera,
            material,
            initial_material: material,
            lights,
            options,
        }
    }

    pub fn initial_material(&self) -> &Material {
        &self.initial_material
    }

    /// Restores the camera pose and the editable material.
    pub fn reset(&mut self) {
        self.camera.reset_to_initial();
        self.material = self.initial_material;
        log::info!("camera and material reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_reset_restores_camera_and_material_only() {
        let mut state = ViewerState::default();
        let pose = state.camera.pose();

        state.camera.eye = Vector3::new(-4.0, 1.0, 2.0);
        state.material.ka = [0.0, 10.0, 20.0];
        state.material.set_shininess(3.0);
        state.options.wireframe = true;
        state.lights.get_mut(1).unwrap().enabled = true;

        state.reset();
        assert_eq!(state.camera.pose(), pose);
        assert_eq!(&state.material, state.initial_material());
        assert!(state.options.wireframe);
        assert!(state.lights.get(1).unwrap().enabled);
    }
}
