use std::path::PathBuf;

use cgmath::{Matrix4, Vector3};

use crate::gfx::{
    geometry::{generate_cube, generate_platform, generate_torus, GeometryData},
    rendering::context::RenderContext,
    resources::{Material, MaterialRef},
};

use super::{
    loader::load_or_placeholder,
    object::{Mesh, SceneObject},
};

pub const PLATFORM_MATERIAL: Material =
    Material::new([100.0, 80.0, 60.0], [150.0, 120.0, 90.0], [50.0, 50.0, 50.0], 10.0);
pub const CUBE_MATERIAL: Material =
    Material::new([200.0, 50.0, 50.0], [200.0, 50.0, 50.0], [200.0, 200.0, 200.0], 80.0);
pub const COW_MATERIAL: Material =
    Material::new([50.0, 200.0, 50.0], [50.0, 200.0, 50.0], [255.0, 255.0, 255.0], 100.0);
pub const TORUS_MATERIAL: Material =
    Material::new([50.0, 200.0, 50.0], [50.0, 200.0, 50.0], [255.0, 255.0, 255.0], 120.0);

/// Scale applied to every model on the platform.
const OBJECT_SCALE: f32 = 2.0;

/// OBJ files for the two models that are not generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPaths {
    pub bunny: Option<PathBuf>,
    pub cow: Option<PathBuf>,
}

/// Meshes the fixed scene is built from.
pub struct SceneMeshes {
    pub cube: GeometryData,
    pub torus: GeometryData,
    pub bunny: GeometryData,
    pub cow: GeometryData,
    pub platform: GeometryData,
}

impl SceneMeshes {
    /// Generates the procedural meshes and loads the configured models.
    pub fn load(paths: &ModelPaths) -> Self {
        Self {
            cube: generate_cube(),
            torus: generate_torus(0.5, 0.2, 48, 24),
            bunny: load_or_placeholder("bunny", paths.bunny.as_deref()),
            cow: load_or_placeholder("cow", paths.cow.as_deref()),
            platform: generate_platform(),
        }
    }
}

fn placed(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z)) * Matrix4::from_scale(OBJECT_SCALE)
}

/// Ordered list of objects drawn every frame.
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// The platform with one object per quadrant; the bunny uses the
    /// editable material.
    pub fn standard(meshes: SceneMeshes) -> Self {
        let objects = vec![
            SceneObject::new(
                "platform",
                Mesh::new("platform", meshes.platform),
                Matrix4::from_scale(1.0),
                MaterialRef::Fixed(PLATFORM_MATERIAL),
            ),
            SceneObject::new(
                "cube",
                Mesh::new("cube", meshes.cube),
                placed(-2.5, 1.003, -2.5),
                MaterialRef::Fixed(CUBE_MATERIAL),
            ),
            SceneObject::new(
                "cow",
                Mesh::new("cow", meshes.cow),
                placed(2.5, 1.003, -2.5),
                MaterialRef::Fixed(COW_MATERIAL),
            ),
            SceneObject::new(
                "torus",
                Mesh::new("torus", meshes.torus),
                placed(-2.5, 0.4, 2.5),
                MaterialRef::Fixed(TORUS_MATERIAL),
            ),
            SceneObject::new(
                "bunny",
                Mesh::new("bunny", meshes.bunny),
                placed(2.5, 0.997, 2.5),
                MaterialRef::Editable,
            ),
        ];

        Self { objects }
    }

    /// Uploads every drawable's buffers.
    pub fn init(&mut self, ctx: &mut dyn RenderContext) {
        for object in &mut self.objects {
            object.drawable.init(ctx);
        }
        log::info!("scene ready ({} objects)", self.objects.len());
    }

    pub fn object_names(&self) -> Vec<&'static str> {
        self.objects.iter().map(|o| o.name).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn test_standard_scene_order_and_materials() {
        let scene = Scene::standard(SceneMeshes::load(&ModelPaths::default()));
        assert_eq!(
            scene.object_names(),
            vec!["platform", "cube", "cow", "torus", "bunny"]
        );
        assert_eq!(scene.objects[0].local_transform, Matrix4::identity());
        assert_eq!(scene.objects[4].material, MaterialRef::Editable);
        assert_eq!(scene.objects[1].material, MaterialRef::Fixed(CUBE_MATERIAL));
    }

    #[test]
    fn test_objects_rest_on_the_platform() {
        let scene = Scene::standard(SceneMeshes::load(&ModelPaths::default()));
        // The unit cube's bottom face lands just above y = 0.
        let bottom = scene.objects[1].local_transform * Vector4::new(0.0, -0.5, 0.0, 1.0);
        assert!((bottom.y - 0.003).abs() < 1e-5);
        assert!((bottom.x + 2.5).abs() < 1e-6);
    }
}
