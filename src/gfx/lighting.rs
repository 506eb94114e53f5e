//! Light descriptors and their per-frame upload.

use cgmath::{Matrix4, Vector3, Vector4};

use crate::gfx::program::{ShaderProgram, UniformError, UniformValue};

/// Number of light slots the shading programs declare.
pub const MAX_LIGHTS: usize = 8;
pub const DEFAULT_LIGHT_COUNT: usize = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("light set is full ({MAX_LIGHTS} lights)")]
pub struct LightSetFull;

/// Light type; the discriminant is the integer the shaders switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    #[default]
    Point = 0,
    Directional = 1,
    Spotlight = 2,
}

impl LightKind {
    pub const ALL: [LightKind; 3] = [LightKind::Point, LightKind::Directional, LightKind::Spotlight];

    pub fn label(self) -> &'static str {
        match self {
            LightKind::Point => "Point",
            LightKind::Directional => "Directional",
            LightKind::Spotlight => "Spotlight",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Homogeneous w for a light of this kind: directions have none.
    pub fn position_w(self) -> f32 {
        match self {
            LightKind::Directional => 0.0,
            LightKind::Point | LightKind::Spotlight => 1.0,
        }
    }
}

/// Coordinate frame the stored light positions are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LightSpace {
    /// Transformed by the view matrix before upload.
    #[default]
    World,
    /// Uploaded unchanged.
    Camera,
}

impl LightSpace {
    pub const ALL: [LightSpace; 2] = [LightSpace::World, LightSpace::Camera];

    pub fn label(self) -> &'static str {
        match self {
            LightSpace::World => "World",
            LightSpace::Camera => "Camera",
        }
    }
}

/// Intensities are 0..255 magnitudes; the shaders scale them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub enabled: bool,
    kind: LightKind,
    pub position: Vector4<f32>,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub axis: Vector3<f32>,
    pub aperture: f32,
    pub cutoff: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: LightKind::Point,
            position: Vector4::new(0.0, 5.0, 0.0, 1.0),
            ambient: [150.0; 3],
            diffuse: [255.0; 3],
            specular: [255.0; 3],
            axis: Vector3::new(0.0, -1.0, -1.0),
            aperture: 30.0,
            cutoff: 10.0,
        }
    }
}

impl Light {
    pub fn new(kind: LightKind, position: Vector3<f32>) -> Self {
        let mut light = Self {
            position: position.extend(1.0),
            ..Self::default()
        };
        light.set_kind(kind);
        light
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Changes the type and re-derives `position.w` from it.
    pub fn set_kind(&mut self, kind: LightKind) {
        self.kind = kind;
        self.position.w = kind.position_w();
    }

    pub fn set_aperture(&mut self, degrees: f32) {
        self.aperture = degrees.clamp(0.0, 180.0);
    }

    pub fn set_cutoff(&mut self, degrees: f32) {
        self.cutoff = degrees.clamp(0.0, 180.0);
    }

    /// Position with w taken from the type, ignoring the stored w.
    pub fn normalized_position(&self) -> Vector4<f32> {
        let mut position = self.position;
        position.w = self.kind.position_w();
        position
    }
}

/// Ordered, fixed-capacity collection of lights.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSet {
    lights: Vec<Light>,
}

impl Default for LightSet {
    /// Spotlight 0 enabled above and in front of the scene, point lights 1
    /// and 2 disabled on either side.
    fn default() -> Self {
        Self {
            lights: vec![
                Light::new(LightKind::Spotlight, Vector3::new(0.0, 5.0, 10.0)).with_enabled(true),
                Light::new(LightKind::Point, Vector3::new(5.0, 4.0, 6.0)),
                Light::new(LightKind::Point, Vector3::new(-5.0, 4.0, 6.0)),
            ],
        }
    }
}

impl LightSet {
    pub fn empty() -> Self {
        Self { lights: Vec::with_capacity(MAX_LIGHTS) }
    }

    pub fn push(&mut self, light: Light) -> Result<usize, LightSetFull> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(LightSetFull);
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    /// Populated slot count, independent of how many are enabled.
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.lights.iter().filter(|l| l.enabled).count()
    }

    pub fn get(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    /// Uploads the light count and every populated slot.
    ///
    /// In [`LightSpace::World`] positions and spot axes are carried into eye
    /// space by `view`. Slots the program lacks are skipped.
    pub fn upload(
        &self,
        program: &mut dyn ShaderProgram,
        view: &Matrix4<f32>,
        space: LightSpace,
    ) -> Result<(), UniformError> {
        let count = self.lights.len().min(MAX_LIGHTS);
        program.set_named("u_n_lights", UniformValue::Int(count as i32))?;

        for (i, light) in self.lights.iter().take(count).enumerate() {
            let position = light.normalized_position();
            let axis = light.axis.extend(0.0);
            let (position, axis) = match space {
                LightSpace::World => (*view * position, *view * axis),
                LightSpace::Camera => (position, axis),
            };

            let slot = |member: &str| format!("u_lights[{i}].{member}");
            program.set_named(&slot("enabled"), light.enabled.into())?;
            program.set_named(&slot("type"), UniformValue::Int(light.kind as i32))?;
            program.set_named(&slot("position"), position.into())?;
            program.set_named(&slot("ambient"), light.ambient.into())?;
            program.set_named(&slot("diffuse"), light.diffuse.into())?;
            program.set_named(&slot("specular"), light.specular.into())?;
            program.set_named(&slot("axis"), axis.truncate().into())?;
            program.set_named(&slot("aperture"), light.aperture.into())?;
            program.set_named(&slot("cutoff"), light.cutoff.into())?;
        }

        log::trace!("uploaded {count} lights ({:?} space)", space);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::program::{UniformBlock, UniformKind, UniformLayout};
    use cgmath::{Point3, SquareMatrix};

    fn view() -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::new(0.0, 3.0, 8.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        )
    }

    fn vec4_of(block: &UniformBlock, name: &str) -> [f32; 4] {
        match block.read(name) {
            Some(UniformValue::Vec4(v)) => v,
            other => panic!("{name}: {other:?}"),
        }
    }

    fn close(a: [f32; 4], b: Vector4<f32>) -> bool {
        (0..4).all(|i| (a[i] - b[i]).abs() < 1e-5)
    }

    #[test]
    fn test_default_population() {
        let lights = LightSet::default();
        assert_eq!(lights.len(), DEFAULT_LIGHT_COUNT);
        assert_eq!(lights.enabled_count(), 1);

        let first = lights.get(0).unwrap();
        assert!(first.enabled);
        assert_eq!(first.kind(), LightKind::Spotlight);
        assert_eq!(first.position, Vector4::new(0.0, 5.0, 10.0, 1.0));

        assert_eq!(lights.get(1).unwrap().kind(), LightKind::Point);
        assert!(!lights.get(2).unwrap().enabled);
    }

    #[test]
    fn test_set_kind_rederives_w() {
        let mut light = Light::default();
        for kind in [
            LightKind::Directional,
            LightKind::Spotlight,
            LightKind::Directional,
            LightKind::Point,
        ] {
            light.position.w = 0.37;
            light.set_kind(kind);
            assert_eq!(light.position.w == 0.0, kind == LightKind::Directional);
        }
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut lights = LightSet::default();
        for _ in DEFAULT_LIGHT_COUNT..MAX_LIGHTS {
            lights.push(Light::default()).unwrap();
        }
        assert_eq!(lights.push(Light::default()), Err(LightSetFull));
        assert_eq!(lights.len(), MAX_LIGHTS);
    }

    #[test]
    fn test_camera_space_uploads_stored_position() {
        let lights = LightSet::default();
        let mut block = UniformBlock::new(UniformLayout::standard());
        lights.upload(&mut block, &view(), LightSpace::Camera).unwrap();

        assert!(close(
            vec4_of(&block, "u_lights[1].position"),
            Vector4::new(5.0, 4.0, 6.0, 1.0)
        ));
    }

    #[test]
    fn test_world_space_uploads_view_transformed_position() {
        let lights = LightSet::default();
        let mut block = UniformBlock::new(UniformLayout::standard());
        lights.upload(&mut block, &view(), LightSpace::World).unwrap();

        let expected = view() * Vector4::new(0.0, 5.0, 10.0, 1.0);
        assert!(close(vec4_of(&block, "u_lights[0].position"), expected));

        let axis = view() * Vector4::new(0.0, -1.0, -1.0, 0.0);
        assert_eq!(
            block.read("u_lights[0].axis"),
            Some(UniformValue::Vec3([axis.x, axis.y, axis.z]))
        );
    }

    #[test]
    fn test_stale_w_is_overridden_on_upload() {
        let mut lights = LightSet::default();
        lights.get_mut(2).unwrap().set_kind(LightKind::Directional);
        lights.get_mut(2).unwrap().position.w = 1.0;
        lights.get_mut(1).unwrap().position.w = 0.0;

        let mut block = UniformBlock::new(UniformLayout::standard());
        lights
            .upload(&mut block, &Matrix4::identity(), LightSpace::Camera)
            .unwrap();
        assert_eq!(vec4_of(&block, "u_lights[2].position")[3], 0.0);
        assert_eq!(vec4_of(&block, "u_lights[1].position")[3], 1.0);
    }

    #[test]
    fn test_count_is_population_not_enabled() {
        let mut lights = LightSet::default();
        lights.get_mut(0).unwrap().enabled = false;
        let mut block = UniformBlock::new(UniformLayout::standard());
        lights
            .upload(&mut block, &Matrix4::identity(), LightSpace::World)
            .unwrap();
        assert_eq!(block.read("u_n_lights"), Some(UniformValue::Int(3)));
        assert_eq!(block.read("u_lights[0].enabled"), Some(UniformValue::Int(0)));
        assert_eq!(block.read("u_lights[0].type"), Some(UniformValue::Int(2)));
    }

    #[test]
    fn test_upload_tolerates_reduced_program() {
        let layout = UniformLayout::builder()
            .field("u_n_lights", UniformKind::Int)
            .build();
        let mut block = UniformBlock::new(layout);
        LightSet::default()
            .upload(&mut block, &view(), LightSpace::World)
            .unwrap();
        assert_eq!(block.read("u_n_lights"), Some(UniformValue::Int(3)));
    }
}
