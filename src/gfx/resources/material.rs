//! Reflectance coefficients bound to a drawable just before it is drawn.
//!
//! Coefficients stay in the 0..255 domain the editing panel works in; the
//! shading programs scale them.

use crate::gfx::program::{ShaderProgram, UniformError, UniformValue};

pub const SHININESS_MIN: f32 = 1.0;
pub const SHININESS_MAX: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ka: [f32; 3],
    pub kd: [f32; 3],
    pub ks: [f32; 3],
    pub shininess: f32,
}

impl Default for Material {
    /// The editable material the bunny starts with.
    fn default() -> Self {
        Self {
            ka: [150.0; 3],
            kd: [150.0; 3],
            ks: [200.0; 3],
            shininess: 100.0,
        }
    }
}

impl Material {
    pub const fn new(ka: [f32; 3], kd: [f32; 3], ks: [f32; 3], shininess: f32) -> Self {
        Self { ka, kd, ks, shininess }
    }

    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess.clamp(SHININESS_MIN, SHININESS_MAX);
    }

    /// Writes Ka, Kd, Ks and shininess; each slot the program lacks is skipped.
    pub fn upload(&self, program: &mut dyn ShaderProgram) -> Result<(), UniformError> {
        program.set_named("u_material.Ka", UniformValue::Vec3(self.ka))?;
        program.set_named("u_material.Kd", UniformValue::Vec3(self.kd))?;
        program.set_named("u_material.Ks", UniformValue::Vec3(self.ks))?;
        program.set_named("u_material.shininess", UniformValue::Float(self.shininess))?;
        Ok(())
    }
}

/// Which material a scene object draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialRef {
    /// The user-editable material held in the viewer state.
    Editable,
    Fixed(Material),
}

impl MaterialRef {
    pub fn resolve<'a>(&'a self, editable: &'a Material) -> &'a Material {
        match self {
            MaterialRef::Editable => editable,
            MaterialRef::Fixed(material) => material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::program::{UniformBlock, UniformKind, UniformLayout};

    #[test]
    fn test_upload_writes_all_coefficients() {
        let material = Material::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0], 42.0);
        let mut block = UniformBlock::new(UniformLayout::standard());
        material.upload(&mut block).unwrap();

        assert_eq!(block.read("u_material.Ka"), Some(UniformValue::Vec3([1.0, 2.0, 3.0])));
        assert_eq!(block.read("u_material.Kd"), Some(UniformValue::Vec3([4.0, 5.0, 6.0])));
        assert_eq!(block.read("u_material.Ks"), Some(UniformValue::Vec3([7.0, 8.0, 9.0])));
        assert_eq!(block.read("u_material.shininess"), Some(UniformValue::Float(42.0)));
    }

    #[test]
    fn test_missing_slots_are_skipped_individually() {
        let layout = UniformLayout::builder()
            .field("u_material.Kd", UniformKind::Vec3)
            .build();
        let mut block = UniformBlock::new(layout);
        Material::default().upload(&mut block).unwrap();
        assert_eq!(block.read("u_material.Kd"), Some(UniformValue::Vec3([150.0; 3])));
    }

    #[test]
    fn test_resolve_picks_editable_or_literal() {
        let editable = Material::default();
        let red = Material::new([200.0, 50.0, 50.0], [200.0, 50.0, 50.0], [200.0; 3], 80.0);
        assert_eq!(MaterialRef::Editable.resolve(&editable), &editable);
        assert_eq!(MaterialRef::Fixed(red).resolve(&editable), &red);
    }

    #[test]
    fn test_shininess_is_clamped() {
        let mut material = Material::default();
        material.set_shininess(0.0);
        assert_eq!(material.shininess, SHININESS_MIN);
        material.set_shininess(1e6);
        assert_eq!(material.shininess, SHININESS_MAX);
    }
}
