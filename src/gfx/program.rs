//! Named uniform slots over a CPU staging block.
//!
//! Shading programs are addressed the way a GL program is: callers look up a
//! slot by name (`"u_lights[1].position"`) and write a typed value into it.
//! The block keeps the bytes in WGSL uniform layout so the renderer can copy
//! them straight into a GPU buffer.

use std::collections::HashMap;

use cgmath::{Matrix3, Matrix4, Vector3, Vector4};

use crate::gfx::lighting::MAX_LIGHTS;

/// Error type for uniform writes.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UniformError {
    #[error("uniform at offset {offset} is {expected:?}, got a {found:?} value")]
    KindMismatch {
        offset: usize,
        expected: UniformKind,
        found: UniformKind,
    },

    #[error("uniform write at offset {offset} overruns a {size}-byte block")]
    OutOfBounds { offset: usize, size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Int,
    Float,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
}

impl UniformKind {
    /// Byte size in the uniform address space. A mat3 is three padded columns.
    pub fn size(self) -> usize {
        match self {
            UniformKind::Int | UniformKind::Float => 4,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
            UniformKind::Mat3 => 48,
            UniformKind::Mat4 => 64,
        }
    }

    pub fn align(self) -> usize {
        match self {
            UniformKind::Int | UniformKind::Float => 4,
            _ => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat3(Matrix3<f32>),
    Mat4(Matrix4<f32>),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat3(_) => UniformKind::Mat3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    fn write_to(&self, out: &mut [u8]) {
        match self {
            UniformValue::Int(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Float(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec3(v) => out.copy_from_slice(bytemuck::cast_slice(v)),
            UniformValue::Vec4(v) => out.copy_from_slice(bytemuck::cast_slice(v)),
            UniformValue::Mat3(m) => {
                let cols: [[f32; 3]; 3] = (*m).into();
                for (i, col) in cols.iter().enumerate() {
                    out[i * 16..i * 16 + 12].copy_from_slice(bytemuck::cast_slice(col));
                }
            }
            UniformValue::Mat4(m) => {
                let cols: [[f32; 4]; 4] = (*m).into();
                out.copy_from_slice(bytemuck::cast_slice(&cols));
            }
        }
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Int(v as i32)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(v: Vector3<f32>) -> Self {
        UniformValue::Vec3(v.into())
    }
}

impl From<Vector4<f32>> for UniformValue {
    fn from(v: Vector4<f32>) -> Self {
        UniformValue::Vec4(v.into())
    }
}

impl From<Matrix3<f32>> for UniformValue {
    fn from(m: Matrix3<f32>) -> Self {
        UniformValue::Mat3(m)
    }
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(m: Matrix4<f32>) -> Self {
        UniformValue::Mat4(m)
    }
}

/// Resolved slot: where a uniform lives and what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    pub offset: usize,
    pub kind: UniformKind,
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Member list of a uniform struct, laid out as WGSL would.
#[derive(Debug, Clone, Default)]
pub struct StructLayout {
    fields: Vec<(String, UniformLocation)>,
    cursor: usize,
}

impl StructLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, kind: UniformKind) -> Self {
        let offset = round_up(self.cursor, kind.align());
        self.fields.push((name.to_string(), UniformLocation { offset, kind }));
        self.cursor = offset + kind.size();
        self
    }

    /// Struct size rounded to the 16-byte uniform struct alignment.
    pub fn size(&self) -> usize {
        round_up(self.cursor, 16)
    }
}

/// Name to slot table for a whole uniform block.
#[derive(Debug, Clone, Default)]
pub struct UniformLayout {
    slots: HashMap<String, UniformLocation>,
    size: usize,
}

impl UniformLayout {
    pub fn builder() -> UniformLayoutBuilder {
        UniformLayoutBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<UniformLocation> {
        self.slots.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot table of the Phong and Gouraud programs.
    pub fn standard() -> Self {
        let material = StructLayout::new()
            .field("Ka", UniformKind::Vec3)
            .field("Kd", UniformKind::Vec3)
            .field("Ks", UniformKind::Vec3)
            .field("shininess", UniformKind::Float);

        let light = StructLayout::new()
            .field("enabled", UniformKind::Int)
            .field("type", UniformKind::Int)
            .field("aperture", UniformKind::Float)
            .field("cutoff", UniformKind::Float)
            .field("position", UniformKind::Vec4)
            .field("ambient", UniformKind::Vec3)
            .field("diffuse", UniformKind::Vec3)
            .field("specular", UniformKind::Vec3)
            .field("axis", UniformKind::Vec3);

        UniformLayout::builder()
            .field("u_projection", UniformKind::Mat4)
            .field("u_model_view", UniformKind::Mat4)
            .field("u_normals", UniformKind::Mat3)
            .structure("u_material", &material)
            .field("u_n_lights", UniformKind::Int)
            .array("u_lights", MAX_LIGHTS, &light)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct UniformLayoutBuilder {
    slots: HashMap<String, UniformLocation>,
    cursor: usize,
}

impl UniformLayoutBuilder {
    pub fn field(mut self, name: &str, kind: UniformKind) -> Self {
        let offset = round_up(self.cursor, kind.align());
        self.slots
            .insert(name.to_string(), UniformLocation { offset, kind });
        self.cursor = offset + kind.size();
        self
    }

    pub fn structure(mut self, name: &str, layout: &StructLayout) -> Self {
        let base = round_up(self.cursor, 16);
        self.insert_members(name, base, layout);
        self.cursor = base + layout.size();
        self
    }

    pub fn array(mut self, name: &str, count: usize, element: &StructLayout) -> Self {
        let base = round_up(self.cursor, 16);
        let stride = element.size();
        for i in 0..count {
            self.insert_members(&format!("{name}[{i}]"), base + i * stride, element);
        }
        self.cursor = base + count * stride;
        self
    }

    fn insert_members(&mut self, prefix: &str, base: usize, layout: &StructLayout) {
        for (member, location) in &layout.fields {
            self.slots.insert(
                format!("{prefix}.{member}"),
                UniformLocation {
                    offset: base + location.offset,
                    kind: location.kind,
                },
            );
        }
    }

    pub fn build(self) -> UniformLayout {
        UniformLayout {
            slots: self.slots,
            size: round_up(self.cursor, 16),
        }
    }
}

/// A shading program seen through its named uniform slots.
pub trait ShaderProgram {
    /// Looks up a slot. `None` means this program does not expose it.
    fn uniform_location(&self, name: &str) -> Option<UniformLocation>;

    fn set_uniform(
        &mut self,
        location: UniformLocation,
        value: UniformValue,
    ) -> Result<(), UniformError>;

    /// Writes `value` to the slot called `name` if the program has one.
    ///
    /// Returns `Ok(false)` when the slot is absent and nothing was written.
    fn set_named(&mut self, name: &str, value: UniformValue) -> Result<bool, UniformError> {
        match self.uniform_location(name) {
            Some(location) => self.set_uniform(location, value).map(|_| true),
            None => Ok(false),
        }
    }
}

/// CPU copy of a program's uniform block.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    data: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let data = vec![0; layout.size()];
        Self { layout, data }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Reads back a slot; used by tests and the recording context.
    pub fn read(&self, name: &str) -> Option<UniformValue> {
        let location = self.layout.get(name)?;
        let at = |i: usize| -> f32 {
            let start = location.offset + i * 4;
            bytemuck::pod_read_unaligned(&self.data[start..start + 4])
        };
        Some(match location.kind {
            UniformKind::Int => UniformValue::Int(bytemuck::pod_read_unaligned(
                &self.data[location.offset..location.offset + 4],
            )),
            UniformKind::Float => UniformValue::Float(at(0)),
            UniformKind::Vec3 => UniformValue::Vec3([at(0), at(1), at(2)]),
            UniformKind::Vec4 => UniformValue::Vec4([at(0), at(1), at(2), at(3)]),
            UniformKind::Mat3 => UniformValue::Mat3(Matrix3::new(
                at(0),
                at(1),
                at(2),
                at(4),
                at(5),
                at(6),
                at(8),
                at(9),
                at(10),
            )),
            UniformKind::Mat4 => {
                let mut cols = [0.0f32; 16];
                for (i, c) in cols.iter_mut().enumerate() {
                    *c = at(i);
                }
                UniformValue::Mat4(Matrix4::new(
                    cols[0], cols[1], cols[2], cols[3], cols[4], cols[5], cols[6], cols[7],
                    cols[8], cols[9], cols[10], cols[11], cols[12], cols[13], cols[14], cols[15],
                ))
            }
        })
    }
}

impl ShaderProgram for UniformBlock {
    fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.layout.get(name)
    }

    fn set_uniform(
        &mut self,
        location: UniformLocation,
        value: UniformValue,
    ) -> Result<(), UniformError> {
        if value.kind() != location.kind {
            return Err(UniformError::KindMismatch {
                offset: location.offset,
                expected: location.kind,
                found: value.kind(),
            });
        }
        let end = location.offset + location.kind.size();
        if end > self.data.len() {
            return Err(UniformError::OutOfBounds {
                offset: location.offset,
                size: self.data.len(),
            });
        }
        value.write_to(&mut self.data[location.offset..end]);
        Ok(())
    }
}
