//! # Procedural Geometry Generation
//!
//! Procedural meshes for the scene: the unit cube, the sphere used as a
//! stand-in for missing models, the torus and the platform slab.
//!
//! ## Usage
//!
//! ```rust
//! use lightbench::gfx::geometry::{generate_cube, generate_torus};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.triangle_count(), 12);
//!
//! let torus = generate_torus(0.5, 0.2, 32, 16);
//! assert!(torus.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry ready for GPU upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Triangle list, counter-clockwise seen from outside.
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format.
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v[axis]);
                hi[axis] = hi[axis].max(v[axis]);
            }
            (lo, hi)
        }))
    }

    /// Recentres on the origin and scales uniformly so the largest extent is 1.
    ///
    /// Normals are unchanged since the scale is uniform.
    pub fn fit_to_unit_box(&mut self) {
        let Some((lo, hi)) = self.bounds() else {
            return;
        };
        let center = [
            (lo[0] + hi[0]) * 0.5,
            (lo[1] + hi[1]) * 0.5,
            (lo[2] + hi[2]) * 0.5,
        ];
        let extent = (0..3).map(|a| hi[a] - lo[a]).fold(0.0f32, f32::max);
        let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };

        for v in &mut self.vertices {
            for axis in 0..3 {
                v[axis] = (v[axis] - center[axis]) * scale;
            }
        }
    }
}

/// Line-list indices for every distinct triangle edge, used for wireframe.
pub fn edge_indices(triangles: &[u32]) -> Vec<u32> {
    let mut seen = std::collections::HashSet::new();
    let mut lines = Vec::with_capacity(triangles.len() * 2);
    for tri in triangles.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if seen.insert((a.min(b), a.max(b))) {
                lines.push(a);
                lines.push(b);
            }
        }
    }
    lines
}
