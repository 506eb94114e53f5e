//! # Primitive Shape Generation
//!
//! All shapes carry outward normals and counter-clockwise winding.

use super::GeometryData;
use std::f32::consts::PI;

/// Half-extent of the platform slab in x and z.
pub const PLATFORM_HALF_SIZE: f32 = 5.0;
/// Thickness of the platform; its top face sits at y = 0.
pub const PLATFORM_THICKNESS: f32 = 0.5;

/// Appends a quad with one flat normal; `corners` go counter-clockwise as
/// seen from the side the normal points to.
fn push_quad(data: &mut GeometryData, corners: [[f32; 3]; 4], normal: [f32; 3]) {
    let base = data.vertices.len() as u32;
    data.vertices.extend_from_slice(&corners);
    data.normals.extend_from_slice(&[normal; 4]);
    data.indices
        .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
}

/// Box spanning `lo..hi` with per-face flat normals (24 vertices, 36 indices).
fn generate_box(lo: [f32; 3], hi: [f32; 3]) -> GeometryData {
    let mut data = GeometryData::new();
    let [x0, y0, z0] = lo;
    let [x1, y1, z1] = hi;

    // +z
    push_quad(&mut data, [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]], [0.0, 0.0, 1.0]);
    // -z
    push_quad(&mut data, [[x1, y0, z0], [x0, y0, z0], [x0, y1, z0], [x1, y1, z0]], [0.0, 0.0, -1.0]);
    // -x
    push_quad(&mut data, [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]], [-1.0, 0.0, 0.0]);
    // +x
    push_quad(&mut data, [[x1, y0, z1], [x1, y0, z0], [x1, y1, z0], [x1, y1, z1]], [1.0, 0.0, 0.0]);
    // +y
    push_quad(&mut data, [[x0, y1, z1], [x1, y1, z1], [x1, y1, z0], [x0, y1, z0]], [0.0, 1.0, 0.0]);
    // -y
    push_quad(&mut data, [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]], [0.0, -1.0, 0.0]);

    data
}

/// Unit cube centred at the origin, spanning -0.5..0.5 on every axis.
pub fn generate_cube() -> GeometryData {
    generate_box([-0.5; 3], [0.5; 3])
}

/// The floor slab the objects stand on: 10 x 0.5 x 10, top face at y = 0.
pub fn generate_platform() -> GeometryData {
    generate_box(
        [-PLATFORM_HALF_SIZE, -PLATFORM_THICKNESS, -PLATFORM_HALF_SIZE],
        [PLATFORM_HALF_SIZE, 0.0, PLATFORM_HALF_SIZE],
    )
}

/// UV sphere of the given radius centred at the origin.
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Torus lying in the xz plane around the y axis.
///
/// `major_radius` is the distance from the centre to the middle of the tube,
/// `tube_radius` the radius of the tube itself.
pub fn generate_torus(major_radius: f32, tube_radius: f32, rings: u32, sides: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let rings = rings.max(3);
    let sides = sides.max(3);

    for ring in 0..=rings {
        let u = ring as f32 * 2.0 * PI / rings as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for side in 0..=sides {
            let v = side as f32 * 2.0 * PI / sides as f32;
            let (sin_v, cos_v) = v.sin_cos();

            let normal = [cos_v * cos_u, sin_v, cos_v * sin_u];
            let r = major_radius + tube_radius * cos_v;
            data.vertices.push([r * cos_u, tube_radius * sin_v, r * sin_u]);
            data.normals.push(normal);
        }
    }

    for ring in 0..rings {
        for side in 0..sides {
            let a = ring * (sides + 1) + side;
            let b = a + sides + 1;

            data.indices.extend_from_slice(&[a, a + 1, b]);
            data.indices.extend_from_slice(&[b, a + 1, b + 1]);
        }
    }

    data
}
