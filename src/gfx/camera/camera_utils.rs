use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix};

/// Remaps OpenGL clip-space depth (-1..1) into the 0..1 range wgpu expects.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Upper-left 3x3 block of a 4x4 transform.
pub fn upper_left_3x3(matrix: &Matrix4<f32>) -> Matrix3<f32> {
    Matrix3::from_cols(
        matrix.x.truncate(),
        matrix.y.truncate(),
        matrix.z.truncate(),
    )
}

/// Inverse-transpose of the upper-left 3x3 of a model-view matrix.
///
/// Normals transformed by this matrix stay perpendicular to their surface under
/// non-uniform scaling. A singular block (zero scale on some axis) has no
/// inverse; the block itself is returned in that case.
pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = upper_left_3x3(model_view);
    match linear.invert() {
        Some(inverse) => inverse.transpose(),
        None => linear,
    }
}
