//! OBJ loading for the bunny and cow models.

use std::path::{Path, PathBuf};

use cgmath::{InnerSpace, Vector3, Zero};

use crate::gfx::geometry::{generate_sphere, GeometryData};

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum MeshLoadError {
    #[error("failed to load OBJ file {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ file {0} contains no triangles")]
    Empty(PathBuf),
}

/// Loads every model in an OBJ file as one mesh, fitted into the unit box.
///
/// Missing normals are rebuilt by averaging the faces around each vertex.
pub fn load_obj(path: impl AsRef<Path>) -> Result<GeometryData, MeshLoadError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| MeshLoadError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = GeometryData::new();
    for model in &models {
        let mesh = &model.mesh;
        let base = data.vertices.len() as u32;

        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            smooth_normals(&positions, &mesh.indices)
        };

        data.vertices.extend(positions);
        data.normals.extend(normals);
        data.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    if data.indices.is_empty() {
        return Err(MeshLoadError::Empty(path.to_path_buf()));
    }

    data.fit_to_unit_box();
    log::info!(
        "loaded {} ({} vertices, {} triangles)",
        path.display(),
        data.vertex_count(),
        data.triangle_count()
    );
    Ok(data)
}

/// Area-weighted vertex normals from a triangle list.
pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vector3::zero(); positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vector3::from(positions[i as usize]));
        let face = (b - a).cross(c - a);
        for &i in tri {
            normals[i as usize] += face;
        }
    }

    normals
        .into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

/// Stand-in used when a model file is not configured or fails to load.
pub fn placeholder_model() -> GeometryData {
    generate_sphere(0.5, 32, 16)
}

/// Loads `path` if given, falling back to the placeholder with a warning.
pub fn load_or_placeholder(name: &str, path: Option<&Path>) -> GeometryData {
    match path {
        Some(path) => match load_obj(path) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("{name}: {err}; drawing a sphere instead");
                placeholder_model()
            }
        },
        None => {
            log::warn!("{name}: no model file configured; drawing a sphere instead");
            placeholder_model()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_obj(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("lightbench-{}-{name}.obj", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_loads_and_fits_obj_without_normals() {
        let path = write_temp_obj(
            "quad",
            "v 0 0 0\nv 4 0 0\nv 4 2 0\nv 0 2 0\nf 1 2 3 4\n",
        );
        let data = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.triangle_count(), 2);
        let (lo, hi) = data.bounds().unwrap();
        assert_eq!(lo, [-0.5, -0.25, 0.0]);
        assert_eq!(hi, [0.5, 0.25, 0.0]);
        for n in &data.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_obj("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshLoadError::Obj { .. }));
    }

    #[test]
    fn test_fallback_is_placeholder() {
        let data = load_or_placeholder("bunny", None);
        assert_eq!(data, placeholder_model());
        let data = load_or_placeholder("cow", Some(Path::new("/nope.obj")));
        assert_eq!(data, placeholder_model());
    }

    #[test]
    fn test_smooth_normals_of_isolated_vertex_default_up() {
        let normals = smooth_normals(&[[0.0; 3], [1.0, 0.0, 0.0]], &[]);
        assert_eq!(normals, vec![[0.0, 1.0, 0.0]; 2]);
    }

    #[test]
    fn test_smooth_normals_weight_faces_by_area() {
        let positions = [
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
        ];
        let normals = smooth_normals(&positions, &[0, 1, 2, 0, 3, 4]);

        assert_eq!(normals[1], [0.0, 0.0, 1.0]);
        assert_eq!(normals[3], [0.0, 1.0, 0.0]);

        // The shared vertex leans toward the larger face.
        let shared = Vector3::from(normals[0]);
        let expected = Vector3::new(0.0, 1.0, 4.0).normalize();
        assert!((shared - expected).magnitude() < 1e-6);
    }
}
