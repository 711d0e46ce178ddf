// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

//! Wavefront OBJ mesh loading.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::error::SliceError;
use crate::geometry::{MeshView, Triangle, Vertex3};

/// The result of a successful load: the parsed mesh plus a count of
/// unrecognized directives that were skipped rather than rejected.
pub struct LoadedMesh {
    pub mesh: MeshView,
    pub warnings: u32,
}

/// Parses a Wavefront OBJ file into a triangle mesh.
///
/// Recognized directives: `v` (vertex position), `f` (triangle or quad
/// face, 1-based indices, quads split into two triangles sharing a
/// diagonal). `vt`, `vn`, `g` and `#` are recognized and ignored. `vp`
/// (parameter-space vertices) and `l` (polylines) describe geometry this
/// crate cannot slice and are rejected as `UnsupportedGeometry`. Any other
/// directive is skipped with a logged warning, not an error, since Wavefront
/// OBJ is an open-ended format and most unrecognized directives (materials,
/// smoothing groups, ...) don't affect the triangle soup itself.
///
/// After parsing, a cheap edge-occurrence tally over the flat triangle list
/// checks for non-manifold edges (an edge shared by more than two
/// triangles) without building a full half-edge structure.
pub fn load_obj(path: &Path) -> Result<LoadedMesh, SliceError> {
    let content = fs::read_to_string(path).map_err(|source| SliceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut vertices: Vec<Vertex3> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();
    let mut warnings = 0u32;

    for (lineno, raw_line) in content.lines().enumerate() {
        let line_number = lineno + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let directive = match tokens.next() {
            Some(d) => d,
            None => continue,
        };

        match directive {
            "#" => continue,
            "v" => {
                let coords = parse_floats(tokens, path, line_number)?;
                if coords.len() < 3 {
                    return Err(SliceError::Parse {
                        path: path.to_path_buf(),
                        line: line_number,
                    });
                }
                vertices.push(Vertex3::new(coords[0], coords[1], coords[2]));
            }
            "f" => {
                let indices: Vec<u32> = tokens
                    .map(parse_face_index)
                    .collect::<Option<_>>()
                    .ok_or(SliceError::Parse {
                        path: path.to_path_buf(),
                        line: line_number,
                    })?;

                match indices.len() {
                    3 => triangles.push(to_zero_based(
                        &indices,
                        vertices.len(),
                        path,
                        line_number,
                    )?),
                    4 => {
                        let tri = to_zero_based(&indices, vertices.len(), path, line_number)?;
                        triangles.push([tri[0], tri[1], tri[2]]);
                        triangles.push([tri[0], tri[2], tri[3]]);
                    }
                    _ => {
                        return Err(SliceError::Parse {
                            path: path.to_path_buf(),
                            line: line_number,
                        })
                    }
                }
            }
            "vt" | "vn" | "g" => continue,
            "vp" | "l" => {
                return Err(SliceError::UnsupportedGeometry {
                    path: path.to_path_buf(),
                    line: line_number,
                    directive: directive.to_string(),
                })
            }
            other => {
                warn!(
                    "{}:{}: skipping unrecognized OBJ directive {:?}",
                    path.display(),
                    line_number,
                    other
                );
                warnings += 1;
            }
        }
    }

    check_manifold(&triangles)?;

    Ok(LoadedMesh {
        mesh: MeshView::new(vertices, triangles),
        warnings,
    })
}

fn parse_floats<'a>(
    tokens: impl Iterator<Item = &'a str>,
    path: &Path,
    line: usize,
) -> Result<Vec<f32>, SliceError> {
    tokens
        .map(|t| t.parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| SliceError::Parse {
            path: path.to_path_buf(),
            line,
        })
}

/// Parses one `f` directive's index token, which may be a bare index or a
/// `v/vt`, `v/vt/vn` or `v//vn` group; only the vertex index is needed.
fn parse_face_index(token: &str) -> Option<u32> {
    let vertex_part = token.split('/').next()?;
    vertex_part.parse::<i64>().ok().and_then(|v| {
        if v > 0 {
            Some(v as u32)
        } else {
            None
        }
    })
}

/// Converts a face directive's 1-based indices to 0-based, rejecting index 0
/// (not a valid 1-based reference) and any index past the vertices parsed so
/// far (a reference to a vertex that doesn't exist yet, or at all), both as
/// `ParseError` rather than letting them reach `MeshView::vertex` as an
/// out-of-bounds slice index.
fn to_zero_based(
    indices: &[u32],
    vertex_count: usize,
    path: &Path,
    line: usize,
) -> Result<[u32; 4], SliceError> {
    let mut out = [0u32; 4];
    for (i, &idx) in indices.iter().enumerate() {
        if idx == 0 || idx as usize > vertex_count {
            return Err(SliceError::Parse {
                path: path.to_path_buf(),
                line,
            });
        }
        out[i] = idx - 1;
    }
    Ok(out)
}

/// Tallies edge occurrences across the flat triangle list and reports the
/// first edge shared by more than two triangles as non-manifold.
fn check_manifold(triangles: &[Triangle]) -> Result<(), SliceError> {
    let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
    for triangle in triangles {
        for e in 0..3 {
            let a = triangle[e];
            let b = triangle[(e + 1) % 3];
            let key = if a < b { (a, b) } else { (b, a) };
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    if let Some((&(a, b), _)) = counts.iter().find(|(_, &count)| count > 2) {
        return Err(SliceError::NonManifold { a, b });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_obj(contents: &str) -> NamedTempFile {
        use std::io::Write;
        let mut file = NamedTempFile::with_suffix(".obj").unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn parses_a_single_triangle() {
        let file = write_obj(
            "# a comment\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f 1 2 3\n",
        );
        let loaded = load_obj(file.path()).unwrap();
        assert_eq!(loaded.mesh.vertices().len(), 3);
        assert_eq!(loaded.mesh.triangles().len(), 1);
        assert_eq!(loaded.mesh.triangles()[0], [0, 1, 2]);
        assert_eq!(loaded.warnings, 0);
    }

    #[test]
    fn splits_a_quad_face_into_two_triangles() {
        let file = write_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             f 1 2 3 4\n",
        );
        let loaded = load_obj(file.path()).unwrap();
        assert_eq!(loaded.mesh.triangles().len(), 2);
        assert_eq!(loaded.mesh.triangles()[0], [0, 1, 2]);
        assert_eq!(loaded.mesh.triangles()[1], [0, 2, 3]);
    }

    #[test]
    fn ignores_vt_vn_and_g_directives() {
        let file = write_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vt 0 0\n\
             vn 0 0 1\n\
             g mygroup\n\
             f 1 2 3\n",
        );
        let loaded = load_obj(file.path()).unwrap();
        assert_eq!(loaded.mesh.triangles().len(), 1);
        assert_eq!(loaded.warnings, 0);
    }

    #[test]
    fn rejects_parameter_space_vertices() {
        let file = write_obj("vp 0.5 0.5\n");
        let err = load_obj(file.path()).unwrap_err();
        assert!(matches!(err, SliceError::UnsupportedGeometry { .. }));
    }

    #[test]
    fn rejects_polylines() {
        let file = write_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             l 1 2\n",
        );
        let err = load_obj(file.path()).unwrap_err();
        assert!(matches!(err, SliceError::UnsupportedGeometry { .. }));
    }

    #[test]
    fn an_unknown_directive_is_skipped_with_a_warning_count() {
        let file = write_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             usemtl something\n\
             f 1 2 3\n",
        );
        let loaded = load_obj(file.path()).unwrap();
        assert_eq!(loaded.warnings, 1);
        assert_eq!(loaded.mesh.triangles().len(), 1);
    }

    #[test]
    fn a_malformed_vertex_line_is_a_parse_error() {
        let file = write_obj("v not a number 0\n");
        let err = load_obj(file.path()).unwrap_err();
        assert!(matches!(err, SliceError::Parse { line: 1, .. }));
    }

    #[test]
    fn a_face_referencing_a_vertex_past_the_end_is_a_parse_error() {
        let file = write_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             f 1 2 99\n",
        );
        let err = load_obj(file.path()).unwrap_err();
        assert!(matches!(err, SliceError::Parse { line: 3, .. }));
    }

    #[test]
    fn an_edge_shared_by_three_triangles_is_non_manifold() {
        let file = write_obj(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             v 0 -1 0\n\
             v -1 0 0\n\
             f 1 2 3\n\
             f 1 2 4\n\
             f 1 2 5\n",
        );
        // Edge (1,2) (0-based (0,1)) is shared by all three faces.
        let err = load_obj(file.path()).unwrap_err();
        assert!(matches!(err, SliceError::NonManifold { .. }));
    }

    #[test]
    fn a_missing_file_is_an_io_error() {
        let err = load_obj(Path::new("/nonexistent/path/does-not-exist.obj")).unwrap_err();
        assert!(matches!(err, SliceError::Io { .. }));
    }
}
