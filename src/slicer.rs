//! Stage 1: intersecting every triangle against every layer plane it spans,
//! accumulating the result into one intersection graph per layer.

use rayon::prelude::*;

use crate::error::SliceError;
use crate::geometry::{edge_key, vertex_key, FiniteSet2, MeshView, Point2, Triangle};
use crate::graph::LayerGraph;
use crate::planning::LayerPlan;
use crate::progress::Progress;

/// Slices every triangle of every mesh against the plan's layer planes,
/// returning one intersection graph per layer (`layers[k]` corresponds to
/// `plan.z(k)`).
///
/// Triangles are partitioned into `rayon::current_num_threads()` chunks, each
/// sliced into an independent, layer-indexed set of graphs; the chunk results
/// are then merged sequentially. This keeps the parallel section lock-free
/// at the cost of one `Vec<LayerGraph>` of scratch space per chunk rather
/// than per triangle.
pub fn slice_meshes(
    meshes: &[MeshView],
    plan: &LayerPlan,
    progress: &dyn Progress,
) -> Result<Vec<LayerGraph>, SliceError> {
    let mut layers: Vec<LayerGraph> = (0..plan.layer_count).map(|_| LayerGraph::new()).collect();

    let total_triangles: usize = meshes.iter().map(|m| m.triangles().len()).sum();
    let mut processed = 0usize;
    progress.update(0.0);

    for mesh in meshes {
        let triangles = mesh.triangles();
        if triangles.is_empty() {
            continue;
        }

        let chunk_count = rayon::current_num_threads().max(1);
        let chunk_size = triangles.len().div_ceil(chunk_count).max(1);

        let partials: Vec<Vec<LayerGraph>> = triangles
            .par_chunks(chunk_size)
            .map(|chunk| -> Result<Vec<LayerGraph>, SliceError> {
                let mut local: Vec<LayerGraph> =
                    (0..plan.layer_count).map(|_| LayerGraph::new()).collect();
                for triangle in chunk {
                    slice_triangle(mesh, triangle, plan, &mut local)?;
                }
                Ok(local)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for partial in partials {
            for (k, layer) in partial.into_iter().enumerate() {
                layers[k].merge(layer)?;
            }
        }

        processed += triangles.len();
        progress.update(processed as f32 / total_triangles.max(1) as f32);
    }

    Ok(layers)
}

/// Intersects one triangle against every layer plane between its min and max
/// z, writing any resulting segment into `layers`.
fn slice_triangle(
    mesh: &MeshView,
    triangle: &Triangle,
    plan: &LayerPlan,
    layers: &mut [LayerGraph],
) -> Result<(), SliceError> {
    let (tri_zmin, tri_zmax) = mesh.triangle_axis_min_max(triangle, 2);
    let last = plan.layer_count as i64 - 1;
    let k_lo = (((tri_zmin - plan.zmin) / plan.dz).floor() as i64).clamp(0, last);
    let k_hi = (((tri_zmax - plan.zmin) / plan.dz).floor() as i64).clamp(0, last);

    for k in k_lo..=k_hi {
        let z = plan.z(k as usize);
        let mut sites = FiniteSet2::new();

        for e in 0..3 {
            let va = triangle[e];
            let vb = triangle[(e + 1) % 3];
            let pa = mesh.vertex(va);
            let pb = mesh.vertex(vb);
            let za = pa.z as f64;
            let zb = pb.z as f64;
            let (z_lo, z_hi) = if za <= zb { (za, zb) } else { (zb, za) };

            if z_lo == z && z == z_hi {
                // Case A: the whole edge lies in the plane; its two
                // endpoints are recorded via the other two edges instead.
                continue;
            }

            if za == z {
                sites.insert(vertex_key(va), Point2::new(pa.x as f64, pa.y as f64));
            } else if zb == z {
                sites.insert(vertex_key(vb), Point2::new(pb.x as f64, pb.y as f64));
            } else if z_lo < z && z < z_hi {
                let s = (z - z_lo) / (z_hi - z_lo);
                let (p_lo, p_hi) = if za <= zb { (pa, pb) } else { (pb, pa) };
                let x = p_lo.x as f64 + s * (p_hi.x as f64 - p_lo.x as f64);
                let y = p_lo.y as f64 + s * (p_hi.y as f64 - p_lo.y as f64);
                sites.insert(edge_key(va, vb), Point2::new(x, y));
            }
        }

        if let Some(((key_a, pos_a), (key_b, pos_b))) = sites.as_pair() {
            layers[k as usize].insert_segment(key_a, pos_a, key_b, pos_b)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::progress::NoopProgress;

    #[test]
    fn a_single_plane_through_a_cube_yields_a_single_closed_cycle() {
        let mesh = fixtures::unit_cube();
        // plan.z(1) == 0.5, squarely inside the cube.
        let plan = LayerPlan {
            zmin: 0.0,
            zmax: 1.0,
            dz: 0.5,
            layer_count: 3,
        };
        let graphs = slice_meshes(std::slice::from_ref(&mesh), &plan, &NoopProgress).unwrap();
        let mid = &graphs[1];
        // Each of the 4 walls contributes a corner site (shared with its
        // neighbor) and a diagonal-crossing site (not shared, an artifact of
        // the wall's own quad-to-triangle split): 4 + 4 = 8 distinct sites,
        // all still part of one cycle since every node has edge_count 2.
        assert_eq!(mid.len(), 8);
        for (_, data) in mid.iter() {
            assert_eq!(data.edge_count, 2);
        }
    }

    #[test]
    fn a_plane_outside_the_mesh_extent_yields_an_empty_graph() {
        let mesh = fixtures::unit_cube();
        let plan = LayerPlan {
            zmin: -5.0,
            zmax: -4.0,
            dz: 0.5,
            layer_count: 3,
        };
        let graphs = slice_meshes(std::slice::from_ref(&mesh), &plan, &NoopProgress).unwrap();
        assert!(graphs.iter().all(|g| g.is_empty()));
    }

    #[test]
    fn two_disjoint_cubes_slice_independently() {
        let mesh = fixtures::two_cubes(3.0);
        let plan = LayerPlan {
            zmin: 0.0,
            zmax: 1.0,
            dz: 0.5,
            layer_count: 3,
        };
        let graphs = slice_meshes(std::slice::from_ref(&mesh), &plan, &NoopProgress).unwrap();
        // Two separate 8-site cycles at the mid plane (see the single-cube
        // test for why each cube contributes 8, not 4): 16 distinct sites.
        assert_eq!(graphs[1].len(), 16);
    }
}
