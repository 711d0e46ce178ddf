//! Stage 2: walking each layer's intersection graph into closed polygons.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::error::SliceError;
use crate::geometry::Point2;
use crate::graph::LayerGraph;
use crate::progress::Progress;

/// A single closed contour: a sequence of points with `first == last`.
pub type Polygon = Vec<Point2>;

/// Builds the polygons for every layer, one task per layer. Layers are
/// independent once sliced, so this is embarrassingly parallel; it is the
/// only place besides the slicer where rayon is used.
pub fn build_all(
    graphs: &[LayerGraph],
    progress: &dyn Progress,
) -> Result<Vec<Vec<Polygon>>, SliceError> {
    let total = graphs.len().max(1);
    let done = AtomicUsize::new(0);
    progress.update(0.0);

    graphs
        .par_iter()
        .map(|graph| {
            let result = build_layer(graph);
            let count = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress.update(count as f32 / total as f32);
            result
        })
        .collect()
}

/// Walks a single layer's intersection graph into its closed polygons.
///
/// A well-formed layer graph decomposes entirely into disjoint simple
/// cycles: every node has exactly two incident edges. A node with a
/// different edge count is reported as `InternalInvariant` rather than
/// silently skipped or truncated, since it indicates the slicer fed in a
/// non-2-manifold crossing.
///
/// Each cycle's distinct sites are walked once and the polygon is closed by
/// repeating its first point as its last, matching the closure contract of
/// `Polygon`.
pub fn build_layer(graph: &LayerGraph) -> Result<Vec<Polygon>, SliceError> {
    let mut visited: HashSet<u64> = HashSet::new();
    let mut polygons = Vec::new();

    for (&start, start_data) in graph.iter() {
        if visited.contains(&start) {
            continue;
        }
        if start_data.edge_count != 2 {
            return Err(SliceError::InternalInvariant {
                key: start,
                edge_count: start_data.edge_count,
            });
        }

        let mut polygon = vec![start_data.position];
        let mut prev = start;
        let mut curr = start_data.edges[0];

        loop {
            let data = graph.get(&curr).ok_or(SliceError::InternalInvariant {
                key: curr,
                edge_count: 0,
            })?;
            if data.edge_count != 2 {
                return Err(SliceError::InternalInvariant {
                    key: curr,
                    edge_count: data.edge_count,
                });
            }

            polygon.push(data.position);
            visited.insert(curr);

            let next = if data.edges[0] != prev {
                data.edges[0]
            } else {
                data.edges[1]
            };
            prev = curr;
            curr = next;

            if curr == start {
                break;
            }
        }

        visited.insert(start);
        polygon.push(start_data.position);
        polygons.push(polygon);
    }

    Ok(polygons)
}
