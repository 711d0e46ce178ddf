//! The per-layer intersection graph: a sparse map from site key to position
//! and incident-edge list, built by the slicer and consumed by the contour
//! builder.

use std::collections::HashMap;

use crate::error::SliceError;
use crate::geometry::Point2;

/// Everything the contour walk needs to know about one intersection site.
#[derive(Debug, Clone, Copy)]
pub struct VertexData {
    pub position: Point2,
    pub edge_count: u8,
    pub edges: [u64; 2],
}

/// The intersection graph for a single layer plane. Every well-formed layer
/// decomposes into disjoint simple cycles once every node has exactly two
/// incident edges (invariant L1); this type only stores the graph, it does
/// not enforce L1 on construction — `contour::build_layer` reports a
/// violation as an error once it tries to walk a node that doesn't satisfy it.
#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    nodes: HashMap<u64, VertexData>,
}

impl LayerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, key: &u64) -> Option<&VertexData> {
        self.nodes.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u64, &VertexData)> {
        self.nodes.iter()
    }

    fn record_edge(&mut self, key: u64, position: Point2, other: u64) -> Result<(), SliceError> {
        let entry = self.nodes.entry(key).or_insert(VertexData {
            position,
            edge_count: 0,
            edges: [0, 0],
        });
        if entry.edge_count >= 2 {
            return Err(SliceError::InternalInvariant {
                key,
                edge_count: entry.edge_count + 1,
            });
        }
        entry.edges[entry.edge_count as usize] = other;
        entry.edge_count += 1;
        Ok(())
    }

    /// Records a single intersection segment between two sites, as produced
    /// by one triangle crossing one layer plane.
    pub fn insert_segment(
        &mut self,
        key_a: u64,
        pos_a: Point2,
        key_b: u64,
        pos_b: Point2,
    ) -> Result<(), SliceError> {
        self.record_edge(key_a, pos_a, key_b)?;
        self.record_edge(key_b, pos_b, key_a)?;
        Ok(())
    }

    /// Folds another layer graph's segments into this one, as produced by a
    /// different chunk of triangles contributing to the same layer.
    pub fn merge(&mut self, other: LayerGraph) -> Result<(), SliceError> {
        for (key, data) in other.nodes {
            for i in 0..data.edge_count as usize {
                self.record_edge(key, data.position, data.edges[i])?;
            }
        }
        Ok(())
    }
}
