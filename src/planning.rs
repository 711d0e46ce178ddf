//! Bounds computation and layer-index planning.

use crate::error::SliceError;
use crate::geometry::MeshView;

/// The fixed set of layer planes a job slices against: `layer_count` planes
/// at `z(k) = zmin + k * dz`, covering every input mesh's vertical extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlan {
    pub zmin: f64,
    pub zmax: f64,
    pub dz: f64,
    pub layer_count: usize,
}

impl LayerPlan {
    /// Computes the plan for a set of meshes sliced at thickness `dz`.
    ///
    /// `dz` must be strictly positive and every mesh must carry at least one
    /// vertex; both violations are reported as `InvalidInput` rather than
    /// panicking, since they originate from caller-supplied data.
    pub fn compute(meshes: &[MeshView], dz: f64) -> Result<Self, SliceError> {
        if !(dz > 0.0) {
            return Err(SliceError::InvalidInput {
                message: format!("slice thickness must be positive, got {dz}"),
            });
        }
        if meshes.is_empty() {
            return Err(SliceError::InvalidInput {
                message: "no input meshes".into(),
            });
        }
        if let Some(empty_index) = meshes.iter().position(|m| m.vertices().is_empty()) {
            return Err(SliceError::InvalidInput {
                message: format!("input mesh at index {empty_index} has no vertices"),
            });
        }

        let mut zmin = f64::INFINITY;
        let mut zmax = f64::NEG_INFINITY;

        for mesh in meshes {
            for vertex in mesh.vertices() {
                let z = vertex.z as f64;
                zmin = zmin.min(z);
                zmax = zmax.max(z);
            }
        }

        let layer_count = ((zmax - zmin) / dz).floor() as usize + 1;

        Ok(Self {
            zmin,
            zmax,
            dz,
            layer_count,
        })
    }

    /// The z-height of layer plane `k`.
    pub fn z(&self, k: usize) -> f64 {
        self.zmin + k as f64 * self.dz
    }
}
