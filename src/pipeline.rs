//! Orchestrates the full slice -> contour -> rasterize pipeline for one mesh,
//! mirroring the single entry point a caller embedding this crate as a
//! library would reach for.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::config::RasterConfig;
use crate::contour;
use crate::error::SliceError;
use crate::geometry::MeshView;
use crate::planning::LayerPlan;
use crate::progress::Progress;
use crate::raster::{self, GrayRasterSurface};
use crate::slicer;

/// The outcome of slicing and rasterizing a mesh: the layer plan used, and
/// the per-layer raster coverage fraction (written PNGs are a side effect of
/// `slice_mesh_to_images`, not part of this value).
pub struct SliceResult {
    pub plan: LayerPlan,
    pub coverage: Vec<f64>,
}

/// Runs the full pipeline for a single mesh: plans layers, slices triangles,
/// builds contours, then rasterizes and writes one PNG per layer named
/// `{output_prefix}{k}.png`.
pub fn slice_mesh_to_images(
    mesh: &MeshView,
    dz: f64,
    config: &RasterConfig,
    progress: &dyn Progress,
) -> Result<SliceResult, SliceError> {
    let meshes = std::slice::from_ref(mesh);
    let plan = LayerPlan::compute(meshes, dz)?;
    let graphs = slicer::slice_meshes(meshes, &plan, progress)?;
    let polygons = contour::build_all(&graphs, progress)?;

    let total = plan.layer_count.max(1);
    let done = AtomicUsize::new(0);
    progress.update(0.0);

    let coverage: Vec<f64> = (0..plan.layer_count)
        .into_par_iter()
        .map(|k| -> Result<f64, SliceError> {
            let mut surface = GrayRasterSurface::new(config.image_width, config.image_height);
            let value = raster::rasterize_layer(
                &mut surface,
                config.scene_width,
                config.scene_height,
                &polygons[k],
            );
            let out_path = PathBuf::from(format!("{}{k}.png", config.output_prefix));
            surface.write_png(&out_path)?;
            let count = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress.update(count as f32 / total as f32);
            Ok(value)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SliceResult { plan, coverage })
}
