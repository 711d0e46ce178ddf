//! Stage 3: painting each layer's polygons onto a raster surface using a
//! single even-odd fill across every polygon of the layer at once.
//!
//! Filling polygon-by-polygon would double-paint overlapping regions opaque
//! and could never produce a hole: the even-odd rule has to see every
//! subpath of a layer in one fill call to subtract inner contours from outer
//! ones.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::contour::Polygon;
use crate::error::SliceError;

/// A drawable target for one layer's contours. Mirrors a minimal 2D vector
/// drawing API: accumulate one or more subpaths via `move_to`/`line_to`
/// calls between a `begin_path` and a single `fill`.
pub trait RasterSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Sets every pixel to `value`.
    fn paint(&mut self, value: u8);

    /// Sets the affine transform applied to subsequent `move_to`/`line_to`
    /// coordinates: `pixel = (tx + x * sx, ty - y * sy)`.
    fn set_transform(&mut self, tx: f64, ty: f64, sx: f64, sy: f64);

    /// Discards any accumulated subpaths and starts a new path.
    fn begin_path(&mut self);

    /// Starts a new subpath at `(x, y)` (world coordinates).
    fn move_to(&mut self, x: f64, y: f64);

    /// Extends the current subpath to `(x, y)` (world coordinates).
    fn line_to(&mut self, x: f64, y: f64);

    /// Fills every subpath accumulated since the last `begin_path` using the
    /// even-odd rule, in a single pass.
    fn fill(&mut self);

    fn pixels(&self) -> &[u8];

    fn write_png(&self, path: &Path) -> Result<(), SliceError>;
}

#[derive(Debug, Clone, Copy, Default)]
struct Transform {
    tx: f64,
    ty: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.tx + x * self.sx, self.ty - y * self.sy)
    }
}

/// A `RasterSurface` backed by an 8-bit grayscale image, with 0 as
/// background and 255 as filled.
pub struct GrayRasterSurface {
    image: GrayImage,
    transform: Transform,
    subpaths: Vec<Vec<(f64, f64)>>,
    current: Vec<(f64, f64)>,
}

impl GrayRasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(width, height, Luma([0u8])),
            transform: Transform::default(),
            subpaths: Vec::new(),
            current: Vec::new(),
        }
    }

    fn flush_current(&mut self) {
        if self.current.len() > 1 {
            self.subpaths.push(std::mem::take(&mut self.current));
        } else {
            self.current.clear();
        }
    }
}

impl RasterSurface for GrayRasterSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn paint(&mut self, value: u8) {
        for pixel in self.image.pixels_mut() {
            *pixel = Luma([value]);
        }
    }

    fn set_transform(&mut self, tx: f64, ty: f64, sx: f64, sy: f64) {
        self.transform = Transform { tx, ty, sx, sy };
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
        self.current.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.flush_current();
        self.current.push(self.transform.apply(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.current.push(self.transform.apply(x, y));
    }

    fn fill(&mut self) {
        self.flush_current();
        fill_even_odd(&mut self.image, &self.subpaths);
    }

    fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    fn write_png(&self, path: &Path) -> Result<(), SliceError> {
        self.image.save(path).map_err(|err| SliceError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::Other, err),
        })
    }
}

/// Fills every subpath of `subpaths` into `image` at once, using the
/// even-odd rule: for each scanline, every subpath's edges contribute
/// x-crossings to one combined, sorted list, and alternate spans between
/// consecutive crossings are painted solid. A point covered by an odd
/// number of enclosing subpaths ends up filled; covered by an even number
/// (e.g. inside a hole cut by a second, nested subpath) ends up empty.
fn fill_even_odd(image: &mut GrayImage, subpaths: &[Vec<(f64, f64)>]) {
    let height = image.height();
    let width = image.width() as f64;

    for py in 0..height {
        let scan_y = py as f64 + 0.5;
        let mut crossings: Vec<f64> = Vec::new();

        for subpath in subpaths {
            let n = subpath.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                let (x0, y0) = subpath[i];
                let (x1, y1) = subpath[(i + 1) % n];
                if y0 == y1 {
                    continue;
                }
                let (lo_y, hi_y, lo_x, hi_x) = if y0 < y1 {
                    (y0, y1, x0, x1)
                } else {
                    (y1, y0, x1, x0)
                };
                // Half-open on the top edge so a scanline through a shared
                // vertex counts the crossing exactly once.
                if scan_y < lo_y || scan_y >= hi_y {
                    continue;
                }
                let t = (scan_y - lo_y) / (hi_y - lo_y);
                crossings.push(lo_x + t * (hi_x - lo_x));
            }
        }

        if crossings.is_empty() {
            continue;
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for pair in crossings.chunks_exact(2) {
            let x_start = pair[0].max(0.0);
            let x_end = pair[1].min(width);
            if x_end <= x_start {
                continue;
            }
            let px_start = x_start.ceil() as u32;
            let px_end = (x_end.ceil() as u32).min(image.width());
            for px in px_start..px_end {
                image.put_pixel(px, py, Luma([255u8]));
            }
        }
    }
}

/// Paints every polygon of a layer onto `surface` in a single path/fill pair
/// and returns the fraction of the image covered afterward.
pub fn rasterize_layer<S: RasterSurface>(
    surface: &mut S,
    scene_width: f64,
    scene_height: f64,
    polygons: &[Polygon],
) -> f64 {
    surface.paint(0);
    let iw = surface.width() as f64;
    let ih = surface.height() as f64;
    surface.set_transform(iw / 2.0, ih / 2.0, iw / scene_width, ih / scene_height);

    surface.begin_path();
    for polygon in polygons {
        if polygon.is_empty() {
            continue;
        }
        surface.move_to(polygon[0].x, polygon[0].y);
        for point in &polygon[1..] {
            surface.line_to(point.x, point.y);
        }
    }
    surface.fill();

    coverage_fraction(surface)
}

/// The fraction of pixels that are non-background.
pub fn coverage_fraction<S: RasterSurface>(surface: &S) -> f64 {
    let total = surface.width() as u64 * surface.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let covered = surface.pixels().iter().filter(|&&v| v != 0).count() as u64;
    covered as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;
    use approx::assert_relative_eq;

    fn square(cx: f64, cy: f64, half: f64) -> Polygon {
        vec![
            Point2::new(cx - half, cy - half),
            Point2::new(cx + half, cy - half),
            Point2::new(cx + half, cy + half),
            Point2::new(cx - half, cy + half),
            Point2::new(cx - half, cy - half),
        ]
    }

    #[test]
    fn an_empty_layer_leaves_the_image_blank() {
        let mut surface = GrayRasterSurface::new(64, 64);
        let coverage = rasterize_layer(&mut surface, 10.0, 10.0, &[]);
        assert_eq!(coverage, 0.0);
        assert!(surface.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn a_single_square_covers_roughly_its_world_space_area_fraction() {
        let mut surface = GrayRasterSurface::new(100, 100);
        let polygons = vec![square(0.0, 0.0, 2.5)];
        let coverage = rasterize_layer(&mut surface, 10.0, 10.0, &polygons);
        // A 5x5 square inside a 10x10 scene covers 25%.
        assert_relative_eq!(coverage, 0.25, epsilon = 0.02);
    }

    #[test]
    fn a_hole_subtracts_from_the_outer_polygon_under_even_odd_fill() {
        let mut surface = GrayRasterSurface::new(100, 100);
        let outer = square(0.0, 0.0, 4.0);
        let inner = square(0.0, 0.0, 2.0);
        let coverage = rasterize_layer(&mut surface, 10.0, 10.0, &[outer, inner]);
        // Outer 8x8 minus inner 4x4 out of a 10x10 scene: (64-16)/100 = 0.48.
        assert_relative_eq!(coverage, 0.48, epsilon = 0.03);
    }

    #[test]
    fn two_separate_polygons_in_one_fill_both_paint() {
        let mut surface = GrayRasterSurface::new(100, 100);
        let a = square(-3.0, 0.0, 1.0);
        let b = square(3.0, 0.0, 1.0);
        let coverage = rasterize_layer(&mut surface, 10.0, 10.0, &[a, b]);
        // Two 2x2 squares out of a 10x10 scene: 2 * 4 / 100 = 0.08.
        assert_relative_eq!(coverage, 0.08, epsilon = 0.02);
    }
}
