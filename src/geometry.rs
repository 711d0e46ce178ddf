//! Numeric primitives shared by the slicer, contour builder and rasterizer.

/// A mesh vertex. Stored at float precision, matching the precision of the
/// Wavefront source records it is parsed from.
pub type Vertex3 = nalgebra::Point3<f32>;

/// A 2D point at double precision, used for intersection sites and polygon
/// vertices once a layer plane has been fixed.
pub type Point2 = nalgebra::Point2<f64>;

/// Three vertex indices into a [`MeshView`]'s vertex array.
pub type Triangle = [u32; 3];

fn axis_value(v: &Vertex3, axis: usize) -> f64 {
    match axis {
        0 => v.x as f64,
        1 => v.y as f64,
        _ => v.z as f64,
    }
}

/// A flat, read-only view over a triangle mesh: a vertex array and an index
/// array of triangles referencing it. No connectivity beyond triangle
/// membership is tracked; the slicer and manifold check never need a
/// neighbor-of-neighbor query.
#[derive(Debug, Clone, Default)]
pub struct MeshView {
    vertices: Vec<Vertex3>,
    triangles: Vec<Triangle>,
}

impl MeshView {
    pub fn new(vertices: Vec<Vertex3>, triangles: Vec<Triangle>) -> Self {
        Self { vertices, triangles }
    }

    pub fn vertices(&self) -> &[Vertex3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertex(&self, index: u32) -> Vertex3 {
        self.vertices[index as usize]
    }

    /// The minimum and maximum coordinate of a triangle's three vertices
    /// along `axis` (0 = x, 1 = y, 2 = z).
    pub fn triangle_axis_min_max(&self, triangle: &Triangle, axis: usize) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &idx in triangle {
            let value = axis_value(&self.vertex(idx), axis);
            lo = lo.min(value);
            hi = hi.max(value);
        }
        (lo, hi)
    }
}

/// Encodes a vertex-identified intersection site: the vertex itself lies
/// exactly on the slicing plane.
pub fn vertex_key(v: u32) -> u64 {
    v as u64
}

/// Encodes an edge-identified intersection site: the plane crosses the open
/// edge `(a, b)`. Symmetric in `a` and `b` so both triangles sharing the edge
/// derive the same key.
pub fn edge_key(a: u32, b: u32) -> u64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    ((lo as u64) << 32) | (hi as u64)
}

/// A capacity-2 set deduplicated by key, used to collect the intersection
/// sites a single triangle contributes to a single layer plane. A closed,
/// 2-manifold triangle contributes at most two distinct sites per crossing
/// plane; a third insertion is silently dropped rather than treated as an
/// error here, since that case is reported later as a graph invariant
/// violation with more context.
#[derive(Debug, Clone, Copy)]
pub struct FiniteSet2 {
    items: [(u64, Point2); 2],
    len: usize,
}

impl Default for FiniteSet2 {
    fn default() -> Self {
        Self::new()
    }
}

impl FiniteSet2 {
    pub fn new() -> Self {
        Self {
            items: [(0, Point2::origin()), (0, Point2::origin())],
            len: 0,
        }
    }

    pub fn insert(&mut self, key: u64, position: Point2) {
        if self.items[..self.len].iter().any(|&(k, _)| k == key) {
            return;
        }
        if self.len < 2 {
            self.items[self.len] = (key, position);
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_pair(&self) -> Option<((u64, Point2), (u64, Point2))> {
        if self.len == 2 {
            Some((self.items[0], self.items[1]))
        } else {
            None
        }
    }
}
