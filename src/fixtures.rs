//! Small, exactly-specified meshes shared by unit tests across modules.
//! Only compiled under `#[cfg(test)]`.

use crate::geometry::{MeshView, Triangle, Vertex3};

const CUBE_TRIANGLES: [Triangle; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [4, 6, 5],
    [4, 7, 6],
    [0, 5, 1],
    [0, 4, 5],
    [3, 2, 6],
    [3, 6, 7],
    [0, 3, 7],
    [0, 7, 4],
    [1, 5, 6],
    [1, 6, 2],
];

fn cube_vertices(ox: f32, oy: f32, oz: f32, size: f32) -> Vec<Vertex3> {
    vec![
        Vertex3::new(ox, oy, oz),
        Vertex3::new(ox + size, oy, oz),
        Vertex3::new(ox + size, oy + size, oz),
        Vertex3::new(ox, oy + size, oz),
        Vertex3::new(ox, oy, oz + size),
        Vertex3::new(ox + size, oy, oz + size),
        Vertex3::new(ox + size, oy + size, oz + size),
        Vertex3::new(ox, oy + size, oz + size),
    ]
}

/// A closed, axis-aligned unit cube spanning `[0, 1]^3`.
pub fn unit_cube() -> MeshView {
    MeshView::new(cube_vertices(0.0, 0.0, 0.0, 1.0), CUBE_TRIANGLES.to_vec())
}

/// Two disjoint unit cubes, the second offset by `dx` along x. A single
/// mesh since `MeshView` carries no notion of separate shells; the slicer
/// doesn't need one.
pub fn two_cubes(dx: f32) -> MeshView {
    let mut vertices = cube_vertices(0.0, 0.0, 0.0, 1.0);
    vertices.extend(cube_vertices(dx, 0.0, 0.0, 1.0));

    let mut triangles: Vec<Triangle> = CUBE_TRIANGLES.to_vec();
    for tri in CUBE_TRIANGLES {
        triangles.push([tri[0] + 8, tri[1] + 8, tri[2] + 8]);
    }

    MeshView::new(vertices, triangles)
}

/// A single non-degenerate tetrahedron with apex at `(0, 0, 1)`.
pub fn tetrahedron() -> MeshView {
    let vertices = vec![
        Vertex3::new(0.0, 0.0, 0.0),
        Vertex3::new(1.0, 0.0, 0.0),
        Vertex3::new(0.0, 1.0, 0.0),
        Vertex3::new(0.0, 0.0, 1.0),
    ];
    let triangles = vec![[0, 1, 2], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    MeshView::new(vertices, triangles)
}

/// A square prism centered on the z axis, `[-1.5, 1.5] x [-1.5, 1.5]` in x/y
/// and `[0, 3]` in z, with a square tunnel `[-0.5, 0.5] x [-0.5, 0.5]` bored
/// straight through along z. Slicing at any `0 < z < 3` yields a square
/// annulus: an outer contour and an inner hole contour, testing even-odd
/// fill subtraction end-to-end.
pub fn cube_with_square_hole() -> MeshView {
    let outer = [(-1.5, -1.5), (1.5, -1.5), (1.5, 1.5), (-1.5, 1.5)];
    let inner = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];

    let mut vertices = Vec::with_capacity(16);
    for &(x, y) in &outer {
        vertices.push(Vertex3::new(x, y, 0.0));
    }
    for &(x, y) in &inner {
        vertices.push(Vertex3::new(x, y, 0.0));
    }
    for &(x, y) in &outer {
        vertices.push(Vertex3::new(x, y, 3.0));
    }
    for &(x, y) in &inner {
        vertices.push(Vertex3::new(x, y, 3.0));
    }

    // Index bases: outer-bottom=0, inner-bottom=4, outer-top=8, inner-top=12.
    let mut triangles = Vec::with_capacity(32);
    for i in 0..4u32 {
        let j = (i + 1) % 4;

        // Outer side wall.
        triangles.push([i, j, 8 + j]);
        triangles.push([i, 8 + j, 8 + i]);

        // Inner (tunnel) side wall, wound the opposite way so the tunnel
        // surface and outer surface don't share a consistent global
        // orientation; slicing doesn't depend on winding.
        triangles.push([4 + i, 12 + j, 4 + j]);
        triangles.push([4 + i, 12 + i, 12 + j]);

        // Bottom annulus: outer ring to inner ring.
        triangles.push([i, 4 + j, 4 + i]);
        triangles.push([i, j, 4 + j]);

        // Top annulus: outer ring to inner ring.
        triangles.push([8 + i, 12 + i, 12 + j]);
        triangles.push([8 + i, 12 + j, 8 + j]);
    }

    MeshView::new(vertices, triangles)
}
