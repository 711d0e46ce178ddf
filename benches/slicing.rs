//! Benchmarks for the two kernel stages that dominate the crate's time
//! budget: triangulating against the layer stack, then walking the
//! resulting graphs into polygons.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maskslicer::contour;
use maskslicer::geometry::{MeshView, Triangle, Vertex3};
use maskslicer::planning::LayerPlan;
use maskslicer::progress::NoopProgress;
use maskslicer::slicer;

/// A closed cylinder approximated by `sides`-gon cross-sections stacked
/// `rings` high, triangulated as a quad strip per side, closed with top and
/// bottom fans. Scales triangle count roughly linearly in both parameters,
/// which is what the slicer and contour builder each scale with.
fn cylinder_mesh(sides: usize, rings: usize, radius: f32, height: f32) -> MeshView {
    let mut vertices = Vec::with_capacity(sides * (rings + 1) + 2);
    for r in 0..=rings {
        let z = height * r as f32 / rings as f32;
        for s in 0..sides {
            let theta = std::f32::consts::TAU * s as f32 / sides as f32;
            vertices.push(Vertex3::new(radius * theta.cos(), radius * theta.sin(), z));
        }
    }
    let bottom_center = vertices.len() as u32;
    vertices.push(Vertex3::new(0.0, 0.0, 0.0));
    let top_center = vertices.len() as u32;
    vertices.push(Vertex3::new(0.0, 0.0, height));

    let mut triangles: Vec<Triangle> = Vec::new();
    for r in 0..rings {
        let base = (r * sides) as u32;
        let next = ((r + 1) * sides) as u32;
        for s in 0..sides {
            let s_next = (s + 1) % sides;
            let a = base + s as u32;
            let b = base + s_next as u32;
            let c = next + s_next as u32;
            let d = next + s as u32;
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }
    for s in 0..sides {
        let s_next = (s + 1) % sides;
        triangles.push([bottom_center, s_next as u32, s as u32]);
        let top_base = (rings * sides) as u32;
        triangles.push([top_center, top_base + s as u32, top_base + s_next as u32]);
    }

    MeshView::new(vertices, triangles)
}

fn bench_slice_meshes(c: &mut Criterion) {
    let mesh = cylinder_mesh(64, 200, 10.0, 50.0);
    let plan = LayerPlan::compute(std::slice::from_ref(&mesh), 0.1).unwrap();

    c.bench_function("slicer::slice_meshes (64-gon x200 rings)", |b| {
        b.iter(|| {
            let graphs =
                slicer::slice_meshes(std::slice::from_ref(&mesh), &plan, &NoopProgress).unwrap();
            black_box(graphs)
        })
    });
}

fn bench_build_all(c: &mut Criterion) {
    let mesh = cylinder_mesh(64, 200, 10.0, 50.0);
    let plan = LayerPlan::compute(std::slice::from_ref(&mesh), 0.1).unwrap();
    let graphs = slicer::slice_meshes(std::slice::from_ref(&mesh), &plan, &NoopProgress).unwrap();

    c.bench_function("contour::build_all (500 layers)", |b| {
        b.iter(|| {
            let polygons = contour::build_all(&graphs, &NoopProgress).unwrap();
            black_box(polygons)
        })
    });
}

criterion_group!(benches, bench_slice_meshes, bench_build_all);
criterion_main!(benches);
