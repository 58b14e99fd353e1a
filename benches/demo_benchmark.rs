// benches/demo_benchmark.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fixed_demos::rendering_lib::flat_renderer::FlatFrame;
use fixed_demos::rendering_lib::geometry::{regular_polygon, Point2, MAX_VERTICES};
use fixed_demos::rendering_lib::shadow::{shadow_quads, DEFAULT_EXTRUDE_DISTANCE};
use fixed_demos::shadows_app::{Caster, ShadowScene};
use fixed_demos::voxel::{generate_voxel_map, mesh::build_mesh, VoxelGrid};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn shadow_benchmark_fn(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);

    const NUM_CASTERS: usize = 100;
    let casters: Vec<_> = (0..NUM_CASTERS)
        .map(|_| {
            let polygon = regular_polygon(rng.gen_range(3..=MAX_VERTICES), rng.gen_range(0.05..0.2));
            let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let distance: f32 = rng.gen_range(0.3..0.9);
            (polygon, Point2::new(angle.cos() * distance, angle.sin() * distance))
        })
        .collect();

    let mut group = c.benchmark_group("ShadowOperations");

    group.bench_function("shadow_quads_100_casters", |b| {
        b.iter(|| {
            let mut total = 0;
            for (polygon, offset) in &casters {
                total += shadow_quads(black_box(polygon), *offset, Point2::ORIGIN, DEFAULT_EXTRUDE_DISTANCE).len();
            }
            black_box(total)
        })
    });

    group.bench_function("build_frame_full_scene", |b| {
        let mut scene = ShadowScene::new();
        let mut i = 0;
        while scene
            .add_caster(Caster { sides: 3 + i % 8, size: 0.08, orbit_radius: 0.2 + 0.05 * i as f32, orbit_rate: 1.0 + i as f32 * 0.1 })
            .is_ok()
        {
            i += 1;
        }
        let mut frame = FlatFrame::default();
        b.iter(|| {
            scene.advance();
            black_box(scene.build_frame(&mut frame, [640.0 / 700.0, 640.0 / 700.0]))
        })
    });

    group.finish();
}

fn voxel_benchmark_fn(c: &mut Criterion) {
    let mut group = c.benchmark_group("VoxelOperations");
    group.sample_size(10);

    group.bench_function("generate_voxel_map", |b| {
        let mut rng = StdRng::seed_from_u64(3);
        b.iter(|| {
            let mut grid = VoxelGrid::new();
            generate_voxel_map(&mut grid, &mut rng).unwrap();
            black_box(grid.len())
        })
    });

    group.bench_function("build_mesh", |b| {
        let mut grid = VoxelGrid::new();
        generate_voxel_map(&mut grid, &mut StdRng::seed_from_u64(3)).unwrap();
        b.iter(|| black_box(build_mesh(black_box(&grid)).len()))
    });

    group.finish();
}

criterion_group!(benches, shadow_benchmark_fn, voxel_benchmark_fn);
criterion_main!(benches);
