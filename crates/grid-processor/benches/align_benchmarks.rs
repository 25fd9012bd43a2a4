//! Benchmarks for bounds resolution, alignment and merging.
//!
//! Run with: cargo bench --package grid-processor
//! Or: cargo bench --package grid-processor --bench align_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use grid_processor::{
    merge_sources, resolve_axis, AlignConfig, BoundsResolver, GeoBoundingBox, GridAligner,
    MergeInputs, MergeRequest, ReferenceGrid,
};
use test_utils::{ascending_axis, SourceGridBuilder};

/// 1/12 degree grid over the Caribbean, GLORYS resolution.
fn caribbean_builder(nlat: usize, nlon: usize) -> SourceGridBuilder {
    SourceGridBuilder::new(
        ascending_axis(8.0, 1.0 / 12.0, nlat),
        ascending_axis(-90.0, 1.0 / 12.0, nlon),
    )
}

fn caribbean_bbox() -> GeoBoundingBox {
    GeoBoundingBox::new(-80.0, -70.0, 10.0, 16.0)
}

// =============================================================================
// BOUNDS RESOLUTION BENCHMARKS
// =============================================================================

fn bench_bounds_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounds_resolution");

    for len in [241usize, 4320] {
        let axis = ascending_axis(-180.0, 360.0 / len as f64, len);
        group.bench_with_input(BenchmarkId::new("resolve_axis", len), &axis, |b, axis| {
            b.iter(|| resolve_axis(black_box(axis), black_box(-80.0), black_box(-70.0)))
        });
    }

    let builder = caribbean_builder(120, 240);
    let bbox = caribbean_bbox();
    group.bench_function("resolve_bbox", |b| {
        b.iter(|| {
            BoundsResolver::new(&builder.latitude, &builder.longitude).resolve(black_box(Some(&bbox)))
        })
    });

    group.finish();
}

// =============================================================================
// ALIGNMENT BENCHMARKS
// =============================================================================

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");

    for (nlat, nlon) in [(60usize, 120usize), (120, 240)] {
        let builder = caribbean_builder(nlat, nlon);
        let temperature = builder.temperature();
        let salinity = builder.salinity();
        let bounds = BoundsResolver::new(&temperature.latitude, &temperature.longitude)
            .resolve(Some(&caribbean_bbox()));
        let Ok(reference) = ReferenceGrid::from_source(&temperature, &bounds) else {
            continue;
        };
        let config = AlignConfig::default();
        let aligner = GridAligner::new(&reference, &bounds, &config);

        group.throughput(Throughput::Elements(salinity.value_count() as u64));
        group.bench_with_input(
            BenchmarkId::new("align_salinity", format!("{nlat}x{nlon}")),
            &salinity,
            |b, salinity| b.iter(|| aligner.align(black_box(salinity))),
        );
    }

    group.finish();
}

// =============================================================================
// END-TO-END MERGE BENCHMARKS
// =============================================================================

fn bench_merge_sources(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_sources");
    group.sample_size(20);

    let builder = caribbean_builder(120, 240);
    let request = MergeRequest::new(6, Some(caribbean_bbox()));
    let config = AlignConfig::default();

    group.bench_function("caribbean_hour_6", |b| {
        b.iter_batched(
            || MergeInputs {
                temperature: builder.temperature(),
                salinity: builder.salinity(),
                currents: builder.currents(),
                sea_level: builder.sea_level(),
            },
            |inputs| merge_sources(inputs, black_box(&request), &config),
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_bounds_resolution, bench_alignment, bench_merge_sources);
criterion_main!(benches);
