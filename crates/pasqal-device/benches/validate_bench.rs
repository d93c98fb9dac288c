//! Benchmarks for device validation and decomposition
//!
//! Run with: cargo bench -p pasqal-device

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pasqal_device::PasqalDevice;
use pasqal_ir::{Gate, Operation, ThreeDGridQubit};

/// Benchmark device construction over growing cubes
fn bench_device_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("device_creation");

    for diameter in &[2u32, 4, 8] {
        let sites = ThreeDGridQubit::cube(*diameter, 0, 0, 0);
        group.bench_with_input(BenchmarkId::new("cube", diameter), &sites, |b, sites| {
            b.iter(|| PasqalDevice::new(black_box(1.5), sites.iter().copied()).unwrap());
        });
    }

    group.finish();
}

/// Benchmark single-operation validation
fn bench_validate_operation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_operation");
    let device = PasqalDevice::new(1.5, ThreeDGridQubit::cube(4, 0, 0, 0)).unwrap();
    let sites = device.qubit_list();

    let x = Gate::x().on([sites[0]]).unwrap();
    group.bench_function("x", |b| {
        b.iter(|| device.validate_operation(black_box(&x)).unwrap());
    });

    let cz = Gate::cz().on([sites[0], sites[1]]).unwrap();
    group.bench_function("cz", |b| {
        b.iter(|| device.validate_operation(black_box(&cz)).unwrap());
    });

    let parallel_x = Gate::x().on_each(sites.clone()).unwrap();
    group.bench_function("parallel_x_all", |b| {
        b.iter(|| device.validate_operation(black_box(&parallel_x)).unwrap());
    });

    group.finish();
}

/// Benchmark lowering a layer of fractional CCZ gates
fn bench_validate_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_circuit");

    for diameter in &[3u32, 6, 9] {
        let device = PasqalDevice::new(1.5, ThreeDGridQubit::square(*diameter, 0, 0)).unwrap();
        let sites = device.qubit_list();
        let circuit: Vec<Operation> = sites
            .chunks_exact(*diameter as usize)
            .flat_map(|row| row.chunks_exact(3))
            .map(|triple| Gate::CCZPow { exponent: 0.5 }.on(triple.to_vec()).unwrap())
            .collect();

        group.bench_with_input(
            BenchmarkId::new("ccz_rows", diameter),
            &circuit,
            |b, circuit| {
                b.iter(|| device.validate_circuit(black_box(circuit)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_device_creation,
    bench_validate_operation,
    bench_validate_circuit
);
criterion_main!(benches);
