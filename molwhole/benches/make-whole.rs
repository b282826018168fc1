#![allow(clippy::needless_return)]

use molwhole::{Topology, UnitCell, Unwrapper, Vector3D};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build a solvent-like system: `n_molecules` bent three-atom molecules
/// scattered deterministically over the cell, every coordinate wrapped back
/// inside. Molecules near a face end up split across the boundary.
fn wrapped_solvent(n_molecules: usize, cell_length: f64) -> (Topology, Vec<Vector3D>) {
    let mut topology = Topology::new();
    let mut positions = Vec::with_capacity(3 * n_molecules);

    for molecule in 0..n_molecules {
        let m = molecule as f64;
        let base = Vector3D::new(
            (7.3 * m) % cell_length,
            (11.9 * m) % cell_length,
            (3.7 * m) % cell_length,
        );

        let first = 3 * molecule;
        topology.add_bond(first, first + 1);
        topology.add_bond(first, first + 2);
        topology.add_angle(first + 1, first, first + 2);

        positions.push(base);
        positions.push(Vector3D::new(
            (base[0] + 0.9) % cell_length,
            base[1],
            base[2],
        ));
        positions.push(Vector3D::new(
            base[0],
            (base[1] + 0.9) % cell_length,
            base[2],
        ));
    }

    return (topology, positions);
}

fn make_whole(c: &mut Criterion) {
    let mut group = c.benchmark_group("make whole");

    for &n_molecules in black_box(&[100_usize, 1000, 10000]) {
        let n_atoms = 3 * n_molecules;
        let cell = UnitCell::cubic(20.0);
        let (topology, positions) = wrapped_solvent(n_molecules, 20.0);

        let unwrapper = Unwrapper::new();
        let mut unwrapped = vec![Vector3D::zero(); n_atoms];

        // build & cache the graph outside of the timing loop
        unwrapper.make_whole(&topology, n_atoms, &cell, &positions, &mut unwrapped).unwrap();

        group.bench_function(format!("{} atoms", n_atoms), |b| b.iter(|| {
            unwrapper.make_whole(&topology, n_atoms, &cell, &positions, &mut unwrapped).unwrap();
        }));
    }

    group.finish();
}

criterion_group!(benches, make_whole);
criterion_main!(benches);
