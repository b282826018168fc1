//! The unwrapping engine, putting connectivity and shift resolution together
//! to make molecules whole again.

use log::warn;

use crate::{Error, Topology, UnitCell, Vector3D};
use crate::graph::{BondGraph, GraphCache};
use crate::shifts::{resolve_shifts, ShiftVectors};

/// `Unwrapper` removes periodic boundary artifacts from particle positions:
/// every group of atoms connected through bonds comes out spatially
/// contiguous, even when the raw coordinates place bonded neighbors on
/// opposite sides of the cell.
///
/// The unwrapper owns the cache of connectivity graphs, so calling it over
/// every frame of a trajectory only builds the graph once per system size.
pub struct Unwrapper {
    cache: GraphCache,
}

impl Default for Unwrapper {
    fn default() -> Unwrapper {
        Unwrapper::new()
    }
}

impl Unwrapper {
    /// Create a new `Unwrapper` with an empty graph cache
    pub fn new() -> Unwrapper {
        Unwrapper {
            cache: GraphCache::new(),
        }
    }

    /// Get the graph cache of this unwrapper
    pub fn graph_cache(&self) -> &GraphCache {
        &self.cache
    }

    /// Unwrap `positions` into the `unwrapped` buffer.
    ///
    /// `n_atoms` must match the length of both buffers. With an infinite
    /// `cell` the output is a verbatim copy of the input. On error, nothing
    /// is written to `unwrapped`.
    pub fn make_whole(
        &self,
        topology: &Topology,
        n_atoms: usize,
        cell: &UnitCell,
        positions: &[Vector3D],
        unwrapped: &mut [Vector3D],
    ) -> Result<(), Error> {
        check_size("positions", positions.len(), n_atoms)?;
        check_size("output positions", unwrapped.len(), n_atoms)?;

        if cell.is_infinite() {
            unwrapped.copy_from_slice(positions);
            return Ok(());
        }

        let graph = self.cache.get_or_build(n_atoms, topology)?;
        let shift_vectors = ShiftVectors::new(cell);
        let classes = resolve_shifts(&graph, &shift_vectors, positions);

        for (atom, output) in unwrapped.iter_mut().enumerate() {
            *output = positions[atom] + shift_vectors[classes[atom]];
        }

        warn_residual_wraps(&graph, cell, unwrapped);
        return Ok(());
    }

    /// Unwrap `positions` in place. This is the aliasing variant of
    /// [`make_whole`](Unwrapper::make_whole): all shifts are resolved before
    /// the buffer is modified, and on error nothing is modified at all.
    pub fn make_whole_in_place(
        &self,
        topology: &Topology,
        n_atoms: usize,
        cell: &UnitCell,
        positions: &mut [Vector3D],
    ) -> Result<(), Error> {
        check_size("positions", positions.len(), n_atoms)?;

        if cell.is_infinite() {
            return Ok(());
        }

        let graph = self.cache.get_or_build(n_atoms, topology)?;
        let shift_vectors = ShiftVectors::new(cell);
        let classes = resolve_shifts(&graph, &shift_vectors, positions);

        for (atom, position) in positions.iter_mut().enumerate() {
            *position += shift_vectors[classes[atom]];
        }

        warn_residual_wraps(&graph, cell, positions);
        return Ok(());
    }

    /// Unwrap `positions` into a freshly allocated vector.
    pub fn make_whole_vec(
        &self,
        topology: &Topology,
        n_atoms: usize,
        cell: &UnitCell,
        positions: &[Vector3D],
    ) -> Result<Vec<Vector3D>, Error> {
        let mut unwrapped = vec![Vector3D::zero(); positions.len()];
        self.make_whole(topology, n_atoms, cell, positions, &mut unwrapped)?;
        return Ok(unwrapped);
    }
}

fn check_size(what: &str, actual: usize, n_atoms: usize) -> Result<(), Error> {
    if actual != n_atoms {
        return Err(Error::SizeMismatch(format!(
            "expected {} {}, got {}", n_atoms, what, actual
        )));
    }
    return Ok(());
}

/// A bond still longer than half the smallest distance between opposite cell
/// faces after unwrapping means the topology connects atoms further apart
/// than one periodic image can account for, usually a topology which does
/// not match the positions.
fn warn_residual_wraps(graph: &BondGraph, cell: &UnitCell, unwrapped: &[Vector3D]) {
    let faces = cell.distances_between_faces();
    let threshold = 0.5 * f64::min(faces[0], f64::min(faces[1], faces[2]));
    let threshold2 = threshold * threshold;

    let mut residual = 0;
    for atom in 0..graph.size() {
        for &neighbor in graph.neighbors(atom) {
            if neighbor > atom && (unwrapped[neighbor] - unwrapped[atom]).norm2() > threshold2 {
                residual += 1;
            }
        }
    }

    if residual > 0 {
        warn!(
            "{} bonds remain longer than half the cell after unwrapping, \
            the topology might not match the positions",
            residual
        );
    }
}
