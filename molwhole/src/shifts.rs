//! Resolution of the periodic image of each atom, by propagating discrete
//! cell shifts along the bond graph.

use std::collections::VecDeque;
use std::ops::Index;

use once_cell::sync::Lazy;

use crate::{Matrix3, UnitCell, Vector3D};
use crate::graph::BondGraph;

/// Number of discrete shift classes: all combinations of -1/0/+1 integer
/// multiples of the three cell vectors.
pub const N_SHIFTS: usize = 27;

/// Class index of the zero shift.
pub const CENTRAL: usize = 13;

/// A cell shift represents the displacement along cell axes between the
/// actual position of an atom and a periodic image of this atom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellShift([i32; 3]);

/// The 27 shift classes, with the multiplier of the first cell vector varying
/// fastest: class 0 is (-1, -1, -1), and the zero shift sits at `CENTRAL`.
static CELL_SHIFTS: Lazy<[CellShift; N_SHIFTS]> = Lazy::new(|| {
    let mut shifts = [CellShift::default(); N_SHIFTS];
    let mut class = 0;
    for kc in -1..=1 {
        for kb in -1..=1 {
            for ka in -1..=1 {
                shifts[class] = CellShift::new(ka, kb, kc);
                class += 1;
            }
        }
    }
    return shifts;
});

impl CellShift {
    /// Create a new `CellShift` with multipliers `ka`, `kb`, `kc` of the
    /// three cell vectors.
    pub fn new(ka: i32, kb: i32, kc: i32) -> CellShift {
        CellShift([ka, kb, kc])
    }

    /// Get the shift of the given class index.
    pub fn from_class(class: usize) -> CellShift {
        CELL_SHIFTS[class]
    }

    /// Compute the shift vector in cartesian coordinates, using the given
    /// cell matrix (stored in row major order).
    pub fn cartesian(&self, cell: &Matrix3) -> Vector3D {
        let x = cell[0][0] * self[0] as f64 + cell[1][0] * self[1] as f64 + cell[2][0] * self[2] as f64;
        let y = cell[0][1] * self[0] as f64 + cell[1][1] * self[1] as f64 + cell[2][1] * self[2] as f64;
        let z = cell[0][2] * self[0] as f64 + cell[1][2] * self[1] as f64 + cell[2][2] * self[2] as f64;
        Vector3D::new(x, y, z)
    }
}

impl Index<usize> for CellShift {
    type Output = i32;

    fn index(&self, index: usize) -> &i32 {
        &self.0[index]
    }
}

/// Per-call table of the cartesian displacement of each of the 27 shift
/// classes for a given cell, so the traversal never recomputes them per edge.
#[derive(Debug, Clone)]
pub struct ShiftVectors([Vector3D; N_SHIFTS]);

impl ShiftVectors {
    /// Compute the shift vector table for the given `cell`, using the true
    /// (possibly triclinic) cell vectors.
    pub fn new(cell: &UnitCell) -> ShiftVectors {
        let matrix = cell.matrix();
        let mut vectors = [Vector3D::zero(); N_SHIFTS];
        for (class, vector) in vectors.iter_mut().enumerate() {
            *vector = CellShift::from_class(class).cartesian(&matrix);
        }
        return ShiftVectors(vectors);
    }
}

impl Index<usize> for ShiftVectors {
    type Output = Vector3D;

    fn index(&self, class: usize) -> &Vector3D {
        &self.0[class]
    }
}

/// Assign a shift class to every atom so that bonded atoms end up in the
/// same periodic image.
///
/// Each connected component of the graph is traversed breadth-first from its
/// lowest-index atom, which anchors the component with the zero shift. Every
/// atom reached through an edge gets the class bringing it closest to the
/// already-shifted position of its parent. Atoms without any bond keep the
/// zero shift.
///
/// The assignment only depends on local geometry, never on the traversal
/// order; exact ties between two images go to the lowest class index.
#[time_graph::instrument(name = "resolve_shifts")]
pub(crate) fn resolve_shifts(
    graph: &BondGraph,
    shift_vectors: &ShiftVectors,
    positions: &[Vector3D],
) -> Vec<usize> {
    debug_assert_eq!(graph.size(), positions.len());

    let mut classes = vec![CENTRAL; graph.size()];
    let mut visited = vec![false; graph.size()];
    let mut queue = VecDeque::new();

    for root in 0..graph.size() {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        queue.push_back(root);

        while let Some(atom) = queue.pop_front() {
            let reference = positions[atom] + shift_vectors[classes[atom]];
            for &neighbor in graph.neighbors(atom) {
                if visited[neighbor] {
                    continue;
                }
                visited[neighbor] = true;
                classes[neighbor] = closest_image(positions[neighbor], reference, shift_vectors);
                queue.push_back(neighbor);
            }
        }
    }

    return classes;
}

/// Get the class of the periodic image of `position` closest to `reference`,
/// scanning classes in increasing order so that exact ties deterministically
/// resolve to the lowest index.
fn closest_image(position: Vector3D, reference: Vector3D, shift_vectors: &ShiftVectors) -> usize {
    let mut best = 0;
    let mut best_distance2 = f64::INFINITY;
    for class in 0..N_SHIFTS {
        let distance2 = (position + shift_vectors[class] - reference).norm2();
        if distance2 < best_distance2 {
            best = class;
            best_distance2 = distance2;
        }
    }
    return best;
}
