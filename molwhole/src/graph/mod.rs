//! Connectivity graph derived from bonded interactions, and the process-wide
//! cache reusing it between calls.

use log::debug;

use crate::{Error, Topology};

mod cache;
pub use self::cache::GraphCache;

/// A `BondGraph` stores which atoms of a system are connected by physical
/// bonds, as adjacency lists over the atom indexes.
///
/// The graph is built once from a [`Topology`](crate::Topology) and a number
/// of atoms, and is immutable afterward. Edges come from bonds, constraints,
/// and the consecutive pairs of angles and dihedrals; nonbonded 1-4 pairs do
/// not contribute edges.
#[derive(Debug, Clone)]
pub struct BondGraph {
    /// adjacency lists, one per atom, sorted and deduplicated
    adjacency: Vec<Vec<usize>>,
    /// number of distinct edges in the graph
    n_edges: usize,
}

impl BondGraph {
    /// Build the connectivity graph over `n_atoms` atoms from the bonded
    /// terms in `topology`.
    ///
    /// Fails with `Error::InvalidTopology` if any term references an atom
    /// index which is not part of the system.
    #[time_graph::instrument(name = "BondGraph")]
    pub fn new(topology: &Topology, n_atoms: usize) -> Result<BondGraph, Error> {
        let mut adjacency = vec![Vec::new(); n_atoms];

        for (i, j) in topology.connected_pairs() {
            if i >= n_atoms || j >= n_atoms {
                return Err(Error::InvalidTopology(format!(
                    "bonded term between atoms {} and {}, but the system only contains {} atoms",
                    i, j, n_atoms
                )));
            }

            adjacency[i].push(j);
            adjacency[j].push(i);
        }

        // multiple terms can declare the same pair (e.g. a bond and the
        // matching angle edge), only keep one edge for each
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        let n_edges = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        debug!("built bond graph with {} atoms and {} edges", n_atoms, n_edges);

        return Ok(BondGraph {
            adjacency: adjacency,
            n_edges: n_edges,
        });
    }

    /// Get the number of atoms this graph was built for
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Get the number of distinct edges in this graph
    pub fn edges_count(&self) -> usize {
        self.n_edges
    }

    /// Get the atoms bonded to the given `atom`, in increasing index order
    pub fn neighbors(&self, atom: usize) -> &[usize] {
        &self.adjacency[atom]
    }
}
