use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::{Error, Topology};
use super::BondGraph;

/// `GraphCache` keeps the connectivity graphs built for every system size
/// seen so far, so that repeated calls over the frames of a trajectory only
/// pay the graph construction cost once.
///
/// Graphs are keyed by the number of atoms alone: two different topologies
/// with the same atom count will silently share the graph built first. This
/// matches how the cache is used in practice, where a process handles one (or
/// a handful of) system definitions, each with a distinct size. The cache
/// grows without eviction; the expected number of distinct sizes in a run is
/// very small.
///
/// Lookup-or-build holds a single lock for its full duration, so concurrent
/// callers racing on a new size build the graph exactly once and never
/// observe a partially constructed one. Published graphs are immutable and
/// shared by reference counting.
#[derive(Debug, Default)]
pub struct GraphCache {
    graphs: Mutex<BTreeMap<usize, Arc<BondGraph>>>,
}

impl GraphCache {
    /// Create a new empty `GraphCache`
    pub fn new() -> GraphCache {
        GraphCache::default()
    }

    /// Get the graph for a system with `n_atoms` atoms, building and storing
    /// it from `topology` if this size was never seen before.
    ///
    /// On a cache hit the stored graph is returned unconditionally, without
    /// looking at `topology` at all.
    pub fn get_or_build(&self, n_atoms: usize, topology: &Topology) -> Result<Arc<BondGraph>, Error> {
        let mut graphs = self.graphs.lock().expect("poisoned graph cache lock");
        match graphs.entry(n_atoms) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                debug!("no cached bond graph for {} atoms, building one", n_atoms);
                let graph = Arc::new(BondGraph::new(topology, n_atoms)?);
                entry.insert(Arc::clone(&graph));
                Ok(graph)
            }
        }
    }

    /// Get the number of graphs currently stored in this cache
    pub fn len(&self) -> usize {
        self.graphs.lock().expect("poisoned graph cache lock").len()
    }

    /// Check if this cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all cached graphs, forcing a rebuild on the next call. Mostly
    /// useful to isolate tests from one another.
    pub fn clear(&self) {
        self.graphs.lock().expect("poisoned graph cache lock").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_and_miss() {
        let cache = GraphCache::new();
        assert!(cache.is_empty());

        let mut topology = Topology::new();
        topology.add_bond(0, 1);

        let first = cache.get_or_build(3, &topology).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(first.edges_count(), 1);

        // a hit returns the very same graph
        let second = cache.get_or_build(3, &topology).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // a different size is a separate entry
        let _ = cache.get_or_build(4, &topology).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn keyed_by_size_only() {
        let cache = GraphCache::new();

        let mut topology = Topology::new();
        topology.add_bond(0, 1);
        let first = cache.get_or_build(3, &topology).unwrap();

        // same atom count, different topology: the cached graph wins
        let mut other = Topology::new();
        other.add_bond(1, 2);
        let second = cache.get_or_build(3, &other).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.neighbors(0), &[1]);
        assert!(second.neighbors(2).is_empty());
    }

    #[test]
    fn failed_build_is_not_cached() {
        let cache = GraphCache::new();

        let mut topology = Topology::new();
        topology.add_bond(0, 12);

        assert!(cache.get_or_build(3, &topology).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_between_threads() {
        let cache = GraphCache::new();

        let mut topology = Topology::new();
        topology.add_bond(0, 1);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    cache.get_or_build(8, &topology).unwrap();
                });
            }
        });

        // everyone raced on the same size, only one graph was built
        assert_eq!(cache.len(), 1);
    }
}
