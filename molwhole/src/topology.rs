//! Description of the bonded interactions between particles of a system,
//! as produced by an external topology loader.

use serde::{Deserialize, Serialize};

/// A bond-like connection between two atoms, stored with `i <= j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
}

impl Bond {
    /// Create a new `Bond` between atoms `i` and `j`, normalizing the storage
    /// order of the two indexes.
    pub fn new(i: usize, j: usize) -> Bond {
        if i <= j {
            Bond { i: i, j: j }
        } else {
            Bond { i: j, j: i }
        }
    }
}

/// An angle between atoms `i-j-k`, where `j` is the apex; `i-j` and `j-k` are
/// chemically bonded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Angle {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl Angle {
    /// Create a new `Angle` between atoms `i`, `j` and `k`.
    pub fn new(i: usize, j: usize, k: usize) -> Angle {
        Angle { i: i, j: j, k: k }
    }
}

/// A dihedral angle between atoms `i-j-k-l`, bonded consecutively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dihedral {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub l: usize,
}

impl Dihedral {
    /// Create a new `Dihedral` between atoms `i`, `j`, `k` and `l`.
    pub fn new(i: usize, j: usize, k: usize, l: usize) -> Dihedral {
        Dihedral { i: i, j: j, k: k, l: l }
    }
}

/// `Topology` collects the bonded interaction definitions of a particle
/// system: bonds, distance constraints, angles, dihedrals, and nonbonded 1-4
/// pairs.
///
/// Only the particle indexes of each term are carried here, not force field
/// parameters: this is everything connectivity-derived code needs, and
/// everything a topology loader has to provide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    bonds: Vec<Bond>,
    constraints: Vec<Bond>,
    angles: Vec<Angle>,
    dihedrals: Vec<Dihedral>,
    pairs: Vec<Bond>,
}

impl Topology {
    /// Create a new empty `Topology`
    pub fn new() -> Topology {
        Topology::default()
    }

    /// Add a chemical bond between atoms `i` and `j`
    pub fn add_bond(&mut self, i: usize, j: usize) {
        self.bonds.push(Bond::new(i, j));
    }

    /// Add a distance constraint between atoms `i` and `j`. Constraints stand
    /// in for stiff chemical bonds (constrained hydrogens, rigid waters), and
    /// carry connectivity just like bonds do.
    pub fn add_constraint(&mut self, i: usize, j: usize) {
        self.constraints.push(Bond::new(i, j));
    }

    /// Add an angle between atoms `i`, `j` and `k`, with `j` the apex
    pub fn add_angle(&mut self, i: usize, j: usize, k: usize) {
        self.angles.push(Angle::new(i, j, k));
    }

    /// Add a dihedral between the consecutively bonded atoms `i`, `j`, `k`
    /// and `l`
    pub fn add_dihedral(&mut self, i: usize, j: usize, k: usize, l: usize) {
        self.dihedrals.push(Dihedral::new(i, j, k, l));
    }

    /// Add a nonbonded 1-4 pair between atoms `i` and `j`. Pairs describe a
    /// scaled nonbonded interaction between atoms three bonds apart; they are
    /// not chemical bonds and do not carry connectivity.
    pub fn add_pair(&mut self, i: usize, j: usize) {
        self.pairs.push(Bond::new(i, j));
    }

    /// Get the bonds in this topology
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Get the distance constraints in this topology
    pub fn constraints(&self) -> &[Bond] {
        &self.constraints
    }

    /// Get the angles in this topology
    pub fn angles(&self) -> &[Angle] {
        &self.angles
    }

    /// Get the dihedrals in this topology
    pub fn dihedrals(&self) -> &[Dihedral] {
        &self.dihedrals
    }

    /// Get the nonbonded 1-4 pairs in this topology
    pub fn pairs(&self) -> &[Bond] {
        &self.pairs
    }

    /// Iterate over all pairs of atoms connected by a physical bond: bonds
    /// and constraints directly, and the consecutive pairs of angles and
    /// dihedrals. Nonbonded 1-4 pairs are left out.
    pub(crate) fn connected_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let bonds = self.bonds.iter()
            .chain(&self.constraints)
            .map(|bond| (bond.i, bond.j));

        let angles = self.angles.iter().flat_map(|angle| {
            [(angle.i, angle.j), (angle.j, angle.k)]
        });

        let dihedrals = self.dihedrals.iter().flat_map(|dihedral| {
            [(dihedral.i, dihedral.j), (dihedral.j, dihedral.k), (dihedral.k, dihedral.l)]
        });

        return bonds.chain(angles).chain(dihedrals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_ordering() {
        assert_eq!(Bond::new(3, 7), Bond::new(7, 3));
        assert_eq!(Bond::new(7, 3).i, 3);
        assert_eq!(Bond::new(7, 3).j, 7);
    }

    #[test]
    fn connected_pairs() {
        let mut topology = Topology::new();
        topology.add_bond(0, 1);
        topology.add_constraint(1, 2);
        topology.add_angle(0, 1, 2);
        topology.add_dihedral(0, 1, 2, 3);
        topology.add_pair(0, 3);

        let connected = topology.connected_pairs().collect::<Vec<_>>();
        assert_eq!(connected, [
            // bonds & constraints
            (0, 1), (1, 2),
            // angle
            (0, 1), (1, 2),
            // dihedral
            (0, 1), (1, 2), (2, 3),
        ]);

        // the 1-4 pair between 0 and 3 does not show up
        assert!(!connected.contains(&(0, 3)));
    }

    #[test]
    fn from_json() {
        // the shape an external topology loader would produce
        let topology: Topology = serde_json::from_str(r#"{
            "bonds": [{"i": 0, "j": 1}, {"i": 1, "j": 2}],
            "constraints": [{"i": 2, "j": 3}],
            "angles": [{"i": 0, "j": 1, "k": 2}],
            "dihedrals": [],
            "pairs": [{"i": 0, "j": 3}]
        }"#).expect("invalid JSON");

        assert_eq!(topology.bonds().len(), 2);
        assert_eq!(topology.constraints(), &[Bond::new(2, 3)]);
        assert_eq!(topology.angles(), &[Angle::new(0, 1, 2)]);
        assert!(topology.dihedrals().is_empty());
        assert_eq!(topology.pairs(), &[Bond::new(0, 3)]);
    }
}
