//! Bounded-radius atom environments.

use serde::{Deserialize, Serialize};

use crate::types::graph::{BondOrder, MolecularGraph};

/// The induced subgraph of atoms and bonds within a fixed bond distance of a
/// center atom. Derived and read-only; one per `(atom, radius)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomEnvironment {
    /// Center atom index.
    pub center: usize,
    /// Radius in bond steps.
    pub radius: u32,
    /// Member atom indices, sorted ascending.
    pub atoms: Vec<usize>,
    /// Member bond indices, sorted ascending.
    pub bonds: Vec<usize>,
}

impl AtomEnvironment {
    /// The single-atom environment at radius zero.
    pub fn root(center: usize) -> Self {
        Self {
            center,
            radius: 0,
            atoms: vec![center],
            bonds: Vec::new(),
        }
    }

    /// True when this environment covers the same atoms and bonds as
    /// `other`. Radius and center are ignored: a stalled expansion produces
    /// an identical induced subgraph under a higher radius label.
    pub fn same_subgraph(&self, other: &AtomEnvironment) -> bool {
        self.atoms == other.atoms && self.bonds == other.bonds
    }

    /// Whether the environment's induced subgraph contains a cycle.
    /// The subgraph is connected by construction, so `bonds >= atoms`
    /// implies a ring.
    pub fn has_ring(&self) -> bool {
        self.bonds.len() >= self.atoms.len()
    }

    /// Number of non-carbon member atoms.
    pub fn hetero_count(&self, graph: &MolecularGraph) -> u32 {
        self.atoms
            .iter()
            .filter(|&&a| graph.atom(a).is_hetero())
            .count() as u32
    }

    /// Whether any member bond is double, triple, or aromatic.
    pub fn has_unsaturation(&self, graph: &MolecularGraph) -> bool {
        self.bonds
            .iter()
            .any(|&b| graph.bond(b).order != BondOrder::Single)
    }
}
