//! Molecular graph model.
//!
//! A `MolecularGraph` is produced once by a [`crate::provider::GraphProvider`]
//! and is immutable afterwards. Adjacency is built at construction so every
//! downstream traversal is a pure read.

use serde::{Deserialize, Serialize};

/// Tetrahedral chirality parity as written in the input notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chirality {
    /// `@` — anticlockwise.
    Anticlockwise,
    /// `@@` — clockwise.
    Clockwise,
}

impl Chirality {
    /// Symbol used in fragment descriptors.
    pub fn symbol(&self) -> &'static str {
        match self {
            Chirality::Anticlockwise => "@",
            Chirality::Clockwise => "@@",
        }
    }

    /// The opposite parity mark.
    pub fn flipped(&self) -> Self {
        match self {
            Chirality::Anticlockwise => Chirality::Clockwise,
            Chirality::Clockwise => Chirality::Anticlockwise,
        }
    }
}

/// One slot in the written neighbor order of a chiral atom. Parity marks
/// are relative to this order, so it must be carried from the parser to
/// the normalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChiralSlot {
    /// The implicit hydrogen written inside the bracket.
    ImplicitH,
    /// A bond to a neighbor, by bond index.
    Bond(usize),
}

/// Bond order, including the delocalized aromatic bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BondOrder {
    /// Single bond.
    Single,
    /// Double bond.
    Double,
    /// Triple bond.
    Triple,
    /// Aromatic (delocalized) bond.
    Aromatic,
}

impl BondOrder {
    /// Descriptor symbol for this bond order.
    pub fn symbol(&self) -> &'static str {
        match self {
            BondOrder::Single => "-",
            BondOrder::Double => "=",
            BondOrder::Triple => "#",
            BondOrder::Aromatic => ":",
        }
    }

    /// Numeric rank used in canonical atom ranking. Stable across releases:
    /// changing these values changes every descriptor and fingerprint.
    pub fn rank(&self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        }
    }

    /// Valence contribution used for implicit-hydrogen assignment.
    /// Aromatic bonds count as one; the delocalized electron is accounted
    /// for separately on the atom.
    pub fn valence_units(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// One atom of a molecular graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Element symbol in canonical case (`C`, `Cl`, ...), aromaticity is a
    /// separate flag.
    pub element: String,
    /// Formal charge.
    pub charge: i8,
    /// Whether the atom is part of an aromatic system.
    pub aromatic: bool,
    /// Implicit hydrogen count.
    pub implicit_h: u8,
    /// Isotope mass number, if explicitly written.
    pub isotope: Option<u16>,
    /// Chirality parity. As stored it is relative to the invariant neighbor
    /// order, not the written one; see `canonical::normalize_parity`.
    pub chirality: Option<Chirality>,
    /// Neighbor slots in written order, recorded by the parser for chiral
    /// atoms and consumed (cleared) by parity normalization.
    pub neighbor_order: Option<Vec<ChiralSlot>>,
}

impl Atom {
    /// Create a plain uncharged, non-aromatic atom.
    pub fn new(element: impl Into<String>, implicit_h: u8) -> Self {
        Self {
            element: element.into(),
            charge: 0,
            aromatic: false,
            implicit_h,
            isotope: None,
            chirality: None,
            neighbor_order: None,
        }
    }

    /// True for any element other than carbon (hydrogens are never graph
    /// nodes in this model).
    pub fn is_hetero(&self) -> bool {
        self.element != "C"
    }
}

/// One bond of a molecular graph, referencing atoms by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    /// First endpoint (atom index).
    pub begin: usize,
    /// Second endpoint (atom index).
    pub end: usize,
    /// Bond order.
    pub order: BondOrder,
}

impl Bond {
    /// Create a new bond.
    pub fn new(begin: usize, end: usize, order: BondOrder) -> Self {
        Self { begin, end, order }
    }

    /// The endpoint opposite to `atom`.
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

/// Immutable molecular graph: atoms, bonds, and a prebuilt adjacency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularGraph {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Per atom: `(neighbor atom index, bond index)`, sorted by neighbor
    /// index for deterministic iteration.
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl MolecularGraph {
    /// Build a graph from atoms and bonds. Adjacency entries are sorted by
    /// neighbor index so traversal order never depends on bond input order.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bidx, bond) in bonds.iter().enumerate() {
            adjacency[bond.begin].push((bond.end, bidx));
            adjacency[bond.end].push((bond.begin, bidx));
        }
        for entry in &mut adjacency {
            entry.sort_unstable();
        }
        Self {
            atoms,
            bonds,
            adjacency,
        }
    }

    /// Number of atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Number of bonds.
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Atom by index.
    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    /// Bond by index.
    pub fn bond(&self, idx: usize) -> &Bond {
        &self.bonds[idx]
    }

    /// All atoms in index order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// All bonds in index order.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Neighbors of `atom` as `(neighbor atom index, bond index)`, sorted by
    /// neighbor index.
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    /// Degree of `atom` in the full graph.
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethanol() -> MolecularGraph {
        MolecularGraph::new(
            vec![Atom::new("C", 3), Atom::new("C", 2), Atom::new("O", 1)],
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(1, 2, BondOrder::Single),
            ],
        )
    }

    #[test]
    fn adjacency_is_sorted_and_symmetric() {
        let g = ethanol();
        assert_eq!(g.neighbors(1), &[(0, 0), (2, 1)]);
        assert_eq!(g.neighbors(0), &[(1, 0)]);
        assert_eq!(g.degree(1), 2);
    }

    #[test]
    fn adjacency_ignores_bond_input_order() {
        let a = ethanol();
        let b = MolecularGraph::new(
            vec![Atom::new("C", 3), Atom::new("C", 2), Atom::new("O", 1)],
            vec![
                Bond::new(1, 2, BondOrder::Single),
                Bond::new(0, 1, BondOrder::Single),
            ],
        );
        assert_eq!(
            a.neighbors(1).iter().map(|&(n, _)| n).collect::<Vec<_>>(),
            b.neighbors(1).iter().map(|&(n, _)| n).collect::<Vec<_>>()
        );
    }

    #[test]
    fn bond_other_endpoint() {
        let bond = Bond::new(3, 7, BondOrder::Double);
        assert_eq!(bond.other(3), 7);
        assert_eq!(bond.other(7), 3);
    }
}
