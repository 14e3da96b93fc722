//! Kekulization: resolve aromatic bonds into an explicit alternating
//! single/double pattern.
//!
//! The assignment is a perfect matching over the aromatic atoms that still
//! have a free valence unit, found by deterministic backtracking in atom
//! index order. Systems that admit no assignment keep their aromatic form;
//! the caller gets the original graph back.

use tracing::warn;

use crate::types::{Bond, BondOrder, MolecularGraph};

/// Kekulize a graph. Returns a graph where every aromatic bond has become
/// single or double and aromatic atom flags are cleared, or a clone of the
/// input when the aromatic system cannot be kekulized.
pub fn kekulize(graph: &MolecularGraph) -> MolecularGraph {
    let aromatic_bonds: Vec<usize> = (0..graph.bond_count())
        .filter(|&b| graph.bond(b).order == BondOrder::Aromatic)
        .collect();
    if aromatic_bonds.is_empty() {
        return graph.clone();
    }

    let needs_double = atoms_needing_double(graph);
    let mut matched = vec![false; graph.atom_count()];
    let mut chosen: Vec<usize> = Vec::new();

    if !assign(graph, &needs_double, &mut matched, &mut chosen, 0) {
        warn!("aromatic system could not be kekulized, keeping aromatic bonds");
        return graph.clone();
    }

    let bonds: Vec<Bond> = graph
        .bonds()
        .iter()
        .enumerate()
        .map(|(idx, bond)| {
            let order = if bond.order != BondOrder::Aromatic {
                bond.order
            } else if chosen.contains(&idx) {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
            Bond::new(bond.begin, bond.end, order)
        })
        .collect();

    let atoms = graph
        .atoms()
        .iter()
        .map(|atom| {
            let mut atom = atom.clone();
            atom.aromatic = false;
            atom
        })
        .collect();

    MolecularGraph::new(atoms, bonds)
}

/// Which aromatic atoms still have a free valence unit to spend on a double
/// bond. Carbon in benzene does, pyrrole-type nitrogen (with its hydrogen)
/// and furan-type oxygen do not.
fn atoms_needing_double(graph: &MolecularGraph) -> Vec<bool> {
    (0..graph.atom_count())
        .map(|idx| {
            let atom = graph.atom(idx);
            if !atom.aromatic {
                return false;
            }
            let Some(valence) = base_valence(&atom.element) else {
                return false;
            };
            let valence = (valence as i16 + atom.charge as i16).max(0) as u16;

            let mut occupied = atom.implicit_h as u16;
            for &(_, bidx) in graph.neighbors(idx) {
                let order = graph.bond(bidx).order;
                occupied += match order {
                    BondOrder::Aromatic => 1,
                    _ => order.valence_units() as u16,
                };
            }
            valence > occupied
        })
        .collect()
}

fn base_valence(element: &str) -> Option<u8> {
    match element {
        "B" => Some(3),
        "C" => Some(4),
        "N" | "P" => Some(3),
        "O" | "S" => Some(2),
        _ => None,
    }
}

/// Backtracking matcher: pair up every atom in `needs` along aromatic bonds.
fn assign(
    graph: &MolecularGraph,
    needs: &[bool],
    matched: &mut [bool],
    chosen: &mut Vec<usize>,
    from: usize,
) -> bool {
    let Some(atom) = (from..graph.atom_count()).find(|&a| needs[a] && !matched[a]) else {
        return true;
    };

    matched[atom] = true;
    for &(neighbor, bidx) in graph.neighbors(atom) {
        if graph.bond(bidx).order != BondOrder::Aromatic {
            continue;
        }
        if !needs[neighbor] || matched[neighbor] {
            continue;
        }
        matched[neighbor] = true;
        chosen.push(bidx);
        if assign(graph, needs, matched, chosen, atom + 1) {
            return true;
        }
        chosen.pop();
        matched[neighbor] = false;
    }
    matched[atom] = false;
    false
}
