//! Scalar descriptor pass-throughs.
//!
//! Plain additive contribution schemes over the parsed graph: molecular
//! weight from standard atomic weights, partition coefficient from
//! per-atom-class contributions in the Wildman-Crippen spirit, polar
//! surface area from Ertl-style nitrogen/oxygen contributions. These are
//! deliberately simple call-throughs; all interesting design lives in the
//! fingerprint core.

use crate::types::{BondOrder, MolecularGraph};

/// Standard atomic weight of a hydrogen atom.
const HYDROGEN_WEIGHT: f64 = 1.008;

fn atomic_weight(element: &str) -> f64 {
    match element {
        "H" => 1.008,
        "B" => 10.811,
        "C" => 12.011,
        "N" => 14.007,
        "O" => 15.999,
        "F" => 18.998,
        "Na" => 22.990,
        "Mg" => 24.305,
        "Al" => 26.982,
        "Si" => 28.086,
        "P" => 30.974,
        "S" => 32.066,
        "Cl" => 35.453,
        "K" => 39.098,
        "Ca" => 40.078,
        "Fe" => 55.845,
        "Cu" => 63.546,
        "Zn" => 65.38,
        "As" => 74.922,
        "Se" => 78.971,
        "Br" => 79.904,
        "Ag" => 107.868,
        "Sn" => 118.710,
        "I" => 126.904,
        "Pt" => 195.084,
        "Au" => 196.967,
        "Hg" => 200.592,
        "Pb" => 207.2,
        _ => 0.0,
    }
}

/// Molecular weight: heavy atoms plus implicit hydrogens.
pub fn molecular_weight(graph: &MolecularGraph) -> f64 {
    graph
        .atoms()
        .iter()
        .map(|atom| atomic_weight(&atom.element) + atom.implicit_h as f64 * HYDROGEN_WEIGHT)
        .sum()
}

/// Partition coefficient (logP) from per-atom contributions.
pub fn partition_coefficient(graph: &MolecularGraph) -> f64 {
    graph
        .atoms()
        .iter()
        .map(|atom| match (atom.element.as_str(), atom.aromatic) {
            ("C", false) => 0.20,
            ("C", true) => 0.29,
            ("N", _) => -0.60,
            ("O", _) => -0.41,
            ("S", _) => 0.62,
            ("P", _) => -0.20,
            ("F", _) => 0.21,
            ("Cl", _) => 0.63,
            ("Br", _) => 0.85,
            ("I", _) => 1.10,
            _ => 0.0,
        })
        .sum()
}

/// Polar surface area from nitrogen/oxygen contributions, distinguished by
/// hydrogen count, aromaticity, and double-bond involvement.
pub fn polar_surface_area(graph: &MolecularGraph) -> f64 {
    let mut area = 0.0;
    for (idx, atom) in graph.atoms().iter().enumerate() {
        let has_double = graph
            .neighbors(idx)
            .iter()
            .any(|&(_, b)| graph.bond(b).order == BondOrder::Double);
        area += match atom.element.as_str() {
            "O" => match (atom.aromatic, atom.implicit_h > 0, has_double) {
                (true, _, _) => 13.14,
                (false, true, _) => 20.23,
                (false, false, true) => 17.07,
                (false, false, false) => 9.23,
            },
            "N" => match (atom.aromatic, atom.implicit_h) {
                (true, 0) => 12.89,
                (true, _) => 15.79,
                (false, 0) => 3.24,
                (false, 1) => 12.03,
                (false, _) => 26.02,
            },
            _ => 0.0,
        };
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::smiles::parse_smiles;

    #[test]
    fn ethanol_weight() {
        let g = parse_smiles("CCO").unwrap();
        assert!((molecular_weight(&g) - 46.07).abs() < 0.05);
    }

    #[test]
    fn benzene_weight() {
        let g = parse_smiles("c1ccccc1").unwrap();
        assert!((molecular_weight(&g) - 78.11).abs() < 0.05);
    }

    #[test]
    fn octane_more_lipophilic_than_ethanol() {
        let octane = parse_smiles("CCCCCCCC").unwrap();
        let ethanol = parse_smiles("CCO").unwrap();
        assert!(partition_coefficient(&octane) > partition_coefficient(&ethanol));
    }

    #[test]
    fn ethanol_hydroxyl_surface() {
        let g = parse_smiles("CCO").unwrap();
        assert!((polar_surface_area(&g) - 20.23).abs() < 1e-9);
    }

    #[test]
    fn butane_has_no_polar_surface() {
        let g = parse_smiles("CCCC").unwrap();
        assert_eq!(polar_surface_area(&g), 0.0);
    }

    #[test]
    fn acetic_acid_counts_both_oxygens() {
        let g = parse_smiles("CC(=O)O").unwrap();
        assert!((polar_surface_area(&g) - (17.07 + 20.23)).abs() < 1e-9);
    }
}
