//! Reasoning trace assembly.
//!
//! The trace is built from the same fragment-event stream that set the
//! fingerprint bits; it never walks the graph on its own, so trace and
//! fingerprint cannot disagree. Per radius it lists every newly observed
//! descriptor with its occurrence count, and when per-center detail is
//! requested it appends one descriptor chain per center atom under a
//! marked section.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::FragmentEvent;
use crate::types::{AtomEnvironment, MolecularGraph};

/// Separator between a descriptor and its occurrence count.
pub const COUNT_SEPARATOR: char = '\u{00D7}'; // ×
/// Separator between chain entries in the per-center section.
pub const CHAIN_ARROW: &str = " \u{2192} "; // →
/// Marker line opening the per-center section.
pub const PER_CENTER_MARKER: &str = "# per-center chains";

/// Structural size measures of one fragment, used to order descriptors
/// within a radius line from simplest to most complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentMetrics {
    /// Radius the fragment was observed at.
    pub radius: u32,
    /// Member atom count.
    pub num_atoms: u32,
    /// Member bond count.
    pub num_bonds: u32,
    /// Whether the fragment contains a ring.
    pub has_ring: bool,
    /// Non-carbon member atom count.
    pub num_hetero: u32,
    /// Whether any member bond is double, triple, or aromatic.
    pub has_unsaturation: bool,
}

impl FragmentMetrics {
    /// Measure an environment directly; cheaper and exact compared to
    /// re-parsing the serialized descriptor.
    pub fn of(graph: &MolecularGraph, env: &AtomEnvironment) -> Self {
        Self {
            radius: env.radius,
            num_atoms: env.atoms.len() as u32,
            num_bonds: env.bonds.len() as u32,
            has_ring: env.has_ring(),
            num_hetero: env.hetero_count(graph),
            has_unsaturation: env.has_unsaturation(graph),
        }
    }

    fn complexity_key(&self) -> (u32, u32, u32, u8, u32, u8) {
        (
            self.radius,
            self.num_atoms,
            self.num_bonds,
            self.has_ring as u8,
            self.num_hetero,
            self.has_unsaturation as u8,
        )
    }
}

/// Assemble the multi-line reasoning trace from the fragment events of one
/// record. Returns an empty string when there are no events.
pub fn build_trace(
    graph: &MolecularGraph,
    events: &[FragmentEvent],
    include_per_center: bool,
) -> String {
    if events.is_empty() {
        return String::new();
    }

    // radius -> descriptor -> (count, metrics)
    let mut by_radius: BTreeMap<u32, BTreeMap<&str, (u32, FragmentMetrics)>> = BTreeMap::new();
    for event in events {
        let entry = by_radius
            .entry(event.radius)
            .or_default()
            .entry(&event.descriptor)
            .or_insert((0, event.metrics));
        entry.0 += 1;
    }

    let mut lines: Vec<String> = Vec::new();
    for (radius, tokens) in &by_radius {
        let mut ordered: Vec<(&str, u32, FragmentMetrics)> = tokens
            .iter()
            .map(|(token, &(count, metrics))| (*token, count, metrics))
            .collect();
        ordered.sort_by(|a, b| {
            (a.2.complexity_key(), a.0).cmp(&(b.2.complexity_key(), b.0))
        });

        let pieces: Vec<String> = ordered
            .iter()
            .map(|(token, count, _)| format!("{token}{COUNT_SEPARATOR}{count}"))
            .collect();
        lines.push(format!("r{radius}: {}", pieces.join(", ")));
    }

    if include_per_center {
        // center -> (radius, descriptor), events already arrive in
        // ascending radius order per center.
        let mut chains: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for event in events {
            chains.entry(event.center).or_default().push(&event.descriptor);
        }
        if !chains.is_empty() {
            lines.push(String::new());
            lines.push(PER_CENTER_MARKER.to_string());
            for (center, tokens) in &chains {
                let symbol = &graph.atom(*center).element;
                lines.push(format!("{symbol}{center}: {}", tokens.join(CHAIN_ARROW)));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Atom, Bond, BondOrder};

    fn two_atom_graph() -> MolecularGraph {
        MolecularGraph::new(
            vec![Atom::new("C", 3), Atom::new("O", 1)],
            vec![Bond::new(0, 1, BondOrder::Single)],
        )
    }

    fn event(radius: u32, center: usize, descriptor: &str) -> FragmentEvent {
        FragmentEvent {
            radius,
            center,
            descriptor: descriptor.to_string(),
            bit: 0,
            metrics: FragmentMetrics {
                radius,
                num_atoms: radius + 1,
                num_bonds: radius,
                has_ring: false,
                num_hetero: 0,
                has_unsaturation: false,
            },
        }
    }

    #[test]
    fn empty_events_give_empty_trace() {
        let g = two_atom_graph();
        assert_eq!(build_trace(&g, &[], true), "");
    }

    #[test]
    fn radius_lines_count_duplicates() {
        let g = two_atom_graph();
        let events = vec![
            event(0, 0, "r0:[CH3:1]"),
            event(0, 1, "r0:[CH3:1]"),
            event(1, 0, "r1:[CH3:1]-[OH]"),
        ];
        let trace = build_trace(&g, &events, false);
        let lines: Vec<&str> = trace.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("r0: r0:[CH3:1]{COUNT_SEPARATOR}2"));
        assert_eq!(lines[1], format!("r1: r1:[CH3:1]-[OH]{COUNT_SEPARATOR}1"));
    }

    #[test]
    fn per_center_section_is_marked_and_ordered() {
        let g = two_atom_graph();
        let events = vec![
            event(0, 0, "r0:[CH3:1]"),
            event(1, 0, "r1:[CH3:1]-[OH]"),
            event(0, 1, "r0:[OH:1]"),
        ];
        let trace = build_trace(&g, &events, true);
        let lines: Vec<&str> = trace.lines().collect();
        let marker = lines
            .iter()
            .position(|l| *l == PER_CENTER_MARKER)
            .expect("marker line present");
        assert_eq!(lines[marker - 1], "", "blank line precedes the marker");
        assert_eq!(
            lines[marker + 1],
            format!("C0: r0:[CH3:1]{CHAIN_ARROW}r1:[CH3:1]-[OH]")
        );
        assert_eq!(lines[marker + 2], "O1: r0:[OH:1]");
    }

    #[test]
    fn simpler_fragments_sort_first_within_a_radius() {
        let g = two_atom_graph();
        let mut big = event(1, 0, "r1:big");
        big.metrics.num_atoms = 5;
        big.metrics.num_bonds = 4;
        let small = event(1, 1, "r1:small");
        let trace = build_trace(&g, &[big, small], false);
        let line = trace.lines().next().unwrap();
        let small_pos = line.find("r1:small").unwrap();
        let big_pos = line.find("r1:big").unwrap();
        assert!(small_pos < big_pos);
    }
}
