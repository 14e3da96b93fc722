//! Bounded-radius environment enumeration.
//!
//! For every atom `a` and every radius `0..=R`, produce the induced
//! subgraph reachable within that many bond steps. Expansion is
//! breadth-first by bond distance: `env(a, r)` contains every atom at
//! distance at most `r` and every bond whose nearer endpoint is at
//! distance at most `r - 1`. A ring-closure bond between two atoms both at
//! distance `r` therefore joins one radius later, when the traversal
//! actually crosses it.
//!
//! An atom with nothing left to reach at radius `r` yields an environment
//! identical to the one at `r - 1`. The duplicate is still forwarded;
//! downstream detects it by descriptor equality and reports no new
//! fragment.

use crate::types::{AtomEnvironment, MolecularGraph};

/// Enumerate `env(a, 0..=radius)` for every atom of the graph. The outer
/// vector is indexed by atom, the inner by radius.
pub fn enumerate_environments(
    graph: &MolecularGraph,
    radius: u32,
) -> Vec<Vec<AtomEnvironment>> {
    (0..graph.atom_count())
        .map(|center| environments_of(graph, center, radius))
        .collect()
}

/// Enumerate the environment sequence for one center atom.
pub fn environments_of(
    graph: &MolecularGraph,
    center: usize,
    radius: u32,
) -> Vec<AtomEnvironment> {
    let dist = bond_distances(graph, center, radius);
    let mut envs = Vec::with_capacity(radius as usize + 1);

    for r in 0..=radius {
        let atoms: Vec<usize> = (0..graph.atom_count())
            .filter(|&a| dist[a].is_some_and(|d| d <= r))
            .collect();
        let bonds: Vec<usize> = if r == 0 {
            Vec::new()
        } else {
            (0..graph.bond_count())
                .filter(|&b| {
                    let bond = graph.bond(b);
                    match (dist[bond.begin], dist[bond.end]) {
                        (Some(da), Some(db)) => da.min(db) <= r - 1,
                        _ => false,
                    }
                })
                .collect()
        };
        envs.push(AtomEnvironment {
            center,
            radius: r,
            atoms,
            bonds,
        });
    }

    envs
}

/// Bond distances from `center`, bounded by `radius`. Atoms beyond the
/// bound (or in other fragments) are `None`.
fn bond_distances(graph: &MolecularGraph, center: usize, radius: u32) -> Vec<Option<u32>> {
    let mut dist = vec![None; graph.atom_count()];
    dist[center] = Some(0);
    let mut frontier = vec![center];

    for step in 1..=radius {
        let mut next = Vec::new();
        for &atom in &frontier {
            for &(neighbor, _) in graph.neighbors(atom) {
                if dist[neighbor].is_none() {
                    dist[neighbor] = Some(step);
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    dist
}
