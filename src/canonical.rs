//! Canonical fragment descriptors.
//!
//! Maps an atom environment to a SMARTS-like string that is invariant to
//! the atom-id numbering assigned by the graph provider.
//!
//! ## Determinism guarantees
//!
//! - Atom order inside a descriptor comes from an invariant ranking
//!   (element, in-environment degree, charge, aromaticity, hydrogen count,
//!   isotope, and chirality parity in isomeric mode), refined iteratively
//!   by neighbor ranks until the partition stabilizes.
//! - Remaining ties can only separate automorphic atoms, so the final
//!   atom-id tie-break never changes the serialized string.
//! - Running the canonicalization twice on isomorphic environments with
//!   different atom numbering yields identical strings.

use crate::types::{Atom, AtomEnvironment, BondOrder, ChiralSlot, Chirality, MolecularGraph};

/// Canonical descriptor for one atom environment. The center atom carries
/// the `:1` root marker so a fragment is distinguishable from the same
/// subgraph rooted elsewhere.
pub fn fragment_descriptor(
    graph: &MolecularGraph,
    env: &AtomEnvironment,
    isomeric: bool,
) -> String {
    let view = LocalView::from_environment(graph, env);
    let ranks = canonical_ranks(&view, isomeric);
    let start = view.local_of(env.center);
    serialize(&view, &ranks, start, Some(start), isomeric)
}

/// Canonical-form string for a whole molecule. Disconnected components are
/// serialized independently, sorted, and joined with `.`.
pub fn canonical_molecule(graph: &MolecularGraph) -> String {
    let mut pieces: Vec<String> = components(graph)
        .into_iter()
        .map(|atoms| {
            let bonds: Vec<usize> = (0..graph.bond_count())
                .filter(|&b| atoms.binary_search(&graph.bond(b).begin).is_ok())
                .collect();
            let env = AtomEnvironment {
                center: atoms[0],
                radius: 0,
                atoms,
                bonds,
            };
            let view = LocalView::from_environment(graph, &env);
            let ranks = canonical_ranks(&view, false);
            let start = (0..view.len())
                .min_by_key(|&i| (ranks[i], view.global_of(i)))
                .unwrap_or(0);
            serialize(&view, &ranks, start, None, false)
        })
        .collect();
    pieces.sort();
    pieces.join(".")
}

/// Rewrite chirality marks so their parity is relative to an invariant
/// neighbor order instead of the order the input happened to be written in.
/// Written parity depends on branch order, so `C[C@H](N)O` and
/// `C[C@@H](O)N` describe the same stereocenter; after this pass both store
/// the same mark. A chiral atom whose neighbors cannot be told apart loses
/// the mark: its parity carries no information.
pub fn normalize_parity(graph: &MolecularGraph) -> MolecularGraph {
    if graph.atoms().iter().all(|a| a.chirality.is_none()) {
        return graph.clone();
    }

    let whole = AtomEnvironment {
        center: 0,
        radius: 0,
        atoms: (0..graph.atom_count()).collect(),
        bonds: (0..graph.bond_count()).collect(),
    };
    let view = LocalView::from_environment(graph, &whole);
    let ranks = canonical_ranks(&view, false);

    let atoms = graph
        .atoms()
        .iter()
        .enumerate()
        .map(|(idx, atom)| {
            let mut atom = atom.clone();
            if let (Some(mark), Some(written)) = (atom.chirality, atom.neighbor_order.take()) {
                atom.chirality = normalized_mark(graph, &ranks, idx, mark, &written);
            }
            atom
        })
        .collect();
    MolecularGraph::new(atoms, graph.bonds().to_vec())
}

/// Parity of the written slot order against the rank-sorted reference
/// order: an odd permutation flips the mark.
fn normalized_mark(
    graph: &MolecularGraph,
    ranks: &[usize],
    atom_idx: usize,
    mark: Chirality,
    written: &[ChiralSlot],
) -> Option<Chirality> {
    // The implicit hydrogen sorts before every ranked neighbor.
    let key = |slot: &ChiralSlot| -> i64 {
        match slot {
            ChiralSlot::ImplicitH => -1,
            ChiralSlot::Bond(b) => ranks[graph.bond(*b).other(atom_idx)] as i64,
        }
    };

    let mut reference = written.to_vec();
    reference.sort_by_key(key);
    if reference.windows(2).any(|pair| key(&pair[0]) == key(&pair[1])) {
        return None;
    }

    let positions: Vec<usize> = written
        .iter()
        .map(|slot| {
            reference
                .iter()
                .position(|r| r == slot)
                .expect("reference is a permutation of the written order")
        })
        .collect();
    let mut inversions = 0usize;
    for i in 0..positions.len() {
        for j in i + 1..positions.len() {
            if positions[i] > positions[j] {
                inversions += 1;
            }
        }
    }

    Some(if inversions % 2 == 0 { mark } else { mark.flipped() })
}

/// Connected components as sorted global atom-index lists, ordered by their
/// smallest member.
fn components(graph: &MolecularGraph) -> Vec<Vec<usize>> {
    let mut seen = vec![false; graph.atom_count()];
    let mut result = Vec::new();
    for start in 0..graph.atom_count() {
        if seen[start] {
            continue;
        }
        let mut stack = vec![start];
        let mut members = Vec::new();
        seen[start] = true;
        while let Some(atom) = stack.pop() {
            members.push(atom);
            for &(neighbor, _) in graph.neighbors(atom) {
                if !seen[neighbor] {
                    seen[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }
        members.sort_unstable();
        result.push(members);
    }
    result
}

/// An environment projected onto local indices with restricted adjacency.
struct LocalView<'a> {
    graph: &'a MolecularGraph,
    /// Local index -> global atom index (sorted ascending).
    atoms: Vec<usize>,
    /// Per local atom: `(local neighbor, global bond index)`, sorted.
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl<'a> LocalView<'a> {
    fn from_environment(graph: &'a MolecularGraph, env: &AtomEnvironment) -> Self {
        let atoms = env.atoms.clone();
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for &bidx in &env.bonds {
            let bond = graph.bond(bidx);
            let (Ok(a), Ok(b)) = (
                atoms.binary_search(&bond.begin),
                atoms.binary_search(&bond.end),
            ) else {
                continue;
            };
            adjacency[a].push((b, bidx));
            adjacency[b].push((a, bidx));
        }
        for entry in &mut adjacency {
            entry.sort_unstable();
        }
        Self {
            graph,
            atoms,
            adjacency,
        }
    }

    fn len(&self) -> usize {
        self.atoms.len()
    }

    fn global_of(&self, local: usize) -> usize {
        self.atoms[local]
    }

    fn local_of(&self, global: usize) -> usize {
        self.atoms
            .binary_search(&global)
            .expect("environment center must be a member atom")
    }

    fn atom(&self, local: usize) -> &Atom {
        self.graph.atom(self.atoms[local])
    }

    fn bond_order(&self, bidx: usize) -> BondOrder {
        self.graph.bond(bidx).order
    }
}

/// Initial invariant for one atom within its environment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct AtomInvariant {
    element: String,
    degree: usize,
    charge: i8,
    aromatic: bool,
    hydrogens: u8,
    isotope: Option<u16>,
    parity: Option<u8>,
}

fn canonical_ranks(view: &LocalView<'_>, isomeric: bool) -> Vec<usize> {
    let initial: Vec<AtomInvariant> = (0..view.len())
        .map(|i| {
            let atom = view.atom(i);
            AtomInvariant {
                element: atom.element.clone(),
                degree: view.adjacency[i].len(),
                charge: atom.charge,
                aromatic: atom.aromatic,
                hydrogens: atom.implicit_h,
                isotope: atom.isotope,
                parity: if isomeric {
                    atom.chirality.map(|c| c as u8)
                } else {
                    None
                },
            }
        })
        .collect();
    let mut ranks = dense_ranks(&initial);

    // Morgan-style relaxation: fold sorted neighbor (bond, rank) multisets
    // into each rank until the partition stops splitting.
    for _ in 0..view.len() {
        let refined: Vec<(usize, Vec<(u8, usize)>)> = (0..view.len())
            .map(|i| {
                let mut neighbors: Vec<(u8, usize)> = view.adjacency[i]
                    .iter()
                    .map(|&(n, b)| (view.bond_order(b).rank(), ranks[n]))
                    .collect();
                neighbors.sort_unstable();
                (ranks[i], neighbors)
            })
            .collect();
        let next = dense_ranks(&refined);
        if distinct_count(&next) == distinct_count(&ranks) {
            break;
        }
        ranks = next;
    }

    ranks
}

fn dense_ranks<K: Ord + Clone>(keys: &[K]) -> Vec<usize> {
    let mut unique: Vec<K> = keys.to_vec();
    unique.sort();
    unique.dedup();
    keys.iter()
        .map(|k| {
            unique
                .binary_search(k)
                .expect("key must be present in its own unique set")
        })
        .collect()
}

fn distinct_count(ranks: &[usize]) -> usize {
    let mut seen: Vec<usize> = ranks.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Serialize the view as a SMARTS-like pattern by deterministic DFS from
/// `start`, visiting neighbors in `(rank, global id)` order. `root` marks
/// one atom with the `:1` map tag.
fn serialize(
    view: &LocalView<'_>,
    ranks: &[usize],
    start: usize,
    root: Option<usize>,
    isomeric: bool,
) -> String {
    let n = view.len();
    let mut visited = vec![false; n];
    let mut bond_used = vec![false; view.graph.bond_count()];
    let mut children: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    let mut closures: Vec<Vec<(u32, usize)>> = vec![Vec::new(); n];
    let mut next_closure = 0u32;

    // Pass 1: discover the spanning tree in emission order and number ring
    // closures as they are encountered.
    visited[start] = true;
    discover(
        view,
        ranks,
        start,
        &mut visited,
        &mut bond_used,
        &mut children,
        &mut closures,
        &mut next_closure,
    );

    // Pass 2: emit.
    let mut out = String::new();
    emit(view, &children, &closures, start, root, isomeric, &mut out);
    out
}

#[allow(clippy::too_many_arguments)]
fn discover(
    view: &LocalView<'_>,
    ranks: &[usize],
    atom: usize,
    visited: &mut [bool],
    bond_used: &mut [bool],
    children: &mut [Vec<(usize, usize)>],
    closures: &mut [Vec<(u32, usize)>],
    next_closure: &mut u32,
) {
    let mut ordered: Vec<(usize, usize)> = view.adjacency[atom].to_vec();
    ordered.sort_by_key(|&(n, _)| (ranks[n], view.global_of(n)));
    for (neighbor, bidx) in ordered {
        if bond_used[bidx] {
            continue;
        }
        bond_used[bidx] = true;
        if visited[neighbor] {
            *next_closure += 1;
            closures[atom].push((*next_closure, bidx));
            closures[neighbor].push((*next_closure, bidx));
        } else {
            visited[neighbor] = true;
            children[atom].push((neighbor, bidx));
            discover(
                view,
                ranks,
                neighbor,
                visited,
                bond_used,
                children,
                closures,
                next_closure,
            );
        }
    }
}

fn emit(
    view: &LocalView<'_>,
    children: &[Vec<(usize, usize)>],
    closures: &[Vec<(u32, usize)>],
    atom: usize,
    root: Option<usize>,
    isomeric: bool,
    out: &mut String,
) {
    out.push_str(&atom_token(view.atom(atom), root == Some(atom), isomeric));
    for &(number, bidx) in &closures[atom] {
        out.push_str(view.bond_order(bidx).symbol());
        if number > 9 {
            out.push('%');
        }
        out.push_str(&number.to_string());
    }
    let kids = &children[atom];
    for (i, &(child, bidx)) in kids.iter().enumerate() {
        let last = i + 1 == kids.len();
        if !last {
            out.push('(');
        }
        out.push_str(view.bond_order(bidx).symbol());
        emit(view, children, closures, child, root, isomeric, out);
        if !last {
            out.push(')');
        }
    }
}

fn atom_token(atom: &Atom, is_root: bool, isomeric: bool) -> String {
    let mut token = String::from("[");
    if let Some(isotope) = atom.isotope {
        token.push_str(&isotope.to_string());
    }
    if atom.aromatic {
        token.push_str(&atom.element.to_lowercase());
    } else {
        token.push_str(&atom.element);
    }
    if isomeric {
        if let Some(chirality) = atom.chirality {
            token.push_str(chirality.symbol());
        }
    }
    match atom.implicit_h {
        0 => {}
        1 => token.push('H'),
        n => {
            token.push('H');
            token.push_str(&n.to_string());
        }
    }
    match atom.charge {
        0 => {}
        1 => token.push('+'),
        -1 => token.push('-'),
        c if c > 0 => token.push_str(&format!("+{c}")),
        c => token.push_str(&format!("-{}", -c)),
    }
    if is_root {
        token.push_str(":1");
    }
    token.push(']');
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::environments_of;
    use crate::provider::smiles::parse_smiles;

    fn descriptor(smiles: &str, center: usize, radius: u32) -> String {
        let g = parse_smiles(smiles).unwrap();
        let envs = environments_of(&g, center, radius);
        fragment_descriptor(&g, &envs[radius as usize], true)
    }

    #[test]
    fn radius_zero_tokens() {
        assert_eq!(descriptor("CCO", 0, 0), "[CH3:1]");
        assert_eq!(descriptor("CCO", 1, 0), "[CH2:1]");
        assert_eq!(descriptor("CCO", 2, 0), "[OH:1]");
    }

    #[test]
    fn neighbors_ordered_by_rank_not_input_order() {
        // Middle carbon of ethanol: carbon child before oxygen child,
        // regardless of which side was written first.
        assert_eq!(descriptor("CCO", 1, 1), descriptor("OCC", 1, 1));
        assert!(descriptor("CCO", 1, 1).contains("[CH2:1]"));
    }

    #[test]
    fn relabeling_invariance_across_notations() {
        // Terminal CH3 of ethanol written two ways: atom ids differ (0 vs
        // 2) but the environment is isomorphic.
        assert_eq!(descriptor("CCO", 0, 2), descriptor("OCC", 2, 2));
        assert_eq!(descriptor("CCO", 2, 1), descriptor("OCC", 0, 1));
    }

    #[test]
    fn aromatic_atoms_serialize_lowercase() {
        let d = descriptor("c1ccccc1", 0, 1);
        assert!(d.contains("[cH:1]"));
        assert!(d.contains(':'), "aromatic bond marker expected: {d}");
    }

    #[test]
    fn ring_closure_digits_appear() {
        let d = descriptor("C1CC1", 0, 2);
        assert!(d.contains('1'), "cyclopropane closure expected: {d}");
    }

    #[test]
    fn charge_and_isotope_in_tokens() {
        assert_eq!(descriptor("[NH4+]", 0, 0), "[NH4+:1]");
        assert_eq!(descriptor("[13CH4]", 0, 0), "[13CH4:1]");
    }

    #[test]
    fn chirality_only_in_isomeric_mode() {
        let g = parse_smiles("C[C@H](N)O").unwrap();
        let envs = environments_of(&g, 1, 0);
        let iso = fragment_descriptor(&g, &envs[0], true);
        let plain = fragment_descriptor(&g, &envs[0], false);
        // The emitted mark is the normalized one: written `@` is relative
        // to [C, H, N, O] written order, which is one swap away from the
        // [H, C, N, O] reference order.
        assert_eq!(iso, "[C@@H:1]");
        assert_eq!(plain, "[CH:1]");
    }

    #[test]
    fn stereo_marks_are_notation_invariant() {
        // Same stereoisomer, branches written in swapped order.
        for radius in 0..=2 {
            assert_eq!(
                descriptor("C[C@H](N)O", 1, radius),
                descriptor("C[C@@H](O)N", 1, radius)
            );
        }
        // Opposite stereoisomers stay apart.
        assert_ne!(
            descriptor("C[C@H](N)O", 1, 0),
            descriptor("C[C@@H](N)O", 1, 0)
        );
    }

    #[test]
    fn canonical_molecule_is_notation_independent() {
        let a = canonical_molecule(&parse_smiles("CCO").unwrap());
        let b = canonical_molecule(&parse_smiles("OCC").unwrap());
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn canonical_molecule_sorts_components() {
        let a = canonical_molecule(&parse_smiles("CC.O").unwrap());
        let b = canonical_molecule(&parse_smiles("O.CC").unwrap());
        assert_eq!(a, b);
        assert!(a.contains('.'));
    }
}
