//! SMILES parsing into a [`MolecularGraph`].
//!
//! Covers the subset that matters for fingerprinting drug-like molecules:
//! the organic subset (`B C N O P S F Cl Br I`), aromatic lowercase atoms,
//! bracket atoms with isotope, chirality, explicit hydrogens and charge,
//! branches, single/double/triple/aromatic bonds, ring closures (including
//! `%nn`), and dot-separated disconnected fragments. Implicit hydrogens are
//! assigned from default valences; aromatic atoms reserve one valence unit
//! for the delocalized system.

use std::collections::BTreeMap;

use crate::canonical::normalize_parity;
use crate::provider::ParseError;
use crate::types::{Atom, Bond, BondOrder, ChiralSlot, Chirality, MolecularGraph};

/// Elements accepted inside bracket atoms.
const BRACKET_ELEMENTS: &[&str] = &[
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Ti", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "As", "Se", "Br", "Ag", "Cd",
    "Sn", "Sb", "Te", "I", "Pt", "Au", "Hg", "Pb", "Bi",
];

/// Default valence for implicit-hydrogen assignment. Elements outside this
/// table never receive implicit hydrogens.
fn default_valence(element: &str) -> Option<u8> {
    match element {
        "B" => Some(3),
        "C" => Some(4),
        "N" => Some(3),
        "O" => Some(2),
        "F" | "Cl" | "Br" | "I" => Some(1),
        "P" => Some(3),
        "S" => Some(2),
        _ => None,
    }
}

/// Parse one SMILES string. Empty or whitespace-only input is a parse
/// failure, matching the validity contract for blank records.
pub fn parse_smiles(text: &str) -> Result<MolecularGraph, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut parser = Parser::new(&chars);
    parser.run()?;
    let graph = parser.finish()?;
    Ok(normalize_parity(&graph))
}

/// Neighbor slot as recorded during parsing; ring placeholders are patched
/// to bonds when the closure resolves.
#[derive(Clone, Copy, PartialEq)]
enum SlotRec {
    ImplicitH,
    Bond(usize),
    Ring(u32),
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    atoms: Vec<Atom>,
    /// Whether the atom was written in bracket form (explicit H count).
    explicit: Vec<bool>,
    bonds: Vec<Bond>,
    /// Per atom, the neighbor slots in written order. Parity marks are
    /// interpreted against this order.
    slots: Vec<Vec<SlotRec>>,
    prev: Option<usize>,
    pending: Option<BondOrder>,
    branch_stack: Vec<Option<usize>>,
    /// Open ring closures: number -> (atom, bond order written at opening).
    /// BTreeMap so leftover reporting is deterministic.
    ring_open: BTreeMap<u32, (usize, Option<BondOrder>)>,
}

impl<'a> Parser<'a> {
    fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: 0,
            atoms: Vec::new(),
            explicit: Vec::new(),
            bonds: Vec::new(),
            slots: Vec::new(),
            prev: None,
            pending: None,
            branch_stack: Vec::new(),
            ring_open: BTreeMap::new(),
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            match c {
                '(' => {
                    self.branch_stack.push(self.prev);
                    self.pos += 1;
                }
                ')' => {
                    self.prev = self
                        .branch_stack
                        .pop()
                        .ok_or(ParseError::UnbalancedBranch)?;
                    self.pos += 1;
                }
                '-' => self.set_pending(BondOrder::Single)?,
                '=' => self.set_pending(BondOrder::Double)?,
                '#' => self.set_pending(BondOrder::Triple)?,
                ':' => self.set_pending(BondOrder::Aromatic)?,
                // Directional bonds collapse to single; bond stereo is out
                // of the supported labeling scheme.
                '/' | '\\' => self.set_pending(BondOrder::Single)?,
                '.' => {
                    if self.pending.is_some() {
                        return Err(ParseError::DanglingBond);
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                '%' => {
                    let number = self.read_two_digit_ring()?;
                    self.close_or_open_ring(number)?;
                }
                '0'..='9' => {
                    self.pos += 1;
                    self.close_or_open_ring(c as u32 - '0' as u32)?;
                }
                '[' => {
                    let atom = self.read_bracket_atom()?;
                    self.push_atom(atom, true)?;
                }
                _ if c.is_ascii_uppercase() => {
                    let atom = self.read_organic_atom()?;
                    self.push_atom(atom, false)?;
                }
                _ if c.is_ascii_lowercase() => {
                    let atom = self.read_aromatic_atom()?;
                    self.push_atom(atom, false)?;
                }
                _ => return Err(ParseError::UnexpectedChar(c, self.pos)),
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<MolecularGraph, ParseError> {
        if self.pending.is_some() {
            return Err(ParseError::DanglingBond);
        }
        if let Some((&number, _)) = self.ring_open.iter().next() {
            return Err(ParseError::UnmatchedRingClosure(number));
        }
        if !self.branch_stack.is_empty() {
            return Err(ParseError::UnbalancedBranch);
        }
        if self.atoms.is_empty() {
            return Err(ParseError::Empty);
        }

        self.assign_implicit_hydrogens();

        for (idx, slots) in self.slots.iter().enumerate() {
            if self.atoms[idx].chirality.is_none() {
                continue;
            }
            // Open rings were rejected above, so only bonds and the
            // hydrogen slot remain.
            let order: Vec<ChiralSlot> = slots
                .iter()
                .filter_map(|slot| match slot {
                    SlotRec::ImplicitH => Some(ChiralSlot::ImplicitH),
                    SlotRec::Bond(b) => Some(ChiralSlot::Bond(*b)),
                    SlotRec::Ring(_) => None,
                })
                .collect();
            self.atoms[idx].neighbor_order = Some(order);
        }

        Ok(MolecularGraph::new(self.atoms, self.bonds))
    }

    fn set_pending(&mut self, order: BondOrder) -> Result<(), ParseError> {
        if self.prev.is_none() || self.pending.is_some() {
            return Err(ParseError::DanglingBond);
        }
        self.pending = Some(order);
        self.pos += 1;
        Ok(())
    }

    fn push_atom(&mut self, atom: Atom, explicit: bool) -> Result<(), ParseError> {
        let idx = self.atoms.len();
        // Bracket hydrogens occupy the slot right after the preceding atom.
        let has_h_slot = explicit && atom.implicit_h > 0;
        self.atoms.push(atom);
        self.explicit.push(explicit);
        self.slots.push(Vec::new());

        if let Some(prev) = self.prev {
            let order = self
                .pending
                .take()
                .unwrap_or_else(|| self.implied_order(prev, idx));
            let bidx = self.bonds.len();
            self.bonds.push(Bond::new(prev, idx, order));
            self.slots[prev].push(SlotRec::Bond(bidx));
            self.slots[idx].push(SlotRec::Bond(bidx));
        } else if self.pending.is_some() {
            return Err(ParseError::DanglingBond);
        }
        if has_h_slot {
            self.slots[idx].push(SlotRec::ImplicitH);
        }

        self.prev = Some(idx);
        Ok(())
    }

    /// Bond order when none is written: aromatic between two aromatic atoms,
    /// single otherwise.
    fn implied_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn close_or_open_ring(&mut self, number: u32) -> Result<(), ParseError> {
        let current = self.prev.ok_or(ParseError::DanglingBond)?;
        match self.ring_open.remove(&number) {
            Some((partner, opening_order)) => {
                if partner == current {
                    return Err(ParseError::UnmatchedRingClosure(number));
                }
                let closing_order = self.pending.take();
                let order = match (opening_order, closing_order) {
                    (Some(open), Some(close)) if open != close => {
                        return Err(ParseError::ConflictingRingBond(number));
                    }
                    (Some(open), _) => open,
                    (None, Some(close)) => close,
                    (None, None) => self.implied_order(partner, current),
                };
                let bidx = self.bonds.len();
                self.bonds.push(Bond::new(partner, current, order));
                // The digit at the opening atom reserved a slot there.
                for slot in &mut self.slots[partner] {
                    if *slot == SlotRec::Ring(number) {
                        *slot = SlotRec::Bond(bidx);
                        break;
                    }
                }
                self.slots[current].push(SlotRec::Bond(bidx));
            }
            None => {
                self.ring_open
                    .insert(number, (current, self.pending.take()));
                self.slots[current].push(SlotRec::Ring(number));
            }
        }
        Ok(())
    }

    fn read_two_digit_ring(&mut self) -> Result<u32, ParseError> {
        let start = self.pos;
        self.pos += 1; // consume '%'
        let mut number = 0u32;
        let mut digits = 0;
        while digits < 2 {
            match self.chars.get(self.pos) {
                Some(c) if c.is_ascii_digit() => {
                    number = number * 10 + (*c as u32 - '0' as u32);
                    self.pos += 1;
                    digits += 1;
                }
                _ => return Err(ParseError::UnexpectedChar('%', start)),
            }
        }
        Ok(number)
    }

    fn read_organic_atom(&mut self) -> Result<Atom, ParseError> {
        let start = self.pos;
        let first = self.chars[self.pos];
        self.pos += 1;

        // Two-letter organic-subset symbols.
        let symbol = if first == 'C' && self.chars.get(self.pos) == Some(&'l') {
            self.pos += 1;
            "Cl".to_string()
        } else if first == 'B' && self.chars.get(self.pos) == Some(&'r') {
            self.pos += 1;
            "Br".to_string()
        } else {
            first.to_string()
        };

        match symbol.as_str() {
            "B" | "C" | "N" | "O" | "P" | "S" | "F" | "Cl" | "Br" | "I" => {
                Ok(Atom::new(symbol, 0))
            }
            _ => Err(ParseError::UnexpectedChar(first, start)),
        }
    }

    fn read_aromatic_atom(&mut self) -> Result<Atom, ParseError> {
        let c = self.chars[self.pos];
        let symbol = match c {
            'b' => "B",
            'c' => "C",
            'n' => "N",
            'o' => "O",
            'p' => "P",
            's' => "S",
            _ => return Err(ParseError::UnexpectedChar(c, self.pos)),
        };
        self.pos += 1;
        let mut atom = Atom::new(symbol, 0);
        atom.aromatic = true;
        Ok(atom)
    }

    fn read_bracket_atom(&mut self) -> Result<Atom, ParseError> {
        let open = self.pos;
        self.pos += 1; // consume '['

        let mut end = self.pos;
        while end < self.chars.len() && self.chars[end] != ']' {
            end += 1;
        }
        if end >= self.chars.len() {
            return Err(ParseError::UnclosedBracket(open));
        }
        let content: Vec<char> = self.chars[self.pos..end].to_vec();
        self.pos = end + 1;

        parse_bracket_content(&content, open)
    }

    /// Implicit hydrogens for organic-subset atoms: default valence minus
    /// bond valence units, with one unit reserved on aromatic atoms for the
    /// delocalized system. Bracket atoms keep their explicit count.
    fn assign_implicit_hydrogens(&mut self) {
        let mut used = vec![0u8; self.atoms.len()];
        for bond in &self.bonds {
            used[bond.begin] = used[bond.begin].saturating_add(bond.order.valence_units());
            used[bond.end] = used[bond.end].saturating_add(bond.order.valence_units());
        }
        for (idx, atom) in self.atoms.iter_mut().enumerate() {
            if self.explicit[idx] {
                continue;
            }
            let Some(valence) = default_valence(&atom.element) else {
                continue;
            };
            let mut occupied = used[idx];
            if atom.aromatic {
                occupied = occupied.saturating_add(1);
            }
            atom.implicit_h = valence.saturating_sub(occupied);
        }
    }
}

fn parse_bracket_content(content: &[char], open: usize) -> Result<Atom, ParseError> {
    let mut i = 0;

    // Isotope.
    let mut isotope: Option<u16> = None;
    let mut isotope_value = 0u16;
    let mut saw_isotope = false;
    while i < content.len() && content[i].is_ascii_digit() {
        isotope_value = isotope_value
            .saturating_mul(10)
            .saturating_add(content[i] as u16 - '0' as u16);
        saw_isotope = true;
        i += 1;
    }
    if saw_isotope {
        isotope = Some(isotope_value);
    }

    // Element symbol; lowercase first letter marks an aromatic atom.
    let (symbol, aromatic) = match content.get(i) {
        Some(&c) if c.is_ascii_uppercase() => {
            let mut symbol = c.to_string();
            i += 1;
            if let Some(&next) = content.get(i) {
                if next.is_ascii_lowercase() && BRACKET_ELEMENTS.contains(&format!("{c}{next}").as_str())
                {
                    symbol.push(next);
                    i += 1;
                }
            }
            (symbol, false)
        }
        Some(&c) if c.is_ascii_lowercase() => {
            let symbol = match c {
                'b' => "B",
                'c' => "C",
                'n' => "N",
                'o' => "O",
                'p' => "P",
                's' => "S",
                _ => return Err(ParseError::UnknownElement(c.to_string())),
            };
            i += 1;
            (symbol.to_string(), true)
        }
        _ => return Err(ParseError::UnclosedBracket(open)),
    };
    if !BRACKET_ELEMENTS.contains(&symbol.as_str()) {
        return Err(ParseError::UnknownElement(symbol));
    }

    // Chirality.
    let mut chirality = None;
    if content.get(i) == Some(&'@') {
        i += 1;
        if content.get(i) == Some(&'@') {
            i += 1;
            chirality = Some(Chirality::Clockwise);
        } else {
            chirality = Some(Chirality::Anticlockwise);
        }
    }

    // Explicit hydrogen count.
    let mut hydrogens = 0u8;
    if content.get(i) == Some(&'H') {
        i += 1;
        let mut count = 0u8;
        let mut saw_digit = false;
        while let Some(&c) = content.get(i) {
            if c.is_ascii_digit() {
                count = count.saturating_mul(10).saturating_add(c as u8 - b'0');
                saw_digit = true;
                i += 1;
            } else {
                break;
            }
        }
        hydrogens = if saw_digit { count } else { 1 };
    }

    // Charge: `+`, `-`, repeated signs, or a sign with digits.
    let mut charge = 0i8;
    while let Some(&c) = content.get(i) {
        let sign = match c {
            '+' => 1i8,
            '-' => -1i8,
            _ => break,
        };
        i += 1;
        if let Some(&d) = content.get(i) {
            if d.is_ascii_digit() {
                charge = sign * (d as i8 - b'0' as i8);
                i += 1;
                continue;
            }
        }
        charge = charge.saturating_add(sign);
    }

    // Atom map number, accepted and discarded.
    if content.get(i) == Some(&':') {
        i += 1;
        while i < content.len() && content[i].is_ascii_digit() {
            i += 1;
        }
    }

    if i != content.len() {
        return Err(ParseError::UnexpectedChar(content[i], open));
    }

    let mut atom = Atom::new(symbol, hydrogens);
    atom.aromatic = aromatic;
    atom.charge = charge;
    atom.isotope = isotope;
    atom.chirality = chirality;
    Ok(atom)
}
