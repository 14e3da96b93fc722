//! Graph provider boundary.
//!
//! The fingerprint core never parses notation itself; it consumes a
//! [`MolecularGraph`] (or a validity failure) from a [`GraphProvider`].
//! The crate ships [`SmilesProvider`], a pure-Rust provider for the common
//! SMILES subset, so the core is exercisable without native dependencies.
//! Scalar descriptors are direct pass-through calls on the same trait.

pub mod descriptors;
pub mod kekulize;
pub mod smiles;

use crate::types::MolecularGraph;

/// Error type for inputs that cannot be turned into a molecular graph.
///
/// In batch contexts a `ParseError` is always record-local: it becomes a
/// validity flag, never a process-halting failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Empty or whitespace-only input.
    #[error("empty input")]
    Empty,
    /// A character that has no meaning at its position.
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    /// A `[` without a matching `]`.
    #[error("unclosed bracket atom at position {0}")]
    UnclosedBracket(usize),
    /// Element symbol outside the supported set.
    #[error("unknown element '{0}'")]
    UnknownElement(String),
    /// A ring-closure digit opened but never closed, or closed onto itself.
    #[error("unmatched ring closure {0}")]
    UnmatchedRingClosure(u32),
    /// A ring closure whose two ends specify different bond orders.
    #[error("conflicting bond orders on ring closure {0}")]
    ConflictingRingBond(u32),
    /// Branch parentheses do not balance.
    #[error("unbalanced branch parentheses")]
    UnbalancedBranch,
    /// A bond symbol with no atom to attach to.
    #[error("bond symbol with no preceding atom")]
    DanglingBond,
}

/// External-collaborator interface: turn raw text into a validated molecular
/// graph and answer simple scalar-descriptor queries about it.
///
/// Implementations must be stateless per call (`Send + Sync`, no interior
/// mutability observable across calls) so the batch and tensor layers can
/// invoke them concurrently.
pub trait GraphProvider: Send + Sync {
    /// Parse one textual molecule notation into a graph.
    fn parse(&self, text: &str) -> Result<MolecularGraph, ParseError>;

    /// Molecular weight of a parsed graph.
    fn weight(&self, graph: &MolecularGraph) -> f64;

    /// Partition coefficient (logP) of a parsed graph.
    fn partition_coefficient(&self, graph: &MolecularGraph) -> f64;

    /// Polar surface area of a parsed graph.
    fn polar_surface_area(&self, graph: &MolecularGraph) -> f64;

    /// Canonical-form string for the molecule as a whole.
    fn canonical_form(&self, graph: &MolecularGraph) -> String;
}

/// Default pure-Rust provider backed by the in-crate SMILES parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmilesProvider;

impl SmilesProvider {
    /// Create a new provider.
    pub fn new() -> Self {
        Self
    }
}

impl GraphProvider for SmilesProvider {
    fn parse(&self, text: &str) -> Result<MolecularGraph, ParseError> {
        smiles::parse_smiles(text)
    }

    fn weight(&self, graph: &MolecularGraph) -> f64 {
        descriptors::molecular_weight(graph)
    }

    fn partition_coefficient(&self, graph: &MolecularGraph) -> f64 {
        descriptors::partition_coefficient(graph)
    }

    fn polar_surface_area(&self, graph: &MolecularGraph) -> f64 {
        descriptors::polar_surface_area(graph)
    }

    fn canonical_form(&self, graph: &MolecularGraph) -> String {
        crate::canonical::canonical_molecule(graph)
    }
}
