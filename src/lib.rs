//! # ecfp-kernel
//!
//! Explainable circular fingerprints for molecular graphs.
//!
//! The kernel answers one question:
//!
//! > Given a molecule, which structural fragments set which fingerprint
//! > bits, and why?
//!
//! ## Core Contract
//!
//! 1. Enumerate every bounded-radius atom environment of the molecule
//! 2. Serialize each environment to a canonical, relabeling-invariant
//!    fragment descriptor
//! 3. Fold descriptors into a fixed-length bit vector and emit a
//!    reasoning trace naming the descriptor behind every set bit
//!
//! ## Architecture
//!
//! ```text
//! Input text → GraphProvider → Environment Enumeration → Canonical
//!              Descriptors → Hash/Fold → Fingerprint + Trace
//!                                  ↑
//!              one FragmentEvent stream feeds both outputs
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same input + same configuration → identical fingerprint and trace
//! - Descriptors are invariant under atom relabeling
//! - Fixed hash seed; bit indices are stable across runs and machines

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod canonical;
pub mod engine;
pub mod environment;
pub mod hashing;
pub mod provider;
pub mod tensor;
pub mod trace;
pub mod types;

// Re-exports
pub use batch::{BatchOptions, BatchOutput, BatchProcessor, DEFAULT_CHUNK_SIZE};
pub use engine::{
    fingerprint_and_trace, FingerprintConfig, FingerprintEngine, FragmentEvent, DEFAULT_RADIUS,
};
pub use environment::{enumerate_environments, environments_of};
pub use hashing::{
    canonical_hash_hex, descriptor_hash, fold_descriptor, resolve_bit_length,
    DEFAULT_FINGERPRINT_BITS,
};
pub use canonical::{canonical_molecule, fragment_descriptor, normalize_parity};
pub use provider::{GraphProvider, ParseError, SmilesProvider};
pub use tensor::TensorFingerprintOp;
pub use trace::{build_trace, FragmentMetrics, CHAIN_ARROW, COUNT_SEPARATOR, PER_CENTER_MARKER};
pub use types::{
    Atom, AtomEnvironment, Bond, BondOrder, ChiralSlot, Chirality, DescriptorColumns, Fingerprint,
    FingerprintRecord, MolecularGraph,
};
