//! Core types for the fingerprint kernel.

pub mod environment;
pub mod fingerprint;
pub mod graph;
pub mod record;

pub use environment::AtomEnvironment;
pub use fingerprint::Fingerprint;
pub use graph::{Atom, Bond, BondOrder, ChiralSlot, Chirality, MolecularGraph};
pub use record::{DescriptorColumns, FingerprintRecord};
