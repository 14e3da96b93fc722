//! Per-input result records and batch descriptor columns.

use serde::{Deserialize, Serialize};

use crate::types::fingerprint::Fingerprint;

/// Result for one input record: validity flag, reasoning trace, and folded
/// fingerprint. Created on process, never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    /// Whether the input parsed into a molecular graph.
    pub valid: bool,
    /// Multi-line reasoning trace; empty for invalid input.
    pub trace: String,
    /// Folded fingerprint; all-zero for invalid input.
    pub fingerprint: Fingerprint,
}

impl FingerprintRecord {
    /// The neutral record substituted for an unparseable input.
    pub fn invalid(bit_length: usize) -> Self {
        Self {
            valid: false,
            trace: String::new(),
            fingerprint: Fingerprint::zeros(bit_length),
        }
    }
}

/// Parallel scalar-descriptor columns for a batch, index-aligned with the
/// input order. Invalid records carry NaN (empty string for canonical form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorColumns {
    /// Molecular weight per record.
    pub weight: Vec<f64>,
    /// Partition coefficient (logP) per record.
    pub partition_coefficient: Vec<f64>,
    /// Polar surface area per record.
    pub polar_surface_area: Vec<f64>,
    /// Canonical-form string per record.
    pub canonical_form: Vec<String>,
}

impl DescriptorColumns {
    /// Columns prefilled with the neutral defaults for `len` records.
    pub fn neutral(len: usize) -> Self {
        Self {
            weight: vec![f64::NAN; len],
            partition_coefficient: vec![f64::NAN; len],
            polar_surface_area: vec![f64::NAN; len],
            canonical_form: vec![String::new(); len],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_record_is_neutral() {
        let rec = FingerprintRecord::invalid(32);
        assert!(!rec.valid);
        assert!(rec.trace.is_empty());
        assert_eq!(rec.fingerprint.len(), 32);
        assert!(rec.fingerprint.is_all_zero());
    }

    #[test]
    fn neutral_columns_are_nan() {
        let cols = DescriptorColumns::neutral(3);
        assert_eq!(cols.weight.len(), 3);
        assert!(cols.weight.iter().all(|w| w.is_nan()));
        assert!(cols.canonical_form.iter().all(|s| s.is_empty()));
    }
}
