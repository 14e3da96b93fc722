//! Tensor-shaped element-wise adapter.
//!
//! Wraps the single-record engine as an operation over n-dimensional
//! string arrays: the trace output keeps the input shape, the fingerprint
//! output appends one trailing axis of the configured bit length. Elements
//! are processed independently, so the op parallelizes freely and an
//! invalid element stays confined to its own slot.

use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};
use rayon::prelude::*;

use crate::engine::{FingerprintConfig, FingerprintEngine};
use crate::provider::{GraphProvider, SmilesProvider};
use crate::types::FingerprintRecord;

/// Element-wise fingerprint operation over arbitrarily shaped string
/// tensors.
#[derive(Debug, Clone)]
pub struct TensorFingerprintOp<P: GraphProvider> {
    engine: Arc<FingerprintEngine<P>>,
}

impl Default for TensorFingerprintOp<SmilesProvider> {
    fn default() -> Self {
        Self::new(Arc::new(FingerprintEngine::default()))
    }
}

impl TensorFingerprintOp<SmilesProvider> {
    /// Build over the default SMILES provider with the given configuration.
    pub fn with_config(config: FingerprintConfig) -> Self {
        Self::new(Arc::new(FingerprintEngine::new(
            Arc::new(SmilesProvider::new()),
            config,
        )))
    }
}

impl<P: GraphProvider> TensorFingerprintOp<P> {
    /// Wrap an engine as a tensor op.
    pub fn new(engine: Arc<FingerprintEngine<P>>) -> Self {
        Self { engine }
    }

    /// Apply the op: traces with the input shape, fingerprints with the
    /// input shape plus a trailing bit axis.
    pub fn apply(&self, inputs: &ArrayD<String>) -> (ArrayD<String>, ArrayD<u8>) {
        let bits = self.engine.config().resolved_bit_length();

        // Logical (row-major) element order, independent of memory layout.
        let flat: Vec<&String> = inputs.iter().collect();
        let records: Vec<FingerprintRecord> = flat
            .par_iter()
            .map(|text| self.engine.process(text))
            .collect();

        let mut traces = Vec::with_capacity(records.len());
        let mut bits_flat = Vec::with_capacity(records.len() * bits);
        for record in records {
            bits_flat.extend_from_slice(record.fingerprint.as_bytes());
            traces.push(record.trace);
        }

        let trace_out = ArrayD::from_shape_vec(inputs.raw_dim(), traces)
            .expect("trace tensor matches input shape");
        let mut fp_shape: Vec<usize> = inputs.shape().to_vec();
        fp_shape.push(bits);
        let fp_out = ArrayD::from_shape_vec(IxDyn(&fp_shape), bits_flat)
            .expect("fingerprint tensor matches input shape plus bit axis");

        (trace_out, fp_out)
    }
}
