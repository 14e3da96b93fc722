//! Batch orchestration.
//!
//! Inputs are processed in fixed-size chunks, each chunk in parallel, with
//! every result written into an index-addressed slot so output order always
//! matches input order regardless of chunk size or scheduling. A record
//! that fails to parse becomes a neutral invalid slot; it never aborts the
//! batch. Every fingerprint is shape-checked against the configured length
//! before it leaves this layer.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::engine::{FingerprintConfig, FingerprintEngine};
use crate::provider::{GraphProvider, SmilesProvider};
use crate::types::{DescriptorColumns, FingerprintRecord};

/// Default number of records processed per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Batch-level knobs on top of the per-record configuration.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Per-record fingerprint configuration.
    pub config: FingerprintConfig,
    /// Records per chunk; `0` processes the whole batch as one chunk.
    pub chunk_size: usize,
    /// Also compute the scalar descriptor columns.
    pub include_descriptors: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            config: FingerprintConfig::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            include_descriptors: false,
        }
    }
}

/// Everything a batch run produces, index-aligned with its inputs.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// One record per input, in input order.
    pub records: Vec<FingerprintRecord>,
    /// Scalar descriptor columns, when requested.
    pub descriptors: Option<DescriptorColumns>,
}

/// Chunked, parallel front end over a [`FingerprintEngine`].
#[derive(Debug, Clone)]
pub struct BatchProcessor<P: GraphProvider> {
    engine: FingerprintEngine<P>,
    options: BatchOptions,
}

/// Per-record descriptor row, gathered alongside the record so the graph
/// is parsed exactly once.
type DescriptorRow = (f64, f64, f64, String);

impl Default for BatchProcessor<SmilesProvider> {
    fn default() -> Self {
        Self::new(Arc::new(SmilesProvider::new()), BatchOptions::default())
    }
}

impl<P: GraphProvider> BatchProcessor<P> {
    /// Build a processor over a shared provider.
    pub fn new(provider: Arc<P>, options: BatchOptions) -> Self {
        let engine = FingerprintEngine::new(provider, options.config.clone());
        Self { engine, options }
    }

    /// The batch options in effect.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// The underlying single-record engine.
    pub fn engine(&self) -> &FingerprintEngine<P> {
        &self.engine
    }

    /// Process a batch of raw inputs. Output length and order always match
    /// the input, invalid entries included.
    pub fn process<S: AsRef<str> + Sync>(&self, inputs: &[S]) -> BatchOutput {
        let resolved = self.options.config.resolved_bit_length();
        let chunk_size = if self.options.chunk_size == 0 {
            inputs.len().max(1)
        } else {
            self.options.chunk_size
        };

        let mut records: Vec<FingerprintRecord> = Vec::with_capacity(inputs.len());
        let mut descriptors = self
            .options
            .include_descriptors
            .then(|| DescriptorColumns::neutral(inputs.len()));

        for (chunk_index, chunk) in inputs.chunks(chunk_size).enumerate() {
            let base = chunk_index * chunk_size;
            let processed: Vec<(FingerprintRecord, Option<DescriptorRow>)> = chunk
                .par_iter()
                .map(|text| self.process_entry(text.as_ref()))
                .collect();
            debug!(
                chunk = chunk_index,
                records = processed.len(),
                "processed batch chunk"
            );

            for (offset, (mut record, row)) in processed.into_iter().enumerate() {
                if record.fingerprint.len() != resolved {
                    record.fingerprint = record.fingerprint.fit_to_length(resolved);
                }
                if let (Some(cols), Some((weight, logp, psa, canonical))) =
                    (descriptors.as_mut(), row)
                {
                    let slot = base + offset;
                    cols.weight[slot] = weight;
                    cols.partition_coefficient[slot] = logp;
                    cols.polar_surface_area[slot] = psa;
                    cols.canonical_form[slot] = canonical;
                }
                records.push(record);
            }
        }

        BatchOutput {
            records,
            descriptors,
        }
    }

    fn process_entry(&self, text: &str) -> (FingerprintRecord, Option<DescriptorRow>) {
        let provider = self.engine.provider();
        match provider.parse(text) {
            Ok(graph) => {
                let row = self.options.include_descriptors.then(|| {
                    (
                        provider.weight(&graph),
                        provider.partition_coefficient(&graph),
                        provider.polar_surface_area(&graph),
                        provider.canonical_form(&graph),
                    )
                });
                (self.engine.process_graph(graph), row)
            }
            Err(err) => {
                debug!(error = %err, "batch entry did not parse, emitting neutral slot");
                (
                    FingerprintRecord::invalid(self.options.config.resolved_bit_length()),
                    None,
                )
            }
        }
    }
}
