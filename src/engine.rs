//! Single-record fingerprint engine.
//!
//! One enumeration pass per molecule emits a stream of fragment events;
//! the fingerprint and the reasoning trace are both assembled from that
//! same stream, which is what makes them bit-for-bit consistent. The
//! engine is generic over the [`GraphProvider`] so the core never depends
//! on one notation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canonical::fragment_descriptor;
use crate::environment::environments_of;
use crate::hashing::{canonical_hash_hex, fold_descriptor, resolve_bit_length};
use crate::provider::kekulize::kekulize;
use crate::provider::{GraphProvider, SmilesProvider};
use crate::trace::{build_trace, FragmentMetrics};
use crate::types::{Fingerprint, FingerprintRecord, MolecularGraph};

/// Default maximum environment radius.
pub const DEFAULT_RADIUS: u32 = 2;

/// Fingerprint generation parameters. Hashable as a whole for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Maximum environment radius in bond steps.
    pub radius: u32,
    /// Fingerprint length in bits; `0` selects the default length.
    pub bit_length: usize,
    /// Include chirality markers in fragment descriptors.
    pub isomeric: bool,
    /// Convert aromatic systems to alternating single/double bonds before
    /// enumeration.
    pub kekulize: bool,
    /// Append the per-center chain section to the trace.
    pub include_per_center: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            bit_length: 0,
            isomeric: true,
            kekulize: false,
            include_per_center: true,
        }
    }
}

impl FingerprintConfig {
    /// The concrete fingerprint length this configuration produces.
    pub fn resolved_bit_length(&self) -> usize {
        resolve_bit_length(self.bit_length)
    }

    /// Deterministic hex digest of the full parameter set.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// One observed fragment: the unit both the fingerprint and the trace are
/// built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentEvent {
    /// Radius the fragment was observed at.
    pub radius: u32,
    /// Center atom index.
    pub center: usize,
    /// Radius-tagged canonical descriptor, e.g. `r1:[CH3:1]-[OH]`.
    pub descriptor: String,
    /// Bit index the descriptor folded to.
    pub bit: usize,
    /// Structural measures used to order the trace.
    pub metrics: FragmentMetrics,
}

/// Processes one molecule at a time. Cheap to clone; the provider is
/// shared.
#[derive(Debug, Clone)]
pub struct FingerprintEngine<P: GraphProvider> {
    provider: Arc<P>,
    config: FingerprintConfig,
}

impl Default for FingerprintEngine<SmilesProvider> {
    fn default() -> Self {
        Self::new(Arc::new(SmilesProvider::new()), FingerprintConfig::default())
    }
}

impl<P: GraphProvider> FingerprintEngine<P> {
    /// Build an engine over a shared provider.
    pub fn new(provider: Arc<P>, config: FingerprintConfig) -> Self {
        Self { provider, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// The graph provider this engine parses with.
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Process one raw input into a record. Unparseable input yields the
    /// neutral invalid record; this never fails.
    pub fn process(&self, text: &str) -> FingerprintRecord {
        match self.provider.parse(text) {
            Ok(graph) => self.process_graph(graph),
            Err(err) => {
                debug!(error = %err, "input did not parse, emitting neutral record");
                FingerprintRecord::invalid(self.config.resolved_bit_length())
            }
        }
    }

    /// Process an already-parsed graph into a record.
    pub fn process_graph(&self, graph: MolecularGraph) -> FingerprintRecord {
        let bits = self.config.resolved_bit_length();
        let graph = if self.config.kekulize {
            kekulize(&graph)
        } else {
            graph
        };

        let events = self.fragment_events(&graph);
        let mut fingerprint = Fingerprint::zeros(bits);
        for event in &events {
            fingerprint.set(event.bit);
        }
        let trace = build_trace(&graph, &events, self.config.include_per_center);

        FingerprintRecord {
            valid: true,
            trace,
            fingerprint,
        }
    }

    /// Enumerate the fragment events of an already-parsed graph, centers in
    /// atom order and radii ascending within each center. An environment
    /// identical to the previous radius contributes no event.
    pub fn fragment_events(&self, graph: &MolecularGraph) -> Vec<FragmentEvent> {
        let bits = self.config.resolved_bit_length();
        let mut events = Vec::new();

        for center in 0..graph.atom_count() {
            let envs = environments_of(graph, center, self.config.radius);
            let mut previous: Option<&crate::types::AtomEnvironment> = None;
            for env in &envs {
                if previous.is_some_and(|prev| env.same_subgraph(prev)) {
                    continue;
                }
                let smarts = fragment_descriptor(graph, env, self.config.isomeric);
                let descriptor = format!("r{}:{}", env.radius, smarts);
                let bit = fold_descriptor(&descriptor, bits);
                events.push(FragmentEvent {
                    radius: env.radius,
                    center,
                    descriptor,
                    bit,
                    metrics: FragmentMetrics::of(graph, env),
                });
                previous = Some(env);
            }
        }

        events
    }
}

/// One-shot convenience over the default SMILES provider: returns the
/// trace and the fingerprint for a single input.
pub fn fingerprint_and_trace(text: &str, config: FingerprintConfig) -> (String, Fingerprint) {
    let engine = FingerprintEngine::new(Arc::new(SmilesProvider::new()), config);
    let record = engine.process(text);
    (record.trace, record.fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{CHAIN_ARROW, PER_CENTER_MARKER};

    fn engine(config: FingerprintConfig) -> FingerprintEngine<SmilesProvider> {
        FingerprintEngine::new(Arc::new(SmilesProvider::new()), config)
    }

    #[test]
    fn default_config_resolves_bits() {
        let config = FingerprintConfig::default();
        assert_eq!(config.resolved_bit_length(), 2048);
        assert_eq!(config.params_hash().len(), 16);
    }

    #[test]
    fn params_hash_changes_with_any_field() {
        let base = FingerprintConfig::default();
        let mut other = base.clone();
        other.isomeric = false;
        assert_ne!(base.params_hash(), other.params_hash());
    }

    #[test]
    fn ethanol_produces_trace_and_bits() {
        let record = engine(FingerprintConfig::default()).process("CCO");
        assert!(record.valid);
        assert!(record.trace.starts_with("r0: "));
        assert!(record.trace.contains(PER_CENTER_MARKER));
        assert!(record.fingerprint.count_ones() >= 1);
        assert_eq!(record.fingerprint.len(), 2048);
    }

    #[test]
    fn invalid_input_yields_neutral_record() {
        let record = engine(FingerprintConfig::default()).process("not a molecule!!");
        assert!(!record.valid);
        assert!(record.trace.is_empty());
        assert!(record.fingerprint.is_all_zero());
        assert_eq!(record.fingerprint.len(), 2048);
    }

    #[test]
    fn saturated_center_stops_emitting() {
        // The middle carbon of CCO sees the whole molecule at radius 1, so
        // its chain has exactly two entries even at radius 2.
        let config = FingerprintConfig {
            radius: 2,
            ..FingerprintConfig::default()
        };
        let e = engine(config);
        let graph = e.provider().parse("CCO").unwrap();
        let events = e.fragment_events(&graph);
        let middle: Vec<_> = events.iter().filter(|ev| ev.center == 1).collect();
        assert_eq!(middle.len(), 2);
        assert_eq!(middle[0].radius, 0);
        assert_eq!(middle[1].radius, 1);
    }

    #[test]
    fn every_bit_set_appears_in_the_events() {
        let e = engine(FingerprintConfig {
            bit_length: 128,
            ..FingerprintConfig::default()
        });
        let graph = e.provider().parse("CC(=O)O").unwrap();
        let events = e.fragment_events(&graph);
        let record = e.process("CC(=O)O");
        for bit in record.fingerprint.on_bits() {
            assert!(events.iter().any(|ev| ev.bit == bit));
        }
        for ev in &events {
            assert!(record.fingerprint.get(ev.bit));
        }
    }

    #[test]
    fn per_center_chain_uses_the_arrow_separator() {
        let record = engine(FingerprintConfig::default()).process("CO");
        assert!(record.trace.contains(CHAIN_ARROW));
    }

    #[test]
    fn per_center_section_can_be_disabled() {
        let config = FingerprintConfig {
            include_per_center: false,
            ..FingerprintConfig::default()
        };
        let record = engine(config).process("CCO");
        assert!(!record.trace.contains(PER_CENTER_MARKER));
    }

    #[test]
    fn kekulized_benzene_loses_aromatic_descriptors() {
        let aromatic = engine(FingerprintConfig::default()).process("c1ccccc1");
        let kekulized = engine(FingerprintConfig {
            kekulize: true,
            ..FingerprintConfig::default()
        })
        .process("c1ccccc1");
        assert!(aromatic.trace.contains("[cH:1]"));
        assert!(!kekulized.trace.contains("[cH:1]"));
        assert!(kekulized.trace.contains("[CH:1]"));
        assert_ne!(aromatic.fingerprint, kekulized.fingerprint);
    }

    #[test]
    fn one_shot_helper_matches_the_engine() {
        let config = FingerprintConfig::default();
        let record = engine(config.clone()).process("CCO");
        let (trace, fp) = fingerprint_and_trace("CCO", config);
        assert_eq!(trace, record.trace);
        assert_eq!(fp, record.fingerprint);
    }
}
