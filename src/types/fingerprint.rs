//! Fixed-length folded fingerprint bit vector.

use serde::{Deserialize, Serialize};

/// A fixed-length bit vector of 0/1 bytes. Bits are "set", never counted;
/// multiple fragments folding onto the same index is accepted lossy
/// compression and the reasoning trace records the identities lost here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    bits: Vec<u8>,
}

impl Fingerprint {
    /// All-zero fingerprint of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![0u8; len],
        }
    }

    /// Length in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when the vector has zero length.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Set the bit at `idx`. Out-of-range indices are ignored; the folder
    /// always produces indices in range, this only guards the pad/truncate
    /// recovery path.
    pub fn set(&mut self, idx: usize) {
        if let Some(bit) = self.bits.get_mut(idx) {
            *bit = 1;
        }
    }

    /// Whether the bit at `idx` is set.
    pub fn get(&self, idx: usize) -> bool {
        self.bits.get(idx).is_some_and(|&b| b == 1)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// True when no bit is set.
    pub fn is_all_zero(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Indices of set bits, ascending.
    pub fn on_bits(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// The raw 0/1 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Consume into the raw 0/1 byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    /// Right-pad with zeros or truncate so the result is exactly `len` bits.
    /// This is the local recovery for a shape mismatch between an internally
    /// computed vector and the requested output length.
    pub fn fit_to_length(mut self, len: usize) -> Self {
        self.bits.resize(len, 0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut fp = Fingerprint::zeros(16);
        assert!(fp.is_all_zero());
        fp.set(3);
        fp.set(15);
        assert!(fp.get(3));
        assert!(fp.get(15));
        assert!(!fp.get(4));
        assert_eq!(fp.count_ones(), 2);
        assert_eq!(fp.on_bits(), vec![3, 15]);
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut fp = Fingerprint::zeros(8);
        fp.set(100);
        assert!(fp.is_all_zero());
    }

    #[test]
    fn fit_to_length_pads_and_truncates() {
        let mut fp = Fingerprint::zeros(8);
        fp.set(2);
        fp.set(7);

        let padded = fp.clone().fit_to_length(12);
        assert_eq!(padded.len(), 12);
        assert!(padded.get(2));
        assert!(padded.get(7));
        assert!(!padded.get(11));

        let truncated = fp.fit_to_length(4);
        assert_eq!(truncated.len(), 4);
        assert!(truncated.get(2));
        assert!(!truncated.get(7));
    }
}
