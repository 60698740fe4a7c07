//! Entropy Sources
//!
//! Registration draws one 256-bit entropy word per request and binds it into
//! the commitment. Production uses the operating system RNG; tests and
//! reproducible demos use a seeded Xoroshiro128+ stream.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::word::{Word, WORD_BYTES};

/// Supplier of unpredictable values for commitment hashing.
pub trait EntropySource: Send {
    /// Produce the next entropy word.
    fn next_entropy(&mut self) -> Word;
}

/// Operating system entropy.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn next_entropy(&mut self) -> Word {
        let mut bytes = [0u8; WORD_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Word::from_be_bytes(bytes)
    }
}

/// Deterministic entropy stream using Xoroshiro128+.
///
/// Given the same seed this produces the same sequence of words on every
/// platform. Not unpredictable: only for tests and reproducible runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicEntropy {
    state: [u64; 2],
}

impl Default for DeterministicEntropy {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicEntropy {
    /// Create a stream from a 64-bit seed.
    ///
    /// SplitMix64 expands the seed so that weak seeds still give a
    /// well-distributed initial state.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // All-zero state is a fixed point
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a 256-bit word from four consecutive outputs.
    pub fn next_word(&mut self) -> Word {
        let mut bytes = [0u8; WORD_BYTES];
        for chunk in bytes.chunks_exact_mut(8) {
            chunk.copy_from_slice(&self.next_u64().to_be_bytes());
        }
        Word::from_be_bytes(bytes)
    }

    /// Get current state (for checkpointing).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

impl EntropySource for DeterministicEntropy {
    fn next_entropy(&mut self) -> Word {
        self.next_word()
    }
}

/// SplitMix64 for seed initialization.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut a = DeterministicEntropy::new(12345);
        let mut b = DeterministicEntropy::new(12345);

        for _ in 0..100 {
            assert_eq!(a.next_entropy(), b.next_entropy());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut a = DeterministicEntropy::new(12345);
        let mut b = DeterministicEntropy::new(54321);

        assert_ne!(a.next_entropy(), b.next_entropy());
    }

    #[test]
    fn test_consecutive_words_differ() {
        let mut rng = DeterministicEntropy::new(1);
        let first = rng.next_word();
        let second = rng.next_word();

        assert_ne!(first, second);
        assert!(!first.is_zero());
    }

    #[test]
    fn test_state_checkpoint() {
        let mut rng = DeterministicEntropy::new(5555);
        for _ in 0..50 {
            rng.next_u64();
        }

        let saved = rng.state();
        let expected: Vec<Word> = (0..5).map(|_| rng.next_word()).collect();

        rng.set_state(saved);
        for word in expected {
            assert_eq!(rng.next_word(), word);
        }
    }

    #[test]
    fn test_os_entropy_varies() {
        let mut os = OsEntropy;
        assert_ne!(os.next_entropy(), os.next_entropy());
    }
}
