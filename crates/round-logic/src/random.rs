//! Seeded pseudo-random number generator
//!
//! Deterministic xorshift64* so codenames and scripted matches are
//! reproducible from a seed.

/// Same seed = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Fold a 32-byte seed into the generator state
    pub fn new(seed: &[u8; 32]) -> Self {
        let mut state = 0u64;
        for (i, chunk) in seed.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            state ^= u64::from_le_bytes(word).rotate_left(i as u32 * 16);
        }

        Self::from_state(state)
    }

    pub fn from_u64(seed: u64) -> Self {
        Self::from_state(seed.wrapping_mul(0x517cc1b727220a95))
    }

    fn from_state(state: u64) -> Self {
        // xorshift never leaves zero
        let mut rng = Self {
            state: if state == 0 { 0x9e3779b97f4a7c15 } else { state },
        };
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Value in `[0, bound)`; zero when `bound` is zero
    pub fn next_below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        ((self.next_u64() >> 32) % bound as u64) as usize
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.next_below(items.len()))
    }
}
