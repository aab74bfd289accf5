// Copyright 2026 The lessonkit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Randomness for display-only orderings and identifier salts.
//!
//! Nothing here is cryptographic. Callers that need reproducible output (tests,
//! golden files) seed a [`TinyRng`] explicitly; everything else seeds it from
//! the clock, so two renders of the same lesson are not expected to agree.

/// A source of random numbers. Lets tests substitute a fixed sequence.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    /// Generate random number in range [0, max). `max` must be non-zero.
    fn below(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// A minimal, zero-dependency, completely insecure PRNG.
pub struct TinyRng {
    state: u64,
}

const A: u64 = 6364136223846793005;
const C: u64 = 1442695040888963407;

impl TinyRng {
    /// Initialize the RNG from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for TinyRng {
    fn next_u32(&mut self) -> u32 {
        let new = self.state.wrapping_mul(A).wrapping_add(C);
        self.state = new;
        (new >> 32) as u32
    }
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(v: Vec<T>, rng: &mut impl RandomSource) -> Vec<T> {
    let mut v = v;
    for i in (1..v.len()).rev() {
        let j = rng.below(i as u32 + 1) as usize;
        v.swap(i, j);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = TinyRng::from_seed(7);
        let mut shuffled = shuffle((0..50).collect::<Vec<u32>>(), &mut rng);
        shuffled.sort();
        assert_eq!(shuffled, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = shuffle(vec!["a", "b", "c", "d", "e"], &mut TinyRng::from_seed(42));
        let b = shuffle(vec!["a", "b", "c", "d", "e"], &mut TinyRng::from_seed(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_empty_and_singleton() {
        let mut rng = TinyRng::from_seed(1);
        assert!(shuffle(Vec::<u8>::new(), &mut rng).is_empty());
        assert_eq!(shuffle(vec![9], &mut rng), vec![9]);
    }
}
