// Copyright 2025 by the LPC Voice authors
//
// This file is part of LPC Voice.
//
// LPC Voice is free software: you can redistribute it and/or modify it under the terms
// of the GNU Lesser General Public License as published by the Free Software Foundation, either
// version 2.1 of the License, or (at your option) any later version.
//
// LPC Voice is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See
// the GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License along with LPC Voice.
// If not, see <https://www.gnu.org/licenses/>.

use rand::{Rng, RngCore, SeedableRng};
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

/// The source of every random decision made during synthesis: excitation noise, which stored
/// frame a sustained phoneme plays next, and the vibrato walk.  By default it is a PCG generator
/// seeded from the operating system.  Use with_seed() for reproducible output, or from_rng() to
/// plug in any other generator.
pub struct Random {
    rng: Box<dyn RngCore + Send>
}

impl Random {
    pub fn new() -> Self {
        // Select a seed.

        let mut bytes = [0u8; 8];
        let seed = match getrandom::getrandom(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(_) => 0
        };
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed))
    }

    pub fn from_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {rng: Box::new(rng)}
    }

    /// Get a random value, uniformly distributed between 0.0 and 1.0.
    pub fn get_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Get a random index in 0..len.  len must not be zero.
    pub fn get_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        values.shuffle(&mut self.rng);
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
