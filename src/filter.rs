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

pub trait Filter {
    fn process(&mut self, x: f64) -> f64;
}

/// The all-pole synthesis filter of linear prediction.  Each output is the input minus the
/// weighted sum of the previous `order` outputs:
///
/// y[n] = x[n] - c[0]*y[n-1] - c[1]*y[n-2] - ... - c[order-1]*y[n-order]
///
/// Past outputs are kept in a circular delay line, so each sample costs O(order) with no
/// shifting.
#[derive(Clone, Debug)]
pub struct AllPoleFilter {
    coefficients: Vec<f64>,
    cache: Vec<f64>,
    index: usize
}

impl AllPoleFilter {
    pub fn new(order: usize) -> Self {
        Self {
            coefficients: vec![0.0; order],
            cache: vec![0.0; order],
            index: 0
        }
    }

    pub fn order(&self) -> usize {
        self.cache.len()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Replace the coefficients without any transition.
    pub fn set_coefficients(&mut self, coefficients: &[f64]) {
        self.coefficients.copy_from_slice(coefficients);
    }

    /// Move every coefficient a fraction `rate` of the way toward its target.
    pub fn glide_coefficients(&mut self, target: &[f64], rate: f64) {
        for (c, t) in self.coefficients.iter_mut().zip(target) {
            *c += (t - *c)*rate;
        }
    }

    /// Forget all past outputs.
    pub fn clear(&mut self) {
        self.cache.fill(0.0);
        self.index = 0;
    }

    /// The delay line and the slot the next output will be written to.
    pub fn history(&self) -> (&[f64], usize) {
        (&self.cache, self.index)
    }
}

impl Filter for AllPoleFilter {
    fn process(&mut self, x: f64) -> f64 {
        let n = self.cache.len();
        if n == 0 {
            return x;
        }
        let mut y = x;
        for (j, c) in self.coefficients.iter().enumerate() {
            y -= c*self.cache[(self.index+n-1-j) % n];
        }
        self.cache[self.index] = y;
        self.index = (self.index+1) % n;
        y
    }
}
