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

//! Burg's method for estimating LPC coefficients.
//!
//! Burg's method picks each reflection coefficient to minimize the sum of the forward and
//! backward prediction errors, then extends the predictor with the Levinson recursion.  Unlike
//! the autocorrelation method it does not assume the signal is zero outside the window, which
//! makes it well suited to the short windows used for speech.

/// The result of running the Burg recursion up to some maximum order.  Entry k of each vector
/// describes the predictor of order k+1.
#[derive(Clone, Debug, PartialEq)]
pub struct BurgResult {
    pub coefficients: Vec<Vec<f64>>,
    pub gains: Vec<f64>
}

impl BurgResult {
    /// The highest order that was computed.
    pub fn max_order(&self) -> usize {
        self.gains.len()
    }

    /// The coefficients of the highest order predictor.
    pub fn final_coefficients(&self) -> &[f64] {
        self.coefficients.last().map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// The prediction error power of the highest order predictor.
    pub fn final_gain(&self) -> f64 {
        self.gains.last().copied().unwrap_or(0.0)
    }
}

/// Compute LPC coefficients and gains for every order from 1 to max_order.
///
/// The signal is not windowed here.  Window it first if necessary.
///
/// Windows no longer than max_order are accepted.  Once the prediction error sequences run
/// out of samples, every further reflection coefficient is zero, so the predictor is padded
/// with zeros and the gain stays constant.
pub fn calc_burg(signal: &[f64], max_order: usize) -> BurgResult {
    let n = signal.len();
    let mut error_f = signal.to_vec();
    let mut error_b = signal.to_vec();
    let mut rho = if n > 0 {signal.iter().map(|x| x*x).sum::<f64>() / n as f64} else {0.0};
    let mut coeffs: Vec<f64> = Vec::with_capacity(max_order);
    let mut result = BurgResult {
        coefficients: Vec::with_capacity(max_order),
        gains: Vec::with_capacity(max_order)
    };
    for _ in 0..max_order {
        // Shift the forward errors against the backward errors by one more sample.

        if !error_f.is_empty() {
            error_f.remove(0);
            error_b.pop();
        }
        let reflection = reflection_coefficient(&error_f, &error_b);
        rho *= 1.0 - reflection*reflection;
        result.gains.push(rho);

        // Both updates use the values from before this step.

        for (f, b) in error_f.iter_mut().zip(error_b.iter_mut()) {
            let (old_f, old_b) = (*f, *b);
            *f = old_f + reflection*old_b;
            *b = old_b + reflection*old_f;
        }

        // Levinson recursion: a' = a + k*reverse(a), then append k.

        let reversed: Vec<f64> = coeffs.iter().rev().copied().collect();
        for (c, r) in coeffs.iter_mut().zip(reversed) {
            *c += reflection*r;
        }
        coeffs.push(reflection);
        result.coefficients.push(coeffs.clone());
    }
    result
}

/// The Burg reflection coefficient for one stage of the lattice.  A window with no energy left
/// produces 0/0, which is treated as zero reflection.
fn reflection_coefficient(error_f: &[f64], error_b: &[f64]) -> f64 {
    let num = -2.0*dot(error_f, error_b);
    let den = dot(error_f, error_f) + dot(error_b, error_b);
    let reflection = num/den;
    if reflection.is_nan() {
        return 0.0;
    }
    // |k| <= 1 holds exactly, but rounding can push it slightly past.
    reflection.clamp(-1.0, 1.0)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x*y).sum()
}

/// Normalized correlation between a signal and itself shifted by offset samples.  The square of
/// the lag-1 value is used as the voicing estimate of a frame.  A signal with no energy in the
/// overlapping region is treated as completely uncorrelated.
pub fn autocorrelation(signal: &[f64], offset: usize) -> f64 {
    if offset >= signal.len() {
        return 0.0;
    }
    let mut num = 0.0;
    let mut den0 = 0.0;
    let mut den1 = 0.0;
    for i in 0..signal.len()-offset {
        num += signal[i]*signal[i+offset];
        den0 += signal[i]*signal[i];
        den1 += signal[i+offset]*signal[i+offset];
    }
    let den = (den0*den1).sqrt();
    if den == 0.0 {
        return 0.0;
    }
    num/den
}
