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

use crate::error::{LpcError, Result};
use crate::frame::LpcFrame;
use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;

impl LpcFrame {
    /// The magnitude response of the frame's synthesis filter, sqrt(gain)/|A(e^jw)|, at the
    /// fft_len/2+1 frequencies k*framerate/fft_len.  A(z) = 1 + c[0]z^-1 + ... + c[order-1]z^-order.
    pub fn envelope(&self, fft_len: usize) -> Result<Vec<f64>> {
        if fft_len <= self.order() {
            return Err(LpcError::SpectrumSize {fft_len: fft_len, order: self.order()});
        }
        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_len);
        let mut input = fft.make_input_vec();
        input[0] = 1.0;
        input[1..=self.order()].copy_from_slice(&self.coefficients);
        let mut output: Vec<Complex<f64>> = fft.make_output_vec();
        fft.process(&mut input, &mut output).map_err(|_| LpcError::SpectrumSize {fft_len: fft_len, order: self.order()})?;
        let scale = self.gain.sqrt();
        Ok(output.iter().map(|a| scale/a.norm()).collect())
    }

    /// The frequency in Hz at which the envelope is largest.  This is usually the first
    /// formant.
    pub fn peak_frequency(&self, framerate: u32, fft_len: usize) -> Result<f64> {
        let envelope = self.envelope(fft_len)?;
        let mut best = 0;
        for (i, value) in envelope.iter().enumerate() {
            if *value > envelope[best] {
                best = i;
            }
        }
        Ok(best as f64*framerate as f64/fft_len as f64)
    }
}
