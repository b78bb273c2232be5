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

use lpc_voice::burg::calc_burg;
use lpc_voice::filter::{AllPoleFilter, Filter};
use lpc_voice::random::Random;
use lpc_voice::{LpcError, LpcFrame};
use std::f64::consts::PI;

/// A two pole resonator at the given frequency.
fn resonance(frequency: f64, framerate: f64, radius: f64) -> Vec<f64> {
    let w = 2.0*PI*frequency/framerate;
    vec![-2.0*radius*w.cos(), radius*radius]
}

#[test]
fn test_flat_envelope() {
    let frame = LpcFrame::new(vec![0.0, 0.0], 4.0, 1.0);
    let envelope = frame.envelope(64).unwrap();
    assert_eq!(33, envelope.len());
    assert!(envelope.iter().all(|x| (x-2.0).abs() < 1e-12));
}

#[test]
fn test_resonance_peak() {
    let frame = LpcFrame::new(resonance(1000.0, 8000.0, 0.95), 1.0, 1.0);
    let peak = frame.peak_frequency(8000, 512).unwrap();
    assert!((peak-1000.0).abs() < 30.0, "peak at {peak}");
}

#[test]
fn test_analysis_finds_resonance() {
    // Drive the resonator with noise, then recover it by analysis.
    let mut filter = AllPoleFilter::new(2);
    filter.set_coefficients(&resonance(1500.0, 8000.0, 0.95));
    let mut random = Random::with_seed(17);
    let signal: Vec<f64> = (0..8000).map(|_| filter.process(random.get_uniform()-0.5)).collect();
    let result = calc_burg(&signal, 2);
    let frame = LpcFrame::new(result.final_coefficients().to_vec(), result.final_gain(), 0.0);
    let peak = frame.peak_frequency(8000, 1024).unwrap();
    assert!((peak-1500.0).abs() < 60.0, "peak at {peak}");
}

#[test]
fn test_fft_too_short() {
    let frame = LpcFrame::new(vec![0.1; 8], 1.0, 1.0);
    assert!(matches!(frame.envelope(8), Err(LpcError::SpectrumSize {fft_len: 8, order: 8})));
    assert!(frame.envelope(9).is_ok());
}
