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
use std::f64::consts::PI;
use std::str::FromStr;

/// The periodic part of the excitation.  Each waveform is a function of the oscillator phase,
/// measured in cycles.  Its output lies in [-1, 1].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sawtooth,
    Square,
    Triangle,
    HalfSine,
    QuarterSine,
    RectifiedSine,
    PhaseModulated
}

/// Parameters of the PhaseModulated waveform.  Other waveforms ignore them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PhaseModulation {
    pub amount: f64,
    pub ratio: f64
}

impl PhaseModulation {
    pub fn new(amount: f64, ratio: f64) -> Self {
        Self {
            amount: amount,
            ratio: ratio
        }
    }
}

const WAVEFORMS: [Waveform; 7] = [
    Waveform::Sawtooth,
    Waveform::Square,
    Waveform::Triangle,
    Waveform::HalfSine,
    Waveform::QuarterSine,
    Waveform::RectifiedSine,
    Waveform::PhaseModulated
];

impl Waveform {
    /// Look up a waveform by its position in the list Sawtooth, Square, Triangle, HalfSine,
    /// QuarterSine, RectifiedSine, PhaseModulated.
    pub fn from_index(index: usize) -> Option<Waveform> {
        WAVEFORMS.get(index).copied()
    }

    pub fn all() -> &'static [Waveform] {
        &WAVEFORMS
    }

    /// Evaluate the waveform at a phase.
    pub fn sample(&self, phase: f64, pm: PhaseModulation) -> f64 {
        let frac = phase.rem_euclid(1.0);
        match self {
            Waveform::Sawtooth => 2.0*frac - 1.0,
            Waveform::Square => if frac < 0.5 {1.0} else {-1.0},
            Waveform::Triangle => 4.0*f64::min(frac, 1.0-frac) - 1.0,
            Waveform::HalfSine => if frac < 0.5 {(2.0*PI*phase).sin()} else {0.0},
            Waveform::QuarterSine => if frac < 0.25 {(2.0*PI*phase).sin()} else {0.0},
            Waveform::RectifiedSine => (2.0*PI*phase).sin().abs(),
            Waveform::PhaseModulated => (2.0*PI*(phase + pm.amount*(2.0*PI*phase*pm.ratio).sin())).sin()
        }
    }
}

impl FromStr for Waveform {
    type Err = LpcError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(index) = s.parse::<usize>() {
            return Waveform::from_index(index).ok_or_else(|| LpcError::UnknownWaveform(s.to_string()));
        }
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            "square" => Ok(Waveform::Square),
            "triangle" => Ok(Waveform::Triangle),
            "halfsine" | "halfsin" => Ok(Waveform::HalfSine),
            "quartersine" | "quartersin" => Ok(Waveform::QuarterSine),
            "rectifiedsine" | "rectsin" => Ok(Waveform::RectifiedSine),
            "pm" | "phasemodulated" => Ok(Waveform::PhaseModulated),
            _ => Err(LpcError::UnknownWaveform(s.to_string()))
        }
    }
}
