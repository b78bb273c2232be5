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
use crate::excitation::{PhaseModulation, Waveform};
use crate::filter::{AllPoleFilter, Filter};
use crate::frame::LpcFrame;
use crate::random::Random;

/// The default smoothing rate for gain, voicing, and frequency.
pub const DEFAULT_SPEED: f64 = 1.0/4096.0;

/// This is the synthesis half of the source-filter model.  A blend of a periodic pulse and white
/// noise drives an all-pole filter, and the result is scaled by the square root of the gain.
///
/// Every control parameter glides toward the target frame rather than jumping to it, and all
/// state survives from one call to play() to the next.  That is what lets a sequence of frames
/// recorded separately be played back as one continuous sound without clicks.  A player
/// belongs to a single voice: calls must be made sequentially, and primed again at the start
/// of each utterance.
pub struct LpcPlayer {
    pub speed: f64,
    order: usize,
    gain: f64,
    voice: f64,
    frequency: f64,
    phase: f64,
    filter: AllPoleFilter,
    random: Random
}

impl LpcPlayer {
    pub fn new(order: usize) -> Self {
        Self::with_random(order, Random::new())
    }

    /// Create a player that draws its noise from a specific random source.
    pub fn with_random(order: usize, random: Random) -> Self {
        Self {
            speed: DEFAULT_SPEED,
            order: order,
            gain: 1.0,
            voice: 1.0,
            frequency: 0.5,
            phase: 0.0,
            filter: AllPoleFilter::new(order),
            random: random
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn voice(&self) -> f64 {
        self.voice
    }

    /// The current oscillator frequency in cycles per sample.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// The oscillator phase in cycles.  It is not wrapped.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn coefficients(&self) -> &[f64] {
        self.filter.coefficients()
    }

    /// The delay line of past filter outputs and the slot the next output will be written to.
    pub fn history(&self) -> (&[f64], usize) {
        self.filter.history()
    }

    /// The random source shared by everything playing through this player.
    pub fn random(&mut self) -> &mut Random {
        &mut self.random
    }

    fn check_order(&self, frame: &LpcFrame) -> Result<()> {
        if frame.order() != self.order {
            return Err(LpcError::OrderMismatch {expected: self.order, found: frame.order()});
        }
        Ok(())
    }

    /// Jump directly to a frame, clearing the filter and restarting the oscillator.  Call this
    /// before the first play() of an utterance so it does not fade in from whatever was playing
    /// before.  frequency is in cycles per sample.
    pub fn prime(&mut self, frame: &LpcFrame, frequency: f64) -> Result<()> {
        self.check_order(frame)?;
        self.gain = frame.gain;
        self.voice = frame.voice;
        self.filter.set_coefficients(&frame.coefficients);
        self.filter.clear();
        self.frequency = frequency;
        self.phase = 0.0;
        Ok(())
    }

    /// Generate n_samples samples while gliding toward a frame.  frequency is in cycles per
    /// sample.
    pub fn play(&mut self, frame: &LpcFrame, frequency: f64, n_samples: usize, waveform: Waveform, pm: PhaseModulation) -> Result<Vec<f64>> {
        self.check_order(frame)?;
        let mut samples = Vec::with_capacity(n_samples);
        for _ in 0..n_samples {
            samples.push(self.step(frame, frequency, waveform, pm));
        }
        Ok(samples)
    }

    fn step(&mut self, frame: &LpcFrame, frequency: f64, waveform: Waveform, pm: PhaseModulation) -> f64 {
        // Mix the pulse with noise according to how voiced the sound is.

        let pulse = waveform.sample(self.phase, pm);
        let noise = 2.0*self.random.get_uniform() - 1.0;
        self.voice += (frame.voice-self.voice)*self.speed;
        let excitation = noise + (pulse-noise)*self.voice;
        self.gain += (frame.gain-self.gain)*self.speed;

        // Coefficients move between 2^-1 and 2^-5 of the way per sample.  Quiet frames settle
        // quickly, while loud ones change slowly enough that the filter stays stable.

        let exponent = (7.0 + self.gain.log10()).clamp(1.0, 5.0);
        let coefficient_speed = f64::powf(2.0, -exponent);
        self.filter.glide_coefficients(&frame.coefficients, coefficient_speed);
        let y = self.filter.process(excitation);
        let output = (y*self.gain.sqrt()).clamp(-1.0, 1.0);

        // Advance the oscillator.

        self.frequency += (frequency-self.frequency)*self.speed;
        self.phase += self.frequency;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_frames_adapt_fastest() {
        let target = LpcFrame::new(vec![1.0], 0.0, 0.0);
        let mut player = LpcPlayer::with_random(1, Random::with_seed(3));
        player.prime(&LpcFrame::new(vec![0.0], 0.0, 0.0), 0.01).unwrap();
        player.play(&target, 0.01, 1, Waveform::Sawtooth, PhaseModulation::default()).unwrap();
        assert!((player.coefficients()[0]-0.5).abs() < 1e-12);
    }

    #[test]
    fn loud_frames_adapt_slowest() {
        let target = LpcFrame::new(vec![1.0], 1.0, 0.0);
        let mut player = LpcPlayer::with_random(1, Random::with_seed(3));
        player.prime(&LpcFrame::new(vec![0.0], 1.0, 0.0), 0.01).unwrap();
        player.play(&target, 0.01, 1, Waveform::Sawtooth, PhaseModulation::default()).unwrap();
        assert!((player.coefficients()[0]-1.0/32.0).abs() < 1e-12);
    }
}
