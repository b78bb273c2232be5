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

use crate::engine::LpcPlayer;
use crate::error::{LpcError, Result};
use crate::excitation::{PhaseModulation, Waveform};
use crate::frame::{LpcFrame, PhonemeFile};
use crate::random::Random;
use crate::{DEFAULT_FRAME_SIZE, MAX_SAMPLES};

/// Options that control how a Phoneme is played.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayOptions {
    /// The time each frame is played for, in seconds.
    pub frame_size: f64,
    /// The maximum relative deviation of the pitch random walk.
    pub vibrato: f64,
    pub waveform: Waveform,
    pub modulation: PhaseModulation
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            vibrato: 0.0,
            waveform: Waveform::Sawtooth,
            modulation: PhaseModulation::default()
        }
    }
}

/// A single sound, modelled as the sequence of frames it was recorded as.
///
/// A continuous phoneme is a steady sound, such as a vowel, whose frames are interchangeable
/// samples of one posture.  It can be held for any length of time.  Other phonemes, such as
/// stop consonants, are trajectories that always play their frames once in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Phoneme {
    frames: Vec<LpcFrame>,
    continuous: bool,
    framerate: u32
}

impl Phoneme {
    /// Create a Phoneme.  There must be at least one frame, and all of them must have the
    /// same order.
    pub fn new(frames: Vec<LpcFrame>, continuous: bool, framerate: u32) -> Result<Self> {
        let order = match frames.first() {
            Some(frame) => frame.order(),
            None => return Err(LpcError::EmptyPhoneme)
        };
        if order == 0 {
            return Err(LpcError::InvalidOrder);
        }
        if let Some(frame) = frames.iter().find(|f| f.order() != order) {
            return Err(LpcError::OrderMismatch {expected: order, found: frame.order()});
        }
        Ok(Self {
            frames: frames,
            continuous: continuous,
            framerate: framerate
        })
    }

    pub fn from_file(file: PhonemeFile) -> Result<Self> {
        Self::new(file.frames, file.continuous, file.framerate)
    }

    pub fn to_file(&self) -> PhonemeFile {
        PhonemeFile {
            framerate: self.framerate,
            order: Some(self.order()),
            continuous: self.continuous,
            frames: self.frames.clone()
        }
    }

    pub fn frames(&self) -> &[LpcFrame] {
        &self.frames
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn order(&self) -> usize {
        self.frames[0].order()
    }

    /// The length of the phoneme when its frames are each played once for the standard
    /// frame size, in seconds.
    pub fn natural_length(&self) -> f64 {
        self.frames.len() as f64*DEFAULT_FRAME_SIZE
    }

    /// Play the phoneme through a player.
    ///
    /// A continuous phoneme with a non-negative duration fills the duration with frames chosen
    /// at random from the recorded ones.  Otherwise the recorded frames are played once, in
    /// order, and the duration is ignored.  frequency is in Hz.  If prime is true, the player
    /// jumps directly to the first frame instead of gliding from its current state.
    pub fn play_on(&self, player: &mut LpcPlayer, duration: f64, frequency: f64, prime: bool, options: &PlayOptions) -> Result<Vec<f64>> {
        if player.order() != self.order() {
            return Err(LpcError::OrderMismatch {expected: player.order(), found: self.order()});
        }
        if !(options.frame_size > 0.0 && options.frame_size.is_finite()) {
            return Err(LpcError::InvalidFrameSize(options.frame_size));
        }
        let frame_count = self.frame_count(duration, options.frame_size);
        let samples_per_frame = (options.frame_size*self.framerate as f64).round();
        if !(frame_count <= MAX_SAMPLES && frame_count*samples_per_frame <= MAX_SAMPLES) {
            return Err(LpcError::InvalidDuration(duration));
        }
        let samples_per_frame = samples_per_frame as usize;
        let frame_indices = self.frame_indices(duration, options.frame_size, player.random());
        let mut samples = Vec::with_capacity(samples_per_frame*frame_indices.len());
        let cycles_per_sample = frequency/self.framerate as f64;
        if prime {
            let first = frame_indices.first().copied().unwrap_or(0);
            player.prime(&self.frames[first], cycles_per_sample)?;
        }
        let mut vibrato = VibratoWalk::new(options.vibrato);
        for i in frame_indices {
            let offset = vibrato.step(player.random());
            let played = player.play(&self.frames[i], cycles_per_sample*(1.0+offset), samples_per_frame, options.waveform, options.modulation)?;
            samples.extend(played);
        }
        Ok(samples)
    }

    /// Whether play_on() fills the duration with randomly chosen frames.
    fn is_random(&self, duration: f64) -> bool {
        self.continuous && !(duration < 0.0)
    }

    /// How many frames play_on() plays.  This is NaN or infinite for a continuous phoneme
    /// asked to fill an unplayable duration.
    fn frame_count(&self, duration: f64, frame_size: f64) -> f64 {
        if self.is_random(duration) {
            // The small offset keeps durations that are exact multiples of the frame size from
            // losing a frame to rounding.
            ((duration + frame_size*0.00099)/frame_size).floor()
        }
        else {
            self.frames.len() as f64
        }
    }

    /// Choose which recorded frames to play.  A continuous phoneme fills the duration with
    /// frames drawn uniformly at random, with replacement.  Otherwise every frame plays once,
    /// in order.
    pub(crate) fn frame_indices(&self, duration: f64, frame_size: f64, random: &mut Random) -> Vec<usize> {
        if self.is_random(duration) {
            let n_frames = self.frame_count(duration, frame_size) as usize;
            (0..n_frames).map(|_| random.get_index(self.frames.len())).collect()
        }
        else {
            (0..self.frames.len()).collect()
        }
    }
}

/// A bounded random walk of the relative pitch offset.  Each step moves by up to half the
/// depth in either direction, and the offset never leaves [-depth, depth].  A depth that is
/// not finite gives no vibrato.
pub(crate) struct VibratoWalk {
    depth: f64,
    value: f64
}

impl VibratoWalk {
    pub(crate) fn new(depth: f64) -> Self {
        Self {
            depth: if depth.is_finite() {depth.abs()} else {0.0},
            value: 0.0
        }
    }

    pub(crate) fn step(&mut self, random: &mut Random) -> f64 {
        self.value += random.get_uniform()*self.depth - self.depth/2.0;
        self.value = f64::clamp(self.value, -self.depth, self.depth);
        self.value
    }
}
