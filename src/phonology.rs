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
use crate::frame::{JsonFile, PhonemeFile};
use crate::phoneme::{Phoneme, PlayOptions};
use crate::random::Random;
use crate::sound::split_word;
use crate::WORD_GAP;
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// Options for speaking a line of text with play_str().
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeakOptions {
    /// The pitch of unmarked sounds, in Hz.
    pub base_freq: f64,
    /// The length of a continuous sound with no length markers, in seconds.
    pub phoneme_len: f64,
    pub vibrato: f64
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            base_freq: 100.0,
            phoneme_len: 0.15,
            vibrato: 0.03
        }
    }
}

/// Options for singing a line of text with sing_str().  Every word is one note.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SingOptions {
    /// The pitch of the note, in Hz.
    pub base_freq: f64,
    pub phoneme_len: f64,
    /// The length of each note, in seconds.
    pub duration: f64,
    pub vibrato: f64,
    pub waveform: Waveform,
    pub modulation: PhaseModulation
}

impl Default for SingOptions {
    fn default() -> Self {
        Self {
            base_freq: 100.0,
            phoneme_len: 0.15,
            duration: 0.25,
            vibrato: 0.03,
            waveform: Waveform::Sawtooth,
            modulation: PhaseModulation::default()
        }
    }
}

/// The sound inventory of a language, and the player that speaks it.
///
/// Text is a sequence of whitespace-separated words, each made of hyphen-separated sounds
/// (see Sound for the markers that can decorate them).  Each word starts from a primed player
/// and glides between its sounds, so only the sounds inside a word are joined together.
pub struct Phonology {
    phonemes: BTreeMap<String, Phoneme>,
    framerate: u32,
    player: LpcPlayer
}

impl Phonology {
    pub fn new(phonemes: BTreeMap<String, Phoneme>) -> Result<Self> {
        Self::with_random(phonemes, Random::new())
    }

    /// Create a Phonology whose player draws from a specific random source.  All phonemes must
    /// share one order and one framerate.
    pub fn with_random(phonemes: BTreeMap<String, Phoneme>, random: Random) -> Result<Self> {
        let (order, framerate) = match phonemes.values().next() {
            Some(first) => (first.order(), first.framerate()),
            None => return Err(LpcError::EmptyInventory)
        };
        for (name, phoneme) in &phonemes {
            if phoneme.order() != order {
                return Err(LpcError::OrderMismatch {expected: order, found: phoneme.order()});
            }
            if phoneme.framerate() != framerate {
                return Err(LpcError::FramerateMismatch {name: name.clone(), expected: framerate, found: phoneme.framerate()});
            }
        }
        Ok(Self {
            phonemes: phonemes,
            framerate: framerate,
            player: LpcPlayer::with_random(order, random)
        })
    }

    /// Load the phonemes stored as `<name>.json` in a directory.  Files that cannot be read are
    /// reported and left out.
    pub fn load_phonemes(names: &[&str], dir: impl AsRef<Path>) -> BTreeMap<String, Phoneme> {
        let dir = dir.as_ref();
        let mut phonemes = BTreeMap::new();
        for name in names {
            let path = dir.join(format!("{name}.json"));
            match PhonemeFile::load(&path).and_then(Phoneme::from_file) {
                Ok(phoneme) => {
                    phonemes.insert(name.to_lowercase(), phoneme);
                }
                Err(e) => warn!("Error loading phoneme {name} from {}: {e}", path.display())
            }
        }
        info!("loaded {} of {} phonemes from {}", phonemes.len(), names.len(), dir.display());
        phonemes
    }

    pub fn load(names: &[&str], dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(Self::load_phonemes(names, dir))
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn order(&self) -> usize {
        self.player.order()
    }

    pub fn get(&self, name: &str) -> Option<&Phoneme> {
        self.phonemes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.phonemes.keys().map(String::as_str)
    }

    pub fn player(&mut self) -> &mut LpcPlayer {
        &mut self.player
    }

    /// Speak a line of text.  Unknown sounds are skipped, and every word is followed by a short
    /// pause.
    pub fn play_str(&mut self, sentence: &str, options: &SpeakOptions) -> Result<Vec<f64>> {
        let play_options = PlayOptions {
            vibrato: options.vibrato,
            ..PlayOptions::default()
        };
        let mut samples = Vec::new();
        for word in sentence.split_whitespace() {
            let mut prime = true;
            for sound in split_word(word) {
                if sound.prime {
                    prime = true;
                }
                if sound.rest > 0.0 {
                    samples.extend(self.silence(sound.rest));
                }
                if sound.name.is_empty() {
                    continue;
                }
                match self.phonemes.get(&sound.name) {
                    Some(phoneme) => {
                        let played = phoneme.play_on(&mut self.player, options.phoneme_len*sound.length, options.base_freq*sound.pitch, prime, &play_options)?;
                        samples.extend(played);
                        prime = false;
                    }
                    None => warn!("skipping unknown sound '{}' in '{word}'", sound.name)
                }
            }
            samples.extend(self.silence(WORD_GAP));
        }
        Ok(samples)
    }

    /// Sing a line of text with one note per word.  Sounds that are not continuous keep their
    /// natural length, and the continuous ones share whatever is left of the note equally.
    pub fn sing_str(&mut self, sentence: &str, options: &SingOptions) -> Result<Vec<f64>> {
        let play_options = PlayOptions {
            vibrato: options.vibrato,
            waveform: options.waveform,
            modulation: options.modulation,
            ..PlayOptions::default()
        };
        let mut samples = Vec::new();
        for word in sentence.split_whitespace() {
            let mut prime = true;
            for (name, length) in self.note_lengths(word, options.duration) {
                let phoneme = &self.phonemes[&name];
                let played = phoneme.play_on(&mut self.player, length, options.base_freq, prime, &play_options)?;
                samples.extend(played);
                prime = false;
            }
        }
        Ok(samples)
    }

    /// Divide one note's duration among the sounds of a word.  Unknown sounds are skipped.
    ///
    /// If the fixed-length sounds are longer than the note, the continuous ones receive a
    /// negative length, which makes them play their recorded frames once.
    pub fn note_lengths(&self, word: &str, duration: f64) -> Vec<(String, f64)> {
        let mut known = Vec::new();
        for name in word.split('-') {
            match self.phonemes.get(name) {
                Some(phoneme) => known.push((name, phoneme)),
                None => warn!("skipping unknown sound '{name}' in '{word}'")
            }
        }
        let mut remaining = duration;
        let mut continuous_count = 0;
        for (_, phoneme) in &known {
            if phoneme.is_continuous() {
                continuous_count += 1;
            }
            else {
                remaining -= phoneme.natural_length();
            }
        }
        known.iter().map(|(name, phoneme)| {
            let length = if phoneme.is_continuous() {remaining/continuous_count as f64} else {phoneme.natural_length()};
            (name.to_string(), length)
        }).collect()
    }

    fn silence(&self, seconds: f64) -> Vec<f64> {
        vec![0.0; (seconds*self.framerate as f64).round() as usize]
    }
}
