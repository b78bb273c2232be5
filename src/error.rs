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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LpcError>;

/// Everything that can go wrong while analyzing recordings or synthesizing from them.
#[derive(Debug, Error)]
pub enum LpcError {
    /// A frame was handed to a player built for a different filter order.
    #[error("order of LPC player {expected} does not match order of frame {found}")]
    OrderMismatch {
        expected: usize,
        found: usize
    },

    #[error("LPC order must be at least 1")]
    InvalidOrder,

    #[error("invalid analysis settings: {0}")]
    InvalidAnalysis(String),

    #[error("frame size must be a positive number of seconds, got {0}")]
    InvalidFrameSize(f64),

    #[error("cannot synthesize {0} seconds of audio")]
    InvalidDuration(f64),

    #[error("a phoneme must contain at least one frame")]
    EmptyPhoneme,

    #[error("no phonemes could be loaded")]
    EmptyInventory,

    #[error("phoneme '{name}' has framerate {found}, expected {expected}")]
    FramerateMismatch {
        name: String,
        expected: u32,
        found: u32
    },

    #[error("frame {index} is out of range for {len} frames")]
    FrameIndex {
        index: usize,
        len: usize
    },

    #[error("unknown window type '{0}' (expected none, hann, hamming, or welch)")]
    UnknownWindow(String),

    #[error("unknown excitation waveform '{0}'")]
    UnknownWaveform(String),

    #[error("FFT length {fft_len} is too short for a filter of order {order}")]
    SpectrumSize {
        fft_len: usize,
        order: usize
    },

    #[error("unsupported audio input: {0}")]
    UnsupportedAudio(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Flac(#[from] claxon::Error)
}
