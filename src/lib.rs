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

pub mod error;
pub mod window;
pub mod burg;
pub mod analyze;
pub mod frame;
pub mod spectrum;
pub mod excitation;
pub mod filter;
pub mod engine;
pub mod phoneme;
pub mod sound;
pub mod phonology;
pub mod console;
pub mod audio;
pub mod random;

pub use error::{LpcError, Result};
pub use frame::{AnalysisSession, JsonFile, LpcFrame, PhonemeFile};
pub use engine::LpcPlayer;
pub use phoneme::{Phoneme, PlayOptions};
pub use phonology::{Phonology, SingOptions, SpeakOptions};

/// The standard time each frame is played for, in seconds.
pub const DEFAULT_FRAME_SIZE: f64 = 0.01;

/// The pause after each spoken word, in seconds.
pub const WORD_GAP: f64 = 0.1;

/// The most samples a single call will synthesize, about 12 hours at 48 kHz.
pub(crate) const MAX_SAMPLES: f64 = 2.0e9;
