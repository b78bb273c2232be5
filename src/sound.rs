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

const PRIME_MARKER: char = '\'';
const REST_MARKERS: [(char, f64); 3] = [(',', 0.2), (';', 0.4), ('.', 0.6)];
const LENGTH_MARKERS: [(char, f64); 2] = [('!', 1.5), ('~', 1.0/1.5)];
const PITCH_MARKERS: [(char, f64); 2] = [('>', 1.029302236643492), ('<', 0.9715319411536059)];

/// Uppercase sound names are stressed: they are sung 200 cents higher.
pub const STRESS_PITCH: f64 = 1.122462048309373;

/// One hyphen-separated sound from a line of text, along with everything its markers say
/// about how to play it.
///
/// - A leading `'` makes the player jump to the sound instead of gliding into it.
/// - `,` `;` and `.` insert 0.2, 0.4, or 0.6 seconds of silence before the sound.
/// - `!` makes the sound 1.5 times longer and `~` makes it 1.5 times shorter.
/// - `>` raises the pitch by 50 cents and `<` lowers it by 50 cents.
/// - A name written in uppercase is stressed.
///
/// Repeated markers accumulate.  Markers may appear in any order, either before or after the
/// name.  Sounds are created by calling Sound::parse().
#[derive(Clone, Debug, PartialEq)]
pub struct Sound {
    pub name: String,
    pub prime: bool,
    pub rest: f64,
    pub length: f64,
    pub pitch: f64
}

impl Sound {
    pub fn parse(token: &str) -> Sound {
        let mut sound = Sound {
            name: String::new(),
            prime: false,
            rest: 0.0,
            length: 1.0,
            pitch: 1.0
        };
        let mut rest = token;
        if let Some(stripped) = rest.strip_prefix(PRIME_MARKER) {
            sound.prime = true;
            rest = stripped;
        }

        // Consume markers from the front, then from the back.  Whatever is left is the name.

        let mut start = rest.len();
        for (i, c) in rest.char_indices() {
            if !sound.apply_marker(c) {
                start = i;
                break;
            }
        }
        let mut end = rest.len();
        if start < rest.len() {
            for (i, c) in rest[start..].char_indices().rev() {
                if !sound.apply_marker(c) {
                    end = start+i+c.len_utf8();
                    break;
                }
            }
        }
        let name = &rest[start..usize::max(start, end)];
        if is_uppercase(name) {
            sound.name = name.to_lowercase();
            sound.pitch *= STRESS_PITCH;
        }
        else {
            sound.name = name.to_string();
        }
        sound
    }

    /// If c is a rest, length, or pitch marker, record its effect and return true.
    fn apply_marker(&mut self, c: char) -> bool {
        if let Some((_, seconds)) = REST_MARKERS.iter().find(|(m, _)| *m == c) {
            self.rest += seconds;
            return true;
        }
        if let Some((_, factor)) = LENGTH_MARKERS.iter().find(|(m, _)| *m == c) {
            self.length *= factor;
            return true;
        }
        if let Some((_, factor)) = PITCH_MARKERS.iter().find(|(m, _)| *m == c) {
            self.pitch *= factor;
            return true;
        }
        false
    }
}

/// True if the string contains at least one cased character and no lowercase ones.
fn is_uppercase(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Split a word into its hyphen-separated sounds.
pub fn split_word(word: &str) -> Vec<Sound> {
    word.split('-').map(Sound::parse).collect()
}
