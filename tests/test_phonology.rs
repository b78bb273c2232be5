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

use lpc_voice::random::Random;
use lpc_voice::{JsonFile, LpcError, LpcFrame, Phoneme, Phonology, SingOptions, SpeakOptions};
use std::collections::BTreeMap;

const FRAMERATE: u32 = 1000;

fn phoneme(n_frames: usize, continuous: bool, order: usize) -> Phoneme {
    let frames = (0..n_frames).map(|i| LpcFrame::new(vec![-0.3; order], 0.001*(i+1) as f64, 0.8)).collect();
    Phoneme::new(frames, continuous, FRAMERATE).unwrap()
}

fn inventory() -> BTreeMap<String, Phoneme> {
    let mut phonemes = BTreeMap::new();
    phonemes.insert("a".to_string(), phoneme(3, true, 2));
    phonemes.insert("i".to_string(), phoneme(4, true, 2));
    phonemes.insert("p".to_string(), phoneme(5, false, 2));
    phonemes
}

fn phonology() -> Phonology {
    Phonology::with_random(inventory(), Random::with_seed(21)).unwrap()
}

fn quiet() -> SpeakOptions {
    SpeakOptions {vibrato: 0.0, ..SpeakOptions::default()}
}

#[test]
fn test_note_lengths() {
    let phonology = phonology();
    let lengths = phonology.note_lengths("p-a", 1.0);
    assert_eq!(2, lengths.len());
    assert_eq!("p", lengths[0].0);
    assert!((lengths[0].1 - 0.05).abs() < 1e-12);
    assert_eq!("a", lengths[1].0);
    assert!((lengths[1].1 - 0.95).abs() < 1e-12);

    // Continuous sounds split what is left of the note.
    let lengths = phonology.note_lengths("a-p-i", 0.45);
    assert!((lengths[0].1 - 0.2).abs() < 1e-12);
    assert!((lengths[2].1 - 0.2).abs() < 1e-12);

    // Unknown sounds take no time.
    let lengths = phonology.note_lengths("x-a", 0.5);
    assert_eq!(1, lengths.len());
    assert!((lengths[0].1 - 0.5).abs() < 1e-12);
}

#[test]
fn test_sing_str() {
    let mut phonology = phonology();
    let options = SingOptions {duration: 1.0, vibrato: 0.0, ..SingOptions::default()};
    let samples = phonology.sing_str("p-a", &options).unwrap();
    assert_eq!(1000, samples.len());
    let samples = phonology.sing_str("p-a a", &options).unwrap();
    assert_eq!(2000, samples.len());
    assert!(samples.iter().all(|s| s.abs() <= 1.0));
}

#[test]
fn test_sing_str_too_short() {
    // The consonant is longer than the note, so the vowel plays its recorded frames once.
    let mut phonology = phonology();
    let options = SingOptions {duration: 0.02, vibrato: 0.0, ..SingOptions::default()};
    let samples = phonology.sing_str("p-a", &options).unwrap();
    assert_eq!(50 + 30, samples.len());
}

#[test]
fn test_play_str() {
    let mut phonology = phonology();
    let samples = phonology.play_str("a", &quiet()).unwrap();
    assert_eq!(150 + 100, samples.len());
    assert!(samples[150..].iter().all(|s| *s == 0.0));
    let samples = phonology.play_str("p-a", &quiet()).unwrap();
    assert_eq!(50 + 150 + 100, samples.len());
}

#[test]
fn test_play_str_markers() {
    let mut phonology = phonology();
    let samples = phonology.play_str(",a", &quiet()).unwrap();
    assert_eq!(200 + 150 + 100, samples.len());
    assert!(samples[..200].iter().all(|s| *s == 0.0));
    let samples = phonology.play_str("a!", &quiet()).unwrap();
    assert_eq!(220 + 100, samples.len());
    let samples = phonology.play_str("'A~ i", &quiet()).unwrap();
    assert_eq!(100 + 100 + 150 + 100, samples.len());
}

#[test]
fn test_unknown_sounds_are_skipped() {
    let mut phonology = phonology();
    let samples = phonology.play_str("a-zz qq", &quiet()).unwrap();
    assert_eq!(150 + 100 + 100, samples.len());
}

#[test]
fn test_inventory_checks() {
    let mut phonemes = inventory();
    phonemes.insert("u".to_string(), phoneme(2, true, 3));
    assert!(matches!(Phonology::new(phonemes), Err(LpcError::OrderMismatch {..})));
    let mut phonemes = inventory();
    let frames = vec![LpcFrame::new(vec![0.0; 2], 1.0, 1.0)];
    phonemes.insert("u".to_string(), Phoneme::new(frames, true, 8000).unwrap());
    assert!(matches!(Phonology::new(phonemes), Err(LpcError::FramerateMismatch {..})));
    assert!(matches!(Phonology::new(BTreeMap::new()), Err(LpcError::EmptyInventory)));
    let phonology = phonology();
    assert_eq!(2, phonology.order());
    assert_eq!(FRAMERATE, phonology.framerate());
    assert_eq!(vec!["a", "i", "p"], phonology.names().collect::<Vec<_>>());
}

#[test]
fn test_load() {
    let dir = tempfile::tempdir().unwrap();
    phoneme(3, true, 2).to_file().save(dir.path().join("a.json")).unwrap();
    phoneme(5, false, 2).to_file().save(dir.path().join("P.json")).unwrap();
    std::fs::write(dir.path().join("bad.json"), "{\"framerate\": ").unwrap();
    let phonology = Phonology::load(&["a", "P", "bad", "missing"], dir.path()).unwrap();
    assert_eq!(vec!["a", "p"], phonology.names().collect::<Vec<_>>());
    assert!(!phonology.get("p").unwrap().is_continuous());
    assert!(matches!(Phonology::load(&["bad"], dir.path()), Err(LpcError::EmptyInventory)));
}

#[test]
fn test_seeded_output_repeats() {
    let options = SpeakOptions::default();
    let a = phonology().play_str("p-a-i a", &options).unwrap();
    let b = phonology().play_str("p-a-i a", &options).unwrap();
    assert_eq!(a, b);
}
