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

use lpc_voice::audio::read_wav;
use lpc_voice::console::{BufferReader, Console, PlaybackBuffer, RenderOptions};
use lpc_voice::random::Random;
use lpc_voice::excitation::Waveform;
use lpc_voice::{AnalysisSession, LpcError, LpcFrame, LpcPlayer};
use lpc_voice::window::WindowType;
use std::sync::Arc;

fn console() -> Console {
    let frames = (0..6).map(|i| LpcFrame::new(vec![-0.5, 0.1*i as f64], 0.01, 0.5)).collect();
    Console::with_player(frames, 1000, LpcPlayer::with_random(2, Random::with_seed(31)))
}

fn options(shuffle: bool, repeat: bool) -> RenderOptions {
    RenderOptions {shuffle: shuffle, repeat: repeat, ..RenderOptions::default()}
}

fn buffer_len(console: &Console) -> usize {
    console.buffer().current().len()
}

#[test]
fn test_reader_wraps_around() {
    let buffer = Arc::new(PlaybackBuffer::new());
    let mut reader = BufferReader::new(buffer.clone());
    buffer.publish(vec![1, 2, 3]);
    let bytes = reader.on_buffer_request(5);
    let expected: Vec<u8> = [1i16, 2, 3, 1, 2].iter().flat_map(|s| s.to_le_bytes()).collect();
    assert_eq!(expected, bytes);
    assert_eq!(vec![3, 1, 2, 3], reader.by_ref().take(4).collect::<Vec<i16>>());
}

#[test]
fn test_publish_restarts_reader() {
    let buffer = Arc::new(PlaybackBuffer::new());
    buffer.publish(vec![1, 2, 3]);
    let mut reader = BufferReader::new(buffer.clone());
    assert_eq!(1, reader.next_sample());
    assert_eq!(2, reader.next_sample());
    buffer.publish(vec![-7, 8]);
    assert_eq!(-7, reader.next_sample());
    assert_eq!(8, reader.next_sample());
    assert_eq!(-7, reader.next_sample());
    reader.next_sample();
    reader.rewind();
    assert_eq!(-7, reader.next_sample());
}

#[test]
fn test_empty_buffer_plays_silence() {
    let buffer = Arc::new(PlaybackBuffer::new());
    buffer.publish(vec![]);
    let mut reader = BufferReader::new(buffer);
    assert_eq!(vec![0u8; 8], reader.on_buffer_request(4));
}

#[test]
fn test_render_lengths() {
    let console = console();
    console.render(&[0, 1, 2], 0.01, options(false, true)).unwrap();
    assert_eq!(30, buffer_len(&console));
    console.render(&[0, 1, 2], 0.02, options(false, false)).unwrap();
    assert_eq!(60 + 500, buffer_len(&console));

    // Shuffled selections are repeated until there are about 20 frames.
    console.render(&[4, 5], 0.01, options(true, true)).unwrap();
    assert_eq!(200, buffer_len(&console));
    console.render(&[0, 1, 2], 0.01, options(true, true)).unwrap();
    assert_eq!(180, buffer_len(&console));
    let all: Vec<usize> = (0..6).cycle().take(30).collect();
    console.render(&all, 0.01, options(true, true)).unwrap();
    assert_eq!(300, buffer_len(&console));
}

#[test]
fn test_render_errors() {
    let console = console();
    console.render(&[0], 0.01, options(false, true)).unwrap();
    let before = console.buffer().current();
    console.render(&[], 0.01, RenderOptions::default()).unwrap();
    assert!(Arc::ptr_eq(&before, &console.buffer().current()));
    match console.render(&[1, 9], 0.01, RenderOptions::default()) {
        Err(LpcError::FrameIndex {index, len}) => {
            assert_eq!(9, index);
            assert_eq!(6, len);
        }
        _ => panic!("out of range frame was accepted")
    }
    assert!(Arc::ptr_eq(&before, &console.buffer().current()));
}

#[test]
fn test_render_in_background() {
    let console = Arc::new(console());
    let mut reader = console.reader();
    let handle = console.render_in_background(vec![0, 1], 0.05, options(false, true));
    handle.join().unwrap().unwrap();
    assert_eq!(100, buffer_len(&console));
    let samples: Vec<i16> = reader.by_ref().take(200).collect();
    assert_eq!(samples[..100], samples[100..]);
}

#[test]
fn test_cut_phoneme() {
    let console = console();
    let phoneme = console.phoneme(4, 2, true).unwrap();
    assert_eq!(1000, phoneme.framerate);
    assert_eq!(Some(2), phoneme.order);
    assert!(phoneme.continuous);
    assert_eq!(console.frames()[2..4].to_vec(), phoneme.frames);
    assert_eq!(2, console.phoneme(4, 100, false).unwrap().frames.len());
    assert!(matches!(console.phoneme(50, 60, false), Err(LpcError::EmptyPhoneme)));
    assert!(matches!(console.phoneme(3, 3, false), Err(LpcError::EmptyPhoneme)));
}

#[test]
fn test_reader_fill() {
    let buffer = Arc::new(PlaybackBuffer::new());
    buffer.publish(vec![1, 2, 3]);
    let mut reader = BufferReader::new(buffer.clone());
    let mut block = [0i16; 7];
    reader.fill(&mut block);
    assert_eq!([1, 2, 3, 1, 2, 3, 1], block);
    let mut block = [0i16; 2];
    reader.fill(&mut block);
    assert_eq!([2, 3], block);

    // A new buffer is picked up at the start of the next block.
    buffer.publish(vec![5, 6, 7, 8]);
    let mut block = [0i16; 6];
    reader.fill(&mut block);
    assert_eq!([5, 6, 7, 8, 5, 6], block);
    reader.fill(&mut []);
    assert_eq!(7, reader.next_sample());
}

#[test]
fn test_background_render_failure() {
    let console = Arc::new(console());
    console.render(&[0], 0.01, options(false, true)).unwrap();
    let before = console.buffer().current();
    let handle = console.render_in_background(vec![2, 40], 0.01, options(false, true));
    assert!(matches!(handle.join().unwrap(), Err(LpcError::FrameIndex {index: 40, len: 6})));
    assert!(Arc::ptr_eq(&before, &console.buffer().current()));
    let handle = console.render_in_background(vec![0], f64::INFINITY, options(false, true));
    assert!(matches!(handle.join().unwrap(), Err(LpcError::InvalidDuration(_))));
}

#[test]
fn test_render_pitch_and_waveform() {
    let console = Arc::new(console());
    let render = |options: RenderOptions| {
        console.render_in_background(vec![0, 1, 2, 3], 0.05, options).join().unwrap().unwrap();
        console.buffer().current()
    };
    let low = render(RenderOptions {frequency: 50.0, ..options(false, true)});
    let high = render(RenderOptions {frequency: 200.0, ..options(false, true)});
    let square = render(RenderOptions {frequency: 50.0, waveform: Waveform::Square, ..options(false, true)});
    assert_eq!(low.len(), high.len());
    assert_ne!(low, high);
    assert_ne!(low, square);
}

#[test]
fn test_export() {
    let console = console();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.wav");
    console.export(&[0, 1, 2], 0.02, options(false, false), &path).unwrap();
    let (samples, framerate) = read_wav(&path).unwrap();
    assert_eq!(1000, framerate);
    assert_eq!(60 + 500, samples.len());

    // Exporting leaves the playback buffer alone.
    assert_eq!(1, buffer_len(&console));
    assert!(console.export(&[8], 0.02, options(false, true), &path).is_err());
}

#[test]
fn test_from_session() {
    let session = AnalysisSession {
        framerate: 8000,
        step_size: 80,
        window_size: 160,
        window_type: WindowType::None,
        order: 1,
        frames: vec![LpcFrame::new(vec![0.5], 0.1, 0.5)]
    };
    let console = Console::from_session(session).unwrap();
    assert_eq!(8000, console.framerate());
    assert_eq!(1, console.frames().len());
    assert!(matches!(Console::new(vec![], 8000), Err(LpcError::EmptyPhoneme)));
}

#[test]
fn test_describe() {
    let console = console();
    let text = console.describe(3).unwrap();
    assert!(text.starts_with("frame 3: gain 1.000e-2, voice 0.50"));
    assert!(text.ends_with(" Hz"));
    assert!(matches!(console.describe(6), Err(LpcError::FrameIndex {index: 6, len: 6})));
}
