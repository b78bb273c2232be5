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
use crate::audio::{to_pcm16, write_wav};
use crate::engine::LpcPlayer;
use crate::error::{LpcError, Result};
use crate::excitation::{PhaseModulation, Waveform};
use crate::frame::{AnalysisSession, LpcFrame, PhonemeFile};
use crate::MAX_SAMPLES;
use log::{error, info};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

/// Options for Console::render().
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Play the frames in random order, repeating short selections so there is enough audio
    /// to judge them.
    pub shuffle: bool,
    /// Loop the result seamlessly.  Otherwise half a second of silence separates repetitions.
    pub repeat: bool,
    /// The pitch to render at, in Hz.
    pub frequency: f64,
    pub waveform: Waveform,
    pub modulation: PhaseModulation
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: false,
            frequency: 90.0,
            waveform: Waveform::Sawtooth,
            modulation: PhaseModulation::default()
        }
    }
}

/// The audio currently being played.  Rendering publishes a complete new buffer by swapping it
/// in, so a reader never sees a partially written one.
pub struct PlaybackBuffer {
    data: Mutex<Arc<Vec<i16>>>
}

impl PlaybackBuffer {
    pub fn new() -> Self {
        Self {data: Mutex::new(Arc::new(vec![0]))}
    }

    pub fn publish(&self, samples: Vec<i16>) {
        let samples = if samples.is_empty() {vec![0]} else {samples};
        *lock(&self.data) = Arc::new(samples);
    }

    pub fn current(&self) -> Arc<Vec<i16>> {
        lock(&self.data).clone()
    }
}

impl Default for PlaybackBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads from a PlaybackBuffer on behalf of an audio device.  When the end of the buffer is
/// reached it loops back to the start, so the device is never starved even if rendering
/// takes longer than playback.  Whenever a new buffer is published, reading restarts from its
/// beginning.
///
/// The buffer is checked for a new publication once per call, so devices should read in
/// blocks with fill() or on_buffer_request() rather than one sample at a time.
pub struct BufferReader {
    buffer: Arc<PlaybackBuffer>,
    data: Arc<Vec<i16>>,
    index: usize
}

impl BufferReader {
    pub fn new(buffer: Arc<PlaybackBuffer>) -> Self {
        let data = buffer.current();
        Self {
            buffer: buffer,
            data: data,
            index: 0
        }
    }

    /// Switch to the latest published buffer if it has changed.
    fn sync(&mut self) {
        let current = self.buffer.current();
        if !Arc::ptr_eq(&current, &self.data) {
            self.data = current;
            self.index = 0;
        }
    }

    /// Copy the next out.len() samples into out, looping as needed.
    pub fn fill(&mut self, out: &mut [i16]) {
        self.sync();
        let mut filled = 0;
        while filled < out.len() {
            let n = usize::min(out.len()-filled, self.data.len()-self.index);
            out[filled..filled+n].copy_from_slice(&self.data[self.index..self.index+n]);
            filled += n;
            self.index = (self.index+n) % self.data.len();
        }
    }

    /// Get the next sample.
    pub fn next_sample(&mut self) -> i16 {
        let mut sample = [0];
        self.fill(&mut sample);
        sample[0]
    }

    /// Fill a device request for n samples, as little endian 16 bit PCM.
    pub fn on_buffer_request(&mut self, n: usize) -> Vec<u8> {
        let mut samples = vec![0; n];
        self.fill(&mut samples);
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// Restart from the beginning of the current buffer.
    pub fn rewind(&mut self) {
        self.index = 0;
    }
}

impl Iterator for BufferReader {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        Some(self.next_sample())
    }
}

/// An interactive workbench for the frames of one recording.  A selection of frames is
/// rendered on a worker thread and published to a PlaybackBuffer, which an audio device reads
/// through a BufferReader.  Selections can be exported to WAV files, or cut out and saved as
/// phonemes.
pub struct Console {
    frames: Vec<LpcFrame>,
    framerate: u32,
    player: Mutex<LpcPlayer>,
    buffer: Arc<PlaybackBuffer>
}

impl Console {
    pub fn new(frames: Vec<LpcFrame>, framerate: u32) -> Result<Self> {
        let order = match frames.first() {
            Some(frame) => frame.order(),
            None => return Err(LpcError::EmptyPhoneme)
        };
        Ok(Self::with_player(frames, framerate, LpcPlayer::new(order)))
    }

    pub fn with_player(frames: Vec<LpcFrame>, framerate: u32, player: LpcPlayer) -> Self {
        Self {
            frames: frames,
            framerate: framerate,
            player: Mutex::new(player),
            buffer: Arc::new(PlaybackBuffer::new())
        }
    }

    pub fn from_session(session: AnalysisSession) -> Result<Self> {
        Self::new(session.frames, session.framerate)
    }

    pub fn frames(&self) -> &[LpcFrame] {
        &self.frames
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn buffer(&self) -> Arc<PlaybackBuffer> {
        self.buffer.clone()
    }

    /// Create a reader an audio device can pull samples from.
    pub fn reader(&self) -> BufferReader {
        BufferReader::new(self.buffer.clone())
    }

    /// Play the frames with the given indices for duration seconds each.  An empty selection
    /// produces no samples.
    pub fn synthesize(&self, indices: &[usize], duration: f64, options: RenderOptions) -> Result<Vec<f64>> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(LpcError::InvalidDuration(duration));
        }
        if indices.is_empty() {
            return Ok(Vec::new());
        }
        let mut player = lock(&self.player);
        let mut indices = indices.to_vec();
        if options.shuffle {
            let copies = usize::max(1, 20/indices.len());
            indices = indices.repeat(copies);
            player.random().shuffle(&mut indices);
        }
        let frames = indices.iter().map(|&i| {
            self.frames.get(i).ok_or(LpcError::FrameIndex {index: i, len: self.frames.len()})
        }).collect::<Result<Vec<&LpcFrame>>>()?;
        let frequency = options.frequency/self.framerate as f64;
        let n_samples = (self.framerate as f64*duration).round();
        if n_samples*frames.len() as f64 > MAX_SAMPLES {
            return Err(LpcError::InvalidDuration(duration));
        }
        let n_samples = n_samples as usize;
        player.prime(frames[0], frequency)?;
        let mut samples = Vec::with_capacity(n_samples*frames.len());
        for frame in frames {
            samples.extend(player.play(frame, frequency, n_samples, options.waveform, options.modulation)?);
        }
        if !options.repeat {
            samples.resize(samples.len() + self.framerate as usize/2, 0.0);
        }
        info!("rendered {} frames into {} samples", indices.len(), samples.len());
        Ok(samples)
    }

    /// Synthesize a selection and publish the result as the new playback buffer.  An empty
    /// selection leaves the current buffer playing.
    pub fn render(&self, indices: &[usize], duration: f64, options: RenderOptions) -> Result<()> {
        if indices.is_empty() {
            return Ok(());
        }
        let samples = self.synthesize(indices, duration, options)?;
        self.buffer.publish(to_pcm16(&samples));
        Ok(())
    }

    /// Render on a worker thread.  Renders are serialized by the player lock, and each one is
    /// published only once it is complete.  A failed render is logged and leaves the current
    /// buffer playing.
    pub fn render_in_background(self: &Arc<Self>, indices: Vec<usize>, duration: f64, options: RenderOptions) -> JoinHandle<Result<()>> {
        let console = self.clone();
        thread::spawn(move || {
            let result = console.render(&indices, duration, options);
            if let Err(e) = &result {
                error!("render failed: {e}");
            }
            result
        })
    }

    /// Synthesize a selection into a 16 bit WAV file instead of the playback buffer.
    pub fn export(&self, indices: &[usize], duration: f64, options: RenderOptions, path: impl AsRef<Path>) -> Result<()> {
        let samples = self.synthesize(indices, duration, options)?;
        write_wav(path.as_ref(), &samples, self.framerate)?;
        info!("exported {} samples to {}", samples.len(), path.as_ref().display());
        Ok(())
    }

    /// A one line summary of a frame: its gain, how voiced it is, and where its envelope peaks.
    pub fn describe(&self, index: usize) -> Result<String> {
        let frame = self.frames.get(index).ok_or(LpcError::FrameIndex {index: index, len: self.frames.len()})?;
        let fft_len = usize::max(512, (frame.order()+1).next_power_of_two());
        let peak = frame.peak_frequency(self.framerate, fft_len)?;
        Ok(format!("frame {index}: gain {:.3e}, voice {:.2}, peak {:.0} Hz", frame.gain, frame.voice, peak))
    }

    /// Cut out the frames in a range, which may be given in either order, as a phoneme.  The
    /// range is clipped to the recording, and must still contain at least one frame.
    pub fn phoneme(&self, start: usize, end: usize, continuous: bool) -> Result<PhonemeFile> {
        let (start, end) = (usize::min(start, end), usize::max(start, end));
        let end = usize::min(end, self.frames.len());
        if start >= end {
            return Err(LpcError::EmptyPhoneme);
        }
        Ok(PhonemeFile {
            framerate: self.framerate,
            order: Some(self.frames[start].order()),
            continuous: continuous,
            frames: self.frames[start..end].to_vec()
        })
    }
}

/// Lock a mutex, recovering the guard if a render panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
