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

//! Reading recordings for analysis and writing synthesized audio.

use crate::error::{LpcError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Read the first channel of a WAV file as samples in [-1, 1], along with its framerate.
pub fn read_wav(path: impl AsRef<Path>) -> Result<(Vec<f64>, u32)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Int => {
            let scale = 1.0/(1i64 << (spec.bits_per_sample-1)) as f64;
            reader.samples::<i32>().step_by(channels).map(|s| -> Result<f64> {Ok(s? as f64*scale)}).collect::<Result<_>>()?
        }
        SampleFormat::Float => {
            reader.samples::<f32>().step_by(channels).map(|s| -> Result<f64> {Ok(s? as f64)}).collect::<Result<_>>()?
        }
    };
    Ok((samples, spec.sample_rate))
}

/// Read the first channel of a FLAC file as samples in [-1, 1], along with its framerate.
pub fn read_flac(path: impl AsRef<Path>) -> Result<(Vec<f64>, u32)> {
    let mut reader = claxon::FlacReader::open(path)?;
    let info = reader.streaminfo();
    let channels = info.channels.max(1) as usize;
    let scale = 1.0/(1i64 << (info.bits_per_sample-1)) as f64;
    let samples = reader.samples().step_by(channels).map(|s| -> Result<f64> {Ok(s? as f64*scale)}).collect::<Result<_>>()?;
    Ok((samples, info.sample_rate))
}

/// Read a recording, choosing the decoder from the file extension.
pub fn read_recording(path: impl AsRef<Path>) -> Result<(Vec<f64>, u32)> {
    let path = path.as_ref();
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
    match extension.as_str() {
        "wav" | "wave" => read_wav(path),
        "flac" => read_flac(path),
        _ => Err(LpcError::UnsupportedAudio(format!("cannot decode '{}'", path.display())))
    }
}

/// Convert samples in [-1, 1] to 16 bit PCM.
pub fn to_pcm16(samples: &[f64]) -> Vec<i16> {
    samples.iter().map(|s| (32767.0*s).round().clamp(i16::MIN as f64, i16::MAX as f64) as i16).collect()
}

/// Write samples as a mono 16 bit WAV file.
pub fn write_wav(path: impl AsRef<Path>, samples: &[f64], framerate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: framerate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int
    };
    let mut writer = WavWriter::create(path, spec)?;
    for sample in to_pcm16(samples) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
