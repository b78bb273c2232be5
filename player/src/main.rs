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

use lpc_voice::analyze::{analyze_session, AnalysisConfig};
use lpc_voice::audio::{read_recording, write_wav};
use lpc_voice::console::{BufferReader, Console, RenderOptions};
use lpc_voice::excitation::{PhaseModulation, Waveform};
use lpc_voice::window::WindowType;
use lpc_voice::{AnalysisSession, JsonFile, Phonology, SingOptions, SpeakOptions, DEFAULT_FRAME_SIZE};

use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink, Source};
use simple_logger::SimpleLogger;
use std::error::Error;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

type CommandResult = Result<(), Box<dyn Error>>;

/// Analyze recordings into LPC frames, and speak or sing with them.
#[derive(Parser, Debug)]
#[command(name = "player", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a WAV or FLAC recording into a session of LPC frames
    Analyze {
        /// Recording to analyze
        input: PathBuf,
        /// Session file to write
        output: PathBuf,
        /// Number of filter coefficients per frame
        #[arg(long, default_value_t = 48)]
        order: usize,
        /// Window applied to each block before analysis
        #[arg(long, default_value_t = WindowType::None)]
        window_type: WindowType,
        /// Seconds between the starts of consecutive frames
        #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
        step: f64,
        /// Seconds of audio analyzed per frame (0 uses the step)
        #[arg(long, default_value_t = 0.0)]
        window: f64
    },

    /// Speak text using a directory of phoneme files
    Say {
        /// Directory of phoneme JSON files
        dir: PathBuf,
        /// Text to speak
        text: String,
        /// Pitch of unmarked sounds, in Hz
        #[arg(short, long, default_value_t = SpeakOptions::default().base_freq)]
        frequency: f64,
        /// Length of a continuous sound, in seconds
        #[arg(long, default_value_t = SpeakOptions::default().phoneme_len)]
        phoneme_len: f64,
        /// Depth of the random pitch wander
        #[arg(long, default_value_t = SpeakOptions::default().vibrato)]
        vibrato: f64,
        /// Write a WAV file instead of playing
        #[arg(short, long)]
        output: Option<PathBuf>
    },

    /// Sing text using a directory of phoneme files, one note per word
    Sing {
        /// Directory of phoneme JSON files
        dir: PathBuf,
        /// Text to sing
        text: String,
        /// Pitch of each note, in Hz
        #[arg(short, long, default_value_t = SingOptions::default().base_freq)]
        frequency: f64,
        /// Length of a continuous sound, in seconds
        #[arg(long, default_value_t = SingOptions::default().phoneme_len)]
        phoneme_len: f64,
        /// Length of each note, in seconds
        #[arg(short, long, default_value_t = SingOptions::default().duration)]
        duration: f64,
        /// Depth of the random pitch wander
        #[arg(long, default_value_t = SingOptions::default().vibrato)]
        vibrato: f64,
        /// Excitation waveform, by name or index
        #[arg(short, long, default_value = "sawtooth")]
        waveform: Waveform,
        /// Phase modulation depth for the phase modulated waveform
        #[arg(long, default_value_t = 0.0)]
        pm_amount: f64,
        /// Phase modulation frequency ratio
        #[arg(long, default_value_t = 0.0)]
        pm_ratio: f64,
        /// Write a WAV file instead of playing
        #[arg(short, long)]
        output: Option<PathBuf>
    },

    /// Interactively audition, export, and cut the frames of an analyzed recording
    Console {
        /// Session file written by analyze
        session: PathBuf,
        /// Initial pitch, in Hz
        #[arg(short, long, default_value_t = 90.0)]
        frequency: f64,
        /// Initial excitation waveform
        #[arg(short, long, default_value = "sawtooth")]
        waveform: Waveform
    }
}

/// One line typed at the console prompt.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand
}

#[derive(Subcommand, Debug)]
enum ConsoleCommand {
    /// Loop the frames from start up to end
    Play {
        start: usize,
        end: usize,
        /// Seconds per frame
        #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
        seconds: f64,
        #[arg(short, long)]
        shuffle: bool,
        /// Loop without a gap
        #[arg(short, long)]
        repeat: bool
    },
    /// Render the frames from start up to end into a WAV file
    Export {
        start: usize,
        end: usize,
        path: PathBuf,
        #[arg(long, default_value_t = DEFAULT_FRAME_SIZE)]
        seconds: f64,
        #[arg(short, long)]
        shuffle: bool
    },
    /// Set the pitch in Hz
    Freq {
        hz: f64
    },
    /// Set the waveform by name or index
    Wave {
        waveform: Waveform
    },
    /// Save the frames from start up to end as a phoneme
    Save {
        start: usize,
        end: usize,
        path: PathBuf,
        #[arg(short, long)]
        continuous: bool
    },
    /// Describe a frame
    Show {
        frame: usize
    },
    /// Pause or resume playback
    #[command(alias = "t")]
    Toggle,
    #[command(alias = "q")]
    Quit
}

const READ_BLOCK: usize = 512;

/// Feeds the console's playback buffer to the audio device, looping it forever.
struct Player {
    reader: BufferReader,
    framerate: u32,
    block: Vec<i16>,
    index: usize
}

impl Player {
    fn new(reader: BufferReader, framerate: u32) -> Self {
        Self {
            reader: reader,
            framerate: framerate,
            block: vec![0; READ_BLOCK],
            index: READ_BLOCK
        }
    }
}

impl Iterator for Player {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index == self.block.len() {
            self.reader.fill(&mut self.block);
            self.index = 0;
        }
        let sample = self.block[self.index];
        self.index += 1;
        Some(sample as f32 / 32768.0)
    }
}

impl Source for Player {
    fn channels(&self) -> u16 {
        return 1;
    }

    fn sample_rate(&self) -> u32 {
        return self.framerate;
    }

    fn total_duration(&self) -> Option<Duration> {
        return None;
    }

    fn current_frame_len(&self) -> Option<usize> {
        return None;
    }
}

fn main() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Info).env().init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Analyze {input, output, order, window_type, step, window} => {
            analyze(&input, &output, order, window_type, step, window)
        }
        Command::Say {dir, text, frequency, phoneme_len, vibrato, output} => {
            let options = SpeakOptions {
                base_freq: frequency,
                phoneme_len: phoneme_len,
                vibrato: vibrato
            };
            say(&dir, &text, &options, output.as_deref())
        }
        Command::Sing {dir, text, frequency, phoneme_len, duration, vibrato, waveform, pm_amount, pm_ratio, output} => {
            let options = SingOptions {
                base_freq: frequency,
                phoneme_len: phoneme_len,
                duration: duration,
                vibrato: vibrato,
                waveform: waveform,
                modulation: PhaseModulation::new(pm_amount, pm_ratio)
            };
            sing(&dir, &text, &options, output.as_deref())
        }
        Command::Console {session, frequency, waveform} => console(&session, frequency, waveform)
    };
    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn analyze(input: &Path, output: &Path, order: usize, window_type: WindowType, step: f64, window: f64) -> CommandResult {
    let (signal, framerate) = read_recording(input)?;
    let config = AnalysisConfig::from_seconds(framerate, order, window, step, window_type);
    let session = analyze_session(&signal, framerate, &config)?;
    session.save(output)?;
    info!("wrote {} frames to {}", session.frames.len(), output.display());
    Ok(())
}

/// Load every phoneme stored as a JSON file in a directory.
fn load_phonology(dir: &Path) -> Result<Phonology, Box<dyn Error>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    Ok(Phonology::load(&names, dir)?)
}

/// Write samples to a file if one was given, otherwise play them.
fn deliver(samples: Vec<f64>, framerate: u32, output: Option<&Path>) -> CommandResult {
    match output {
        Some(path) => {
            write_wav(path, &samples, framerate)?;
            info!("wrote {} samples to {}", samples.len(), path.display());
        }
        None => {
            let (_stream, handle) = OutputStream::try_default()?;
            let sink = Sink::try_new(&handle)?;
            let samples: Vec<f32> = samples.iter().map(|&s| s as f32).collect();
            sink.append(SamplesBuffer::new(1, framerate, samples));
            sink.sleep_until_end();
        }
    }
    Ok(())
}

fn say(dir: &Path, text: &str, options: &SpeakOptions, output: Option<&Path>) -> CommandResult {
    let mut phonology = load_phonology(dir)?;
    let samples = phonology.play_str(text, options)?;
    deliver(samples, phonology.framerate(), output)
}

fn sing(dir: &Path, text: &str, options: &SingOptions, output: Option<&Path>) -> CommandResult {
    let mut phonology = load_phonology(dir)?;
    let samples = phonology.sing_str(text, options)?;
    deliver(samples, phonology.framerate(), output)
}

/// An interactive loop over the frames of an analyzed recording.  Commands are read from stdin,
/// one per line.
fn console(path: &Path, frequency: f64, waveform: Waveform) -> CommandResult {
    let session = AnalysisSession::load(path)?;
    let console = Arc::new(Console::from_session(session)?);
    let (_stream, handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&handle)?;
    sink.append(Player::new(console.reader(), console.framerate()));
    println!("{} frames at {} Hz.  Commands:
    play <start> <end> [--seconds S] [--shuffle] [--repeat]
    export <start> <end> <file.wav> [--seconds S] [--shuffle]
    freq <Hz>
    wave <index or name>
    save <start> <end> <file.json> [--continuous]
    show <frame>
    toggle
    quit", console.frames().len(), console.framerate());
    let mut options = RenderOptions {
        frequency: frequency,
        waveform: waveform,
        ..RenderOptions::default()
    };
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match ConsoleLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        let outcome: CommandResult = match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Toggle => {
                if sink.is_paused() {sink.play()} else {sink.pause()}
                Ok(())
            }
            ConsoleCommand::Freq {hz} => {
                options.frequency = hz;
                Ok(())
            }
            ConsoleCommand::Wave {waveform} => {
                options.waveform = waveform;
                Ok(())
            }
            ConsoleCommand::Play {start, end, seconds, shuffle, repeat} => {
                let options = RenderOptions {shuffle: shuffle, repeat: repeat, ..options};
                console.render_in_background(frame_range(start, end), seconds, options);
                Ok(())
            }
            ConsoleCommand::Export {start, end, path, seconds, shuffle} => {
                let options = RenderOptions {shuffle: shuffle, repeat: true, ..options};
                console.export(&frame_range(start, end), seconds, options, &path).map_err(|e| e.into())
            }
            ConsoleCommand::Save {start, end, path, continuous} => save_range(&console, start, end, continuous, &path),
            ConsoleCommand::Show {frame} => console.describe(frame).map(|text| println!("{text}")).map_err(|e| e.into())
        };
        if let Err(e) = outcome {
            error!("{e}");
        }
    }
    Ok(())
}

fn frame_range(start: usize, end: usize) -> Vec<usize> {
    (usize::min(start, end)..usize::max(start, end)).collect()
}

fn save_range(console: &Console, start: usize, end: usize, continuous: bool, path: &Path) -> CommandResult {
    let phoneme = console.phoneme(start, end, continuous)?;
    phoneme.save(path)?;
    info!("saved {} frames to {}", phoneme.frames.len(), path.display());
    Ok(())
}
