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

use crate::burg::{autocorrelation, calc_burg};
use crate::error::{LpcError, Result};
use crate::frame::{AnalysisSession, LpcFrame};
use crate::window::WindowType;
use crate::DEFAULT_FRAME_SIZE;
use log::debug;

/// Which gain accompanies each order's coefficients in progressive output.
///
/// FirstOrder reproduces the behavior of existing progressive analysis files, where every
/// order carries the order-1 gain.  MatchingOrder pairs each order with its own gain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ProgressiveGain {
    #[default]
    FirstOrder,
    MatchingOrder
}

/// Settings for sliding a window across a recording.  Sizes are in samples.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    pub order: usize,
    pub window_size: usize,
    pub step_size: usize,
    pub window_type: WindowType,
    pub progressive_gain: ProgressiveGain
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            order: 48,
            window_size: 882,
            step_size: 441,
            window_type: WindowType::None,
            progressive_gain: ProgressiveGain::FirstOrder
        }
    }
}

impl AnalysisConfig {
    /// Build a config from sizes given in seconds.  A window of zero seconds means twice the
    /// step.
    pub fn from_seconds(framerate: u32, order: usize, window_seconds: f64, step_seconds: f64, window_type: WindowType) -> Self {
        let window_seconds = if window_seconds > 0.0 {window_seconds} else {2.0*step_seconds};
        Self {
            order: order,
            window_size: (framerate as f64*window_seconds) as usize,
            step_size: (framerate as f64*step_seconds) as usize,
            window_type: window_type,
            progressive_gain: ProgressiveGain::FirstOrder
        }
    }

    /// The default step of 10 ms at the given framerate, with a window twice as long.
    pub fn for_framerate(framerate: u32, order: usize) -> Self {
        Self::from_seconds(framerate, order, 0.0, DEFAULT_FRAME_SIZE, WindowType::None)
    }

    fn validate(&self) -> Result<()> {
        if self.order == 0 {
            return Err(LpcError::InvalidOrder);
        }
        if self.step_size == 0 {
            return Err(LpcError::InvalidAnalysis("step size must be at least one sample".to_string()));
        }
        if self.window_size == 0 {
            return Err(LpcError::InvalidAnalysis("window size must be at least one sample".to_string()));
        }
        Ok(())
    }
}

/// Analyze a signal, producing one frame per window position.  Windows start at 0, step_size,
/// 2*step_size, ... as long as the start lies inside the signal, so the last window may be
/// shorter than window_size.
pub fn analyze(signal: &[f64], config: &AnalysisConfig) -> Result<Vec<LpcFrame>> {
    config.validate()?;
    let mut frames = Vec::with_capacity(signal.len().div_ceil(config.step_size));
    for window in windows(signal, config) {
        let voice = voicing(&window);
        let result = calc_burg(&window, config.order);
        frames.push(LpcFrame::new(result.final_coefficients().to_vec(), result.final_gain(), voice));
    }
    debug!("analyzed {} samples into {} frames of order {}", signal.len(), frames.len(), config.order);
    Ok(frames)
}

/// Analyze a signal, producing for every window position one frame for each order from 1 to
/// config.order.
pub fn analyze_progressive(signal: &[f64], config: &AnalysisConfig) -> Result<Vec<Vec<LpcFrame>>> {
    config.validate()?;
    let mut frames = Vec::with_capacity(signal.len().div_ceil(config.step_size));
    for window in windows(signal, config) {
        let voice = voicing(&window);
        let result = calc_burg(&window, config.order);
        let orders = result.coefficients.iter().enumerate().map(|(o, coefficients)| {
            let gain = match config.progressive_gain {
                ProgressiveGain::FirstOrder => result.gains[0],
                ProgressiveGain::MatchingOrder => result.gains[o]
            };
            LpcFrame::new(coefficients.clone(), gain, voice)
        }).collect();
        frames.push(orders);
    }
    Ok(frames)
}

/// Analyze a recording and package the frames with the settings that produced them.
pub fn analyze_session(signal: &[f64], framerate: u32, config: &AnalysisConfig) -> Result<AnalysisSession> {
    let frames = analyze(signal, config)?;
    Ok(AnalysisSession {
        framerate: framerate,
        step_size: config.step_size,
        window_size: config.window_size,
        window_type: config.window_type,
        order: config.order,
        frames: frames
    })
}

/// The windowed slices of a signal, one per window start.
fn windows<'a>(signal: &'a [f64], config: &'a AnalysisConfig) -> impl Iterator<Item = Vec<f64>> + 'a {
    (0..signal.len()).step_by(config.step_size).map(move |start| {
        let end = usize::min(start+config.window_size, signal.len());
        config.window_type.apply(&signal[start..end])
    })
}

fn voicing(window: &[f64]) -> f64 {
    let r = autocorrelation(window, 1);
    r*r
}
