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

use crate::error::{LpcError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// The tapering applied to each analysis window before it is passed to the Burg analyzer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    #[default]
    None,
    Hann,
    Hamming,
    Welch
}

impl WindowType {
    /// Return a windowed copy of a signal.  The input is left untouched.
    pub fn apply(&self, signal: &[f64]) -> Vec<f64> {
        match self {
            WindowType::None => signal.to_vec(),
            WindowType::Hann => sine_window(signal, 0.5),
            WindowType::Hamming => sine_window(signal, 0.54),
            WindowType::Welch => welch(signal)
        }
    }
}

impl FromStr for WindowType {
    type Err = LpcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(WindowType::None),
            "hann" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "welch" => Ok(WindowType::Welch),
            _ => Err(LpcError::UnknownWindow(s.to_string()))
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowType::None => "none",
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Welch => "welch"
        };
        f.write_str(name)
    }
}

/// A generalized raised cosine window.  alpha=0.5 gives a Hann window and alpha=0.54 gives
/// a Hamming window.  The window never reaches zero at the ends, so no sample is discarded.
pub fn sine_window(signal: &[f64], alpha: f64) -> Vec<f64> {
    let n = signal.len() as f64;
    signal.iter().enumerate().map(|(i, x)| {
        let w = alpha - (1.0-alpha)*(2.0*PI*(i+1) as f64/(n+1.0)).cos();
        w*x
    }).collect()
}

/// A Welch (parabolic) window.
pub fn welch(signal: &[f64]) -> Vec<f64> {
    let half = (signal.len() as f64 + 1.0)/2.0;
    signal.iter().enumerate().map(|(i, x)| {
        let t = ((i+1) as f64 - half)/half;
        (1.0 - t*t)*x
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_symmetric() {
        let signal = vec![1.0; 9];
        for window in [WindowType::Hann, WindowType::Hamming, WindowType::Welch] {
            let w = window.apply(&signal);
            for i in 0..w.len() {
                assert!((w[i]-w[w.len()-1-i]).abs() < 1e-12, "{window} is not symmetric");
            }
            assert!((w[4]-1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!(WindowType::Hann, "Hann".parse().unwrap());
        assert_eq!(WindowType::None, "none".parse().unwrap());
        assert!("blackman".parse::<WindowType>().is_err());
    }
}
