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

use crate::error::Result;
use crate::window::WindowType;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One snapshot of the spectral envelope: the all-pole predictor, the prediction error power,
/// and how periodic the analyzed window was.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LpcFrame {
    pub coefficients: Vec<f64>,
    pub gain: f64,
    pub voice: f64
}

impl LpcFrame {
    pub fn new(coefficients: Vec<f64>, gain: f64, voice: f64) -> Self {
        Self {
            coefficients: coefficients,
            gain: gain,
            voice: voice
        }
    }

    pub fn order(&self) -> usize {
        self.coefficients.len()
    }
}

/// The on-disk form of a Phoneme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhonemeFile {
    pub framerate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    pub continuous: bool,
    pub frames: Vec<LpcFrame>
}

/// Everything produced by analyzing one recording, along with the settings used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub framerate: u32,
    pub step_size: usize,
    pub window_size: usize,
    pub window_type: WindowType,
    pub order: usize,
    pub frames: Vec<LpcFrame>
}

/// Helpers shared by every serialized type.
pub trait JsonFile: Serialize + DeserializeOwned {
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl JsonFile for LpcFrame {}
impl JsonFile for PhonemeFile {}
impl JsonFile for AnalysisSession {}
