//! JSON helpers for configs, requests, reports and measurement sets.

use std::{fs, path::Path};

use serde::de::DeserializeOwned;
use serde::Serialize;
use sizefit_core::MeasurementSet;

use crate::{PipelineConfig, PipelineError, SizingReport, SizingRequest};

/// Read and parse a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, PipelineError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write `value` as pretty JSON.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a `{"chest": 98.0, ...}` measurement file.
pub fn load_measurements(path: impl AsRef<Path>) -> Result<MeasurementSet, PipelineError> {
    load_json(path)
}

impl PipelineConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        load_json(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        write_json(self, path)
    }
}

impl SizingRequest {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        load_json(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        write_json(self, path)
    }
}

impl SizingReport {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        load_json(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        write_json(self, path)
    }
}
