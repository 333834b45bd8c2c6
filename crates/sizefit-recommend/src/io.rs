//! JSON helpers for size charts and recommendations.

use std::{fs, path::Path};

use crate::chart::RawChart;
use crate::{Recommendation, SizeChart, SizeChartIoError};

impl SizeChart {
    /// Parse a chart from JSON text, keeping document order.
    pub fn from_json_str(json: &str) -> Result<Self, SizeChartIoError> {
        let raw: RawChart = serde_json::from_str(json)?;
        Ok(SizeChart::try_from(raw)?)
    }

    /// Load a chart from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SizeChartIoError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Write this chart to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SizeChartIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Recommendation {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SizeChartIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SizeChartIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
