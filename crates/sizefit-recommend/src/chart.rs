//! Ordered size charts.
//!
//! A chart maps size labels to per-measurement inclusive `[min, max]` ranges.
//! Sizes keep their declaration order (smallest to largest for the built-in
//! charts, document order for JSON); that order decides ties when scoring.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sizefit_core::Measurement;

use crate::SizeChartError;

/// Inclusive centimeter range. Serialized as `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl From<SizeRange> for [f64; 2] {
    fn from(r: SizeRange) -> Self {
        [r.min, r.max]
    }
}

/// One size row: a label and its ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeEntry {
    pub label: String,
    pub ranges: BTreeMap<Measurement, SizeRange>,
}

impl SizeEntry {
    pub fn new(
        label: impl Into<String>,
        ranges: impl IntoIterator<Item = (Measurement, SizeRange)>,
    ) -> Self {
        Self {
            label: label.into(),
            ranges: ranges.into_iter().collect(),
        }
    }

    #[inline]
    pub fn range(&self, measurement: Measurement) -> Option<SizeRange> {
        self.ranges.get(&measurement).copied()
    }
}

/// Validated, ordered size chart. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeChart {
    sizes: Vec<SizeEntry>,
}

impl SizeChart {
    /// Validate and build a chart, keeping the given order.
    pub fn new(sizes: Vec<SizeEntry>) -> Result<Self, SizeChartError> {
        if sizes.is_empty() {
            return Err(SizeChartError::Empty);
        }
        for (i, entry) in sizes.iter().enumerate() {
            if entry.label.trim().is_empty() {
                return Err(SizeChartError::EmptySizeLabel);
            }
            if sizes[..i].iter().any(|e| e.label == entry.label) {
                return Err(SizeChartError::DuplicateSize(entry.label.clone()));
            }
            for (&measurement, range) in &entry.ranges {
                if !range.min.is_finite() || !range.max.is_finite() {
                    return Err(SizeChartError::NonFiniteRange {
                        size: entry.label.clone(),
                        measurement,
                    });
                }
                if range.min > range.max {
                    return Err(SizeChartError::InvertedRange {
                        size: entry.label.clone(),
                        measurement,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }
        Ok(Self { sizes })
    }

    /// Skip validation for tables known to be well-formed.
    pub(crate) fn from_validated(sizes: Vec<SizeEntry>) -> Self {
        Self { sizes }
    }

    /// Sizes in chart order.
    #[inline]
    pub fn sizes(&self) -> &[SizeEntry] {
        &self.sizes
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sizes.iter().map(|e| e.label.as_str())
    }

    pub fn get(&self, label: &str) -> Option<&SizeEntry> {
        self.sizes.iter().find(|e| e.label == label)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false: construction rejects empty charts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Chart as it appears on the wire, before validation.
///
/// Values are kept loose (`null`, wrong arity, unknown names) so that
/// validation can name the offending size and measurement.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RawChart(pub(crate) Vec<(String, BTreeMap<String, Option<Vec<f64>>>)>);

impl<'de> Deserialize<'de> for RawChart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawChartVisitor;

        impl<'de> Visitor<'de> for RawChartVisitor {
            type Value = RawChart;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of size label -> {measurement: [min, max]}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut sizes = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    sizes.push(entry);
                }
                Ok(RawChart(sizes))
            }
        }

        deserializer.deserialize_map(RawChartVisitor)
    }
}

impl TryFrom<RawChart> for SizeChart {
    type Error = SizeChartError;

    fn try_from(raw: RawChart) -> Result<Self, Self::Error> {
        let mut sizes = Vec::with_capacity(raw.0.len());
        for (label, raw_ranges) in raw.0 {
            let mut ranges = BTreeMap::new();
            for (name, bounds) in raw_ranges {
                let measurement =
                    name.parse::<Measurement>()
                        .map_err(|_| SizeChartError::UnknownMeasurement {
                            size: label.clone(),
                            name: name.clone(),
                        })?;
                let bounds = bounds.ok_or_else(|| SizeChartError::MissingRange {
                    size: label.clone(),
                    measurement,
                })?;
                let [min, max] = <[f64; 2]>::try_from(bounds.as_slice()).map_err(|_| {
                    SizeChartError::BadRangeArity {
                        size: label.clone(),
                        measurement,
                        len: bounds.len(),
                    }
                })?;
                ranges.insert(measurement, SizeRange::new(min, max));
            }
            sizes.push(SizeEntry { label, ranges });
        }
        SizeChart::new(sizes)
    }
}

impl Serialize for SizeChart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sizes.len()))?;
        for entry in &self.sizes {
            map.serialize_entry(&entry.label, &entry.ranges)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SizeChart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawChart::deserialize(deserializer)?;
        SizeChart::try_from(raw).map_err(de::Error::custom)
    }
}
