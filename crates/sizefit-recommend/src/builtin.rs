//! Built-in men's and women's charts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sizefit_core::Measurement;

use crate::{SizeChart, SizeEntry, SizeRange};

/// Declared gender category used to pick a built-in chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unisex,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        }
    }

    /// Built-in chart for this category; unisex uses the men's chart.
    pub fn chart(self) -> SizeChart {
        match self {
            Gender::Female => womens_chart(),
            Gender::Male | Gender::Unisex => mens_chart(),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown gender category {0:?} (expected male, female or unisex)")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "men" | "m" => Ok(Gender::Male),
            "female" | "women" | "f" => Ok(Gender::Female),
            "unisex" | "" => Ok(Gender::Unisex),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

const COLUMNS: [Measurement; 6] = [
    Measurement::Chest,
    Measurement::Waist,
    Measurement::Hips,
    Measurement::Inseam,
    Measurement::Shoulder,
    Measurement::Arm,
];

type Row = (&'static str, [(f64, f64); 6]);

#[rustfmt::skip]
const MENS: [Row; 6] = [
    ("XS",  [(81.0, 86.0),   (66.0, 71.0), (86.0, 91.0),   (76.0, 79.0), (42.0, 44.0), (58.0, 60.0)]),
    ("S",   [(86.0, 91.0),   (71.0, 76.0), (91.0, 96.0),   (79.0, 81.0), (44.0, 46.0), (60.0, 62.0)]),
    ("M",   [(91.0, 97.0),   (76.0, 81.0), (96.0, 102.0),  (81.0, 84.0), (46.0, 48.0), (62.0, 64.0)]),
    ("L",   [(97.0, 102.0),  (81.0, 86.0), (102.0, 107.0), (84.0, 86.0), (48.0, 50.0), (64.0, 66.0)]),
    ("XL",  [(102.0, 107.0), (86.0, 91.0), (107.0, 112.0), (86.0, 89.0), (50.0, 52.0), (66.0, 68.0)]),
    ("XXL", [(107.0, 114.0), (91.0, 99.0), (112.0, 119.0), (89.0, 91.0), (52.0, 54.0), (68.0, 71.0)]),
];

#[rustfmt::skip]
const WOMENS: [Row; 6] = [
    ("XS",  [(76.0, 81.0),   (58.0, 63.0), (84.0, 89.0),   (74.0, 76.0), (36.0, 38.0), (56.0, 58.0)]),
    ("S",   [(81.0, 86.0),   (63.0, 68.0), (89.0, 94.0),   (76.0, 79.0), (38.0, 40.0), (58.0, 60.0)]),
    ("M",   [(86.0, 91.0),   (68.0, 73.0), (94.0, 99.0),   (79.0, 81.0), (40.0, 42.0), (60.0, 62.0)]),
    ("L",   [(91.0, 99.0),   (73.0, 81.0), (99.0, 107.0),  (81.0, 84.0), (42.0, 44.0), (62.0, 64.0)]),
    ("XL",  [(99.0, 107.0),  (81.0, 89.0), (107.0, 114.0), (84.0, 86.0), (44.0, 46.0), (64.0, 66.0)]),
    ("XXL", [(107.0, 117.0), (89.0, 99.0), (114.0, 124.0), (86.0, 89.0), (46.0, 48.0), (66.0, 69.0)]),
];

fn chart_from_rows(rows: &[Row]) -> SizeChart {
    let sizes = rows
        .iter()
        .map(|(label, bounds)| {
            SizeEntry::new(
                *label,
                COLUMNS
                    .into_iter()
                    .zip(bounds.iter().map(|&(min, max)| SizeRange::new(min, max))),
            )
        })
        .collect();
    SizeChart::from_validated(sizes)
}

/// Men's chart, XS..XXL.
pub fn mens_chart() -> SizeChart {
    chart_from_rows(&MENS)
}

/// Women's chart, XS..XXL.
pub fn womens_chart() -> SizeChart {
    chart_from_rows(&WOMENS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_charts_pass_validation() {
        for chart in [mens_chart(), womens_chart()] {
            let again = SizeChart::new(chart.sizes().to_vec()).unwrap();
            assert_eq!(again, chart);
            assert_eq!(
                chart.labels().collect::<Vec<_>>(),
                vec!["XS", "S", "M", "L", "XL", "XXL"]
            );
            assert!(chart.sizes().iter().all(|e| e.ranges.len() == 6));
        }
    }

    #[test]
    fn unisex_uses_mens_chart() {
        assert_eq!(Gender::Unisex.chart(), mens_chart());
        assert_eq!(Gender::Male.chart(), mens_chart());
        assert_eq!(Gender::Female.chart(), womens_chart());
        let m = womens_chart();
        assert_eq!(
            m.get("L").unwrap().range(Measurement::Chest),
            Some(SizeRange::new(91.0, 99.0))
        );
    }

    #[test]
    fn parses_gender_names() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("men".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("unisex".parse::<Gender>().unwrap(), Gender::Unisex);
        assert!("other".parse::<Gender>().is_err());
    }
}
