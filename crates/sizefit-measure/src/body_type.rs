use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed body-build vocabulary used to pick the chest multiplier.
///
/// The label is decided upstream (by the caller or a refinement service);
/// parsing accepts a fixed alias table and never does substring matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Slim,
    Athletic,
    Average,
    Stocky,
    #[default]
    Unknown,
}

/// Accepted spellings, lower-case and exact.
const ALIASES: [(&str, BodyType); 11] = [
    ("slim", BodyType::Slim),
    ("lean", BodyType::Slim),
    ("athletic", BodyType::Athletic),
    ("fit", BodyType::Athletic),
    ("average", BodyType::Average),
    ("medium", BodyType::Average),
    ("stocky", BodyType::Stocky),
    ("heavy", BodyType::Stocky),
    ("broad", BodyType::Stocky),
    ("unknown", BodyType::Unknown),
    ("", BodyType::Unknown),
];

impl BodyType {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyType::Slim => "slim",
            BodyType::Athletic => "athletic",
            BodyType::Average => "average",
            BodyType::Stocky => "stocky",
            BodyType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized body type {0:?}")]
pub struct UnknownBodyType(pub String);

impl FromStr for BodyType {
    type Err = UnknownBodyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, body)| *body)
            .ok_or_else(|| UnknownBodyType(s.to_string()))
    }
}
