//! Viewing angles and the "at least one of three" per-angle container.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FusionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAngle {
    Front,
    Back,
    Side,
}

impl ViewAngle {
    pub const ALL: [ViewAngle; 3] = [ViewAngle::Front, ViewAngle::Back, ViewAngle::Side];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewAngle::Front => "front",
            ViewAngle::Back => "back",
            ViewAngle::Side => "side",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ViewAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown view angle {0:?} (expected front, back or side)")]
pub struct UnknownViewAngle(pub String);

impl FromStr for ViewAngle {
    type Err = UnknownViewAngle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewAngle::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownViewAngle(s.to_string()))
    }
}

/// One value per supplied viewing angle; never empty.
///
/// Constructors reject the all-absent case, so holding an `AngleViews` is proof
/// that at least one angle was observed.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleViews<T> {
    slots: [Option<T>; 3],
}

impl<T> AngleViews<T> {
    pub fn single(angle: ViewAngle, value: T) -> Self {
        let mut slots = [None, None, None];
        slots[angle.index()] = Some(value);
        Self { slots }
    }

    /// Build from the three optional slots; fails when all are `None`.
    pub fn from_optional(
        front: Option<T>,
        back: Option<T>,
        side: Option<T>,
    ) -> Result<Self, FusionError> {
        if front.is_none() && back.is_none() && side.is_none() {
            return Err(FusionError::EmptyInput);
        }
        Ok(Self {
            slots: [front, back, side],
        })
    }

    /// Build from `(angle, value)` pairs; later duplicates replace earlier ones.
    pub fn try_from_pairs(
        pairs: impl IntoIterator<Item = (ViewAngle, T)>,
    ) -> Result<Self, FusionError> {
        let mut slots = [None, None, None];
        for (angle, value) in pairs {
            slots[angle.index()] = Some(value);
        }
        let [front, back, side] = slots;
        Self::from_optional(front, back, side)
    }

    /// Insert or replace the value for `angle`.
    pub fn set(&mut self, angle: ViewAngle, value: T) {
        self.slots[angle.index()] = Some(value);
    }

    #[inline]
    pub fn get(&self, angle: ViewAngle) -> Option<&T> {
        self.slots[angle.index()].as_ref()
    }

    /// Present entries in front, back, side order.
    pub fn iter(&self) -> impl Iterator<Item = (ViewAngle, &T)> {
        ViewAngle::ALL
            .into_iter()
            .filter_map(move |a| self.get(a).map(|v| (a, v)))
    }

    pub fn angles(&self) -> Vec<ViewAngle> {
        self.iter().map(|(a, _)| a).collect()
    }

    /// Number of supplied angles, in `1..=3`.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Always false; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The sole value when exactly one angle was supplied.
    pub fn only(&self) -> Option<(ViewAngle, &T)> {
        let mut it = self.iter();
        match (it.next(), it.next()) {
            (Some(first), None) => Some(first),
            _ => None,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(ViewAngle, T) -> U) -> AngleViews<U> {
        let [front, back, side] = self.slots;
        AngleViews {
            slots: [
                front.map(|v| f(ViewAngle::Front, v)),
                back.map(|v| f(ViewAngle::Back, v)),
                side.map(|v| f(ViewAngle::Side, v)),
            ],
        }
    }

    /// Like [`AngleViews::map`] but short-circuits on the first error.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(ViewAngle, T) -> Result<U, E>,
    ) -> Result<AngleViews<U>, E> {
        let [front, back, side] = self.slots;
        Ok(AngleViews {
            slots: [
                front.map(|v| f(ViewAngle::Front, v)).transpose()?,
                back.map(|v| f(ViewAngle::Back, v)).transpose()?,
                side.map(|v| f(ViewAngle::Side, v)).transpose()?,
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_absent_is_rejected() {
        let err = AngleViews::<u8>::from_optional(None, None, None).unwrap_err();
        assert_eq!(err, FusionError::EmptyInput);
        assert!(AngleViews::<u8>::try_from_pairs([]).is_err());
    }

    #[test]
    fn iterates_in_front_back_side_order() {
        let views =
            AngleViews::try_from_pairs([(ViewAngle::Side, 3), (ViewAngle::Front, 1)]).unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views.angles(), vec![ViewAngle::Front, ViewAngle::Side]);
        assert!(views.only().is_none());
        assert_eq!(views.get(ViewAngle::Back), None);
    }

    #[test]
    fn only_reports_single_view() {
        let views = AngleViews::single(ViewAngle::Back, "b");
        assert_eq!(views.only(), Some((ViewAngle::Back, &"b")));
    }

    #[test]
    fn try_map_propagates_errors() {
        let views = AngleViews::from_optional(Some(1), Some(-1), None).unwrap();
        let res: Result<AngleViews<u32>, String> = views.try_map(|a, v| {
            u32::try_from(v).map_err(|_| format!("{a} negative"))
        });
        assert_eq!(res.unwrap_err(), "back negative");
    }

    #[test]
    fn angle_names_parse_case_insensitively() {
        assert_eq!(" Side ".parse::<ViewAngle>().unwrap(), ViewAngle::Side);
        assert!("top".parse::<ViewAngle>().is_err());
    }
}
