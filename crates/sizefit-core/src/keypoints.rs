//! Named pose landmarks as produced by an upstream pose estimator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::InputError;

/// The fixed 13-landmark vocabulary the measurement model consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    pub const ALL: [Landmark; 13] = [
        Landmark::Nose,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Landmark::Nose => "nose",
            Landmark::LeftShoulder => "left_shoulder",
            Landmark::RightShoulder => "right_shoulder",
            Landmark::LeftElbow => "left_elbow",
            Landmark::RightElbow => "right_elbow",
            Landmark::LeftWrist => "left_wrist",
            Landmark::RightWrist => "right_wrist",
            Landmark::LeftHip => "left_hip",
            Landmark::RightHip => "right_hip",
            Landmark::LeftKnee => "left_knee",
            Landmark::RightKnee => "right_knee",
            Landmark::LeftAnkle => "left_ankle",
            Landmark::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Landmark {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Landmark::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| InputError::UnknownLandmark(s.to_string()))
    }
}

/// A detected landmark: pixel position plus detector visibility in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub position: Point2<f64>,
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 {
    1.0
}

impl Keypoint {
    pub fn new(x: f64, y: f64, visibility: f32) -> Self {
        Self {
            position: Point2::new(x, y),
            visibility,
        }
    }
}

/// Landmark name -> keypoint, as delivered by the pose collaborator.
///
/// The set may be partial on construction; [`KeypointSet::ensure_complete`]
/// is the gate the measurement model applies before computing anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Landmark, Keypoint>",
    into = "BTreeMap<Landmark, Keypoint>"
)]
pub struct KeypointSet {
    points: BTreeMap<Landmark, Keypoint>,
}

impl KeypointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a keypoint, validating its visibility.
    pub fn insert(&mut self, landmark: Landmark, keypoint: Keypoint) -> Result<(), InputError> {
        let v = keypoint.visibility;
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err(InputError::InvalidVisibility { landmark, value: v });
        }
        self.points.insert(landmark, keypoint);
        Ok(())
    }

    /// Builder-style variant of [`KeypointSet::insert`].
    pub fn with(mut self, landmark: Landmark, keypoint: Keypoint) -> Result<Self, InputError> {
        self.insert(landmark, keypoint)?;
        Ok(self)
    }

    #[inline]
    pub fn get(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.points.get(&landmark)
    }

    /// Position of a landmark, or a `MissingLandmarks` error naming it.
    pub fn position(&self, landmark: Landmark) -> Result<Point2<f64>, InputError> {
        self.get(landmark)
            .map(|k| k.position)
            .ok_or(InputError::MissingLandmarks {
                missing: vec![landmark],
            })
    }

    /// Landmarks of the fixed vocabulary that are absent, in vocabulary order.
    pub fn missing(&self) -> Vec<Landmark> {
        Landmark::ALL
            .into_iter()
            .filter(|l| !self.points.contains_key(l))
            .collect()
    }

    /// Fail with every absent landmark listed if the set is incomplete.
    pub fn ensure_complete(&self) -> Result<(), InputError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(InputError::MissingLandmarks { missing })
        }
    }

    /// Copy of this set with every pixel coordinate multiplied by `k`.
    pub fn scaled(&self, k: f64) -> Self {
        let points = self
            .points
            .iter()
            .map(|(&l, kp)| {
                (
                    l,
                    Keypoint {
                        position: Point2::new(kp.position.x * k, kp.position.y * k),
                        visibility: kp.visibility,
                    },
                )
            })
            .collect();
        Self { points }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &Keypoint)> {
        self.points.iter().map(|(&l, k)| (l, k))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TryFrom<BTreeMap<Landmark, Keypoint>> for KeypointSet {
    type Error = InputError;

    fn try_from(points: BTreeMap<Landmark, Keypoint>) -> Result<Self, Self::Error> {
        let mut set = KeypointSet::new();
        for (landmark, keypoint) in points {
            set.insert(landmark, keypoint)?;
        }
        Ok(set)
    }
}

impl From<KeypointSet> for BTreeMap<Landmark, Keypoint> {
    fn from(set: KeypointSet) -> Self {
        set.points
    }
}
