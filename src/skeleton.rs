use crate::landmark::{Landmark2D, LandmarkLabel};

use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TrackId = u32;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub track_id: TrackId,
    landmarks: HashMap<LandmarkLabel, Landmark2D>,
}

impl Skeleton {
    pub fn new(track_id: TrackId) -> Self {
        Self {
            track_id,
            landmarks: HashMap::new(),
        }
    }

    /// Builds a skeleton from one detector row in keypoint-index order.
    /// Keypoints at `(0, 0)` and indexes past the vocabulary are skipped.
    pub fn from_keypoints(track_id: TrackId, keypoints: &[(f32, f32)]) -> Self {
        let mut skeleton = Self::new(track_id);

        for (idx, &(x, y)) in keypoints.iter().enumerate() {
            let label = match LandmarkLabel::from_index(idx) {
                Some(label) => label,
                None => break,
            };

            let landmark = Landmark2D::new(label, x, y);
            if !landmark.is_degenerate() {
                skeleton.insert(landmark);
            }
        }

        skeleton
    }

    pub fn with_landmarks<I: IntoIterator<Item = Landmark2D>>(track_id: TrackId, landmarks: I) -> Self {
        let mut skeleton = Self::new(track_id);
        for lm in landmarks {
            skeleton.insert(lm);
        }

        skeleton
    }

    #[inline]
    pub fn insert(&mut self, landmark: Landmark2D) -> Option<Landmark2D> {
        self.landmarks.insert(landmark.label, landmark)
    }

    #[inline]
    pub fn get(&self, label: LandmarkLabel) -> Option<&Landmark2D> {
        self.landmarks.get(&label)
    }

    #[inline]
    pub fn contains(&self, label: LandmarkLabel) -> bool {
        self.landmarks.contains_key(&label)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Landmark2D> {
        self.landmarks.values()
    }

    /// Pixel midpoint of a left/right pair, rounded down to whole pixels.
    pub fn midpoint(&self, label: LandmarkLabel, left: LandmarkLabel, right: LandmarkLabel) -> Option<Landmark2D> {
        let (l, r) = (self.get(left)?, self.get(right)?);
        if l.is_degenerate() || r.is_degenerate() {
            return None;
        }

        Some(Landmark2D::new(
            label,
            ((l.pixel_x + r.pixel_x) * 0.5).floor(),
            ((l.pixel_y + r.pixel_y) * 0.5).floor(),
        ))
    }

    #[inline]
    pub fn pelvis(&self) -> Option<Landmark2D> {
        self.midpoint(LandmarkLabel::Pelvis, LandmarkLabel::HipL, LandmarkLabel::HipR)
    }

    #[inline]
    pub fn neck(&self) -> Option<Landmark2D> {
        self.midpoint(LandmarkLabel::Neck, LandmarkLabel::ShoulderL, LandmarkLabel::ShoulderR)
    }

    pub fn add_derived(&mut self) {
        if let Some(pelvis) = self.pelvis() {
            self.insert(pelvis);
        }

        if let Some(neck) = self.neck() {
            self.insert(neck);
        }
    }

    /// Heuristic for "back towards the camera": the shoulders appear swapped,
    /// both ears are visible and neither eye is.
    pub fn turned_around(&self) -> bool {
        use LandmarkLabel::*;

        let shoulders_swapped = match (self.get(ShoulderL), self.get(ShoulderR)) {
            (Some(l), Some(r)) => l.pixel_x > r.pixel_x,
            _ => false,
        };

        shoulders_swapped
            && self.contains(EarL)
            && self.contains(EarR)
            && !self.contains(EyeL)
            && !self.contains(EyeR)
    }
}
