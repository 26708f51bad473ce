use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// COCO keypoint order, then the derived points
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LandmarkLabel {
    Nose,
    #[serde(rename = "Eye.L")]
    EyeL,
    #[serde(rename = "Eye.R")]
    EyeR,
    #[serde(rename = "Ear.L")]
    EarL,
    #[serde(rename = "Ear.R")]
    EarR,
    #[serde(rename = "Shoulder.L")]
    ShoulderL,
    #[serde(rename = "Shoulder.R")]
    ShoulderR,
    #[serde(rename = "Elbow.L")]
    ElbowL,
    #[serde(rename = "Elbow.R")]
    ElbowR,
    #[serde(rename = "Wrist.L")]
    WristL,
    #[serde(rename = "Wrist.R")]
    WristR,
    #[serde(rename = "Hip.L")]
    HipL,
    #[serde(rename = "Hip.R")]
    HipR,
    #[serde(rename = "Knee.L")]
    KneeL,
    #[serde(rename = "Knee.R")]
    KneeR,
    #[serde(rename = "Ankle.L")]
    AnkleL,
    #[serde(rename = "Ankle.R")]
    AnkleR,
    Pelvis,
    Neck,
}

impl LandmarkLabel {
    /// Number of labels produced by the detector (derived labels excluded)
    pub const DETECTED_COUNT: usize = 17;

    pub const BONES: [(LandmarkLabel, LandmarkLabel); 14] = {
        use LandmarkLabel::*;
        [
            (Nose, EyeL),
            (Nose, EyeR),
            (ShoulderL, ShoulderR),
            (HipL, HipR),
            (EyeR, EarR),
            (EyeL, EarL),
            (ShoulderL, ElbowL),
            (ElbowL, WristL),
            (ShoulderR, ElbowR),
            (ElbowR, WristR),
            (HipL, KneeL),
            (KneeL, AnkleL),
            (HipR, KneeR),
            (KneeR, AnkleR),
        ]
    };

    pub fn from_index(index: usize) -> Option<Self> {
        use LandmarkLabel::*;

        Some(match index {
            0 => Nose,
            1 => EyeL,
            2 => EyeR,
            3 => EarL,
            4 => EarR,
            5 => ShoulderL,
            6 => ShoulderR,
            7 => ElbowL,
            8 => ElbowR,
            9 => WristL,
            10 => WristR,
            11 => HipL,
            12 => HipR,
            13 => KneeL,
            14 => KneeR,
            15 => AnkleL,
            16 => AnkleR,
            _ => return None,
        })
    }

    #[inline]
    pub fn is_derived(&self) -> bool {
        matches!(self, LandmarkLabel::Pelvis | LandmarkLabel::Neck)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Landmark2D {
    pub label: LandmarkLabel,
    #[serde(rename = "x")]
    pub pixel_x: f32,
    #[serde(rename = "y")]
    pub pixel_y: f32,
}

impl Landmark2D {
    #[inline]
    pub fn new(label: LandmarkLabel, pixel_x: f32, pixel_y: f32) -> Self {
        Self {
            label,
            pixel_x,
            pixel_y,
        }
    }

    /// Detectors report undetected keypoints at the image origin
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.pixel_x == 0.0 && self.pixel_y == 0.0
    }
}

/// Landmark in camera space, meters
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Landmark3D {
    pub label: LandmarkLabel,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark3D {
    pub fn new(label: LandmarkLabel, point: na::Point3<f32>) -> Option<Self> {
        let valid = point.z.is_finite()
            && point.x.is_finite()
            && point.y.is_finite()
            && (point.x != 0.0 || point.y != 0.0 || point.z != 0.0);

        if !valid {
            return None;
        }

        Some(Self {
            label,
            x: point.x,
            y: point.y,
            z: point.z,
        })
    }

    #[inline(always)]
    pub fn point(&self) -> na::Point3<f32> {
        na::Point3::new(self.x, self.y, self.z)
    }
}
