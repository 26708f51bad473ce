use crate::filter::FilteredAzimuth;
use crate::landmark::{Landmark2D, Landmark3D, LandmarkLabel};
use crate::math::{self, PlaneOrientation};
use crate::skeleton::TrackId;

use nalgebra as na;
use serde_derive::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct OrientationEstimate {
    pub direction: na::Unit<na::Vector3<f32>>,
    pub pivot: na::Point3<f32>,
    pub raw_azimuth_degrees: f32,

    pub angle_to_camera_axis: f32,
    pub orientation_degrees: f32,
}

impl OrientationEstimate {
    pub fn new(plane: &PlaneOrientation, raw_azimuth_degrees: f32) -> Self {
        Self {
            direction: plane.direction(),
            pivot: plane.arrow_start,
            raw_azimuth_degrees,
            angle_to_camera_axis: plane.angle_to_camera_axis,
            orientation_degrees: plane.orientation_degrees,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FamilyOrientation {
    pub estimate: OrientationEstimate,
    pub azimuth: FilteredAzimuth,
}

impl FamilyOrientation {
    #[inline]
    pub fn azimuth_degrees(&self) -> f32 {
        self.azimuth.degrees
    }

    /// Direction to draw: the plane normal, or the horizontal direction of the
    /// smoothed azimuth when the filter produced it.
    pub fn display_direction(&self) -> na::Unit<na::Vector3<f32>> {
        if self.azimuth.filtered {
            math::azimuth_direction(self.azimuth.degrees)
        } else {
            self.estimate.direction
        }
    }

    pub fn display_arrow(&self, length: f32) -> (na::Point3<f32>, na::Point3<f32>) {
        let start = self.estimate.pivot;

        (start, start + self.display_direction().into_inner() * length)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrientationResult {
    pub track_id: TrackId,
    pub body: Option<FamilyOrientation>,
    pub gaze: Option<FamilyOrientation>,
    pub turned_around: bool,

    pub landmarks_2d: Vec<Landmark2D>,

    /// Landmarks that survived unprojection
    pub landmarks_3d: Vec<Landmark3D>,
}

impl OrientationResult {
    #[inline]
    pub fn body_direction(&self) -> Option<na::Unit<na::Vector3<f32>>> {
        self.body.map(|b| b.estimate.direction)
    }

    #[inline]
    pub fn body_azimuth(&self) -> Option<f32> {
        self.body.map(|b| b.azimuth.degrees)
    }

    #[inline]
    pub fn gaze_direction(&self) -> Option<na::Unit<na::Vector3<f32>>> {
        self.gaze.map(|g| g.estimate.direction)
    }

    #[inline]
    pub fn gaze_azimuth(&self) -> Option<f32> {
        self.gaze.map(|g| g.azimuth.degrees)
    }

    pub fn landmark_3d(&self, label: LandmarkLabel) -> Option<&Landmark3D> {
        self.landmarks_3d.iter().find(|lm| lm.label == label)
    }

    pub fn bones_3d(&self) -> Vec<(na::Point3<f32>, na::Point3<f32>)> {
        LandmarkLabel::BONES
            .iter()
            .filter_map(|&(a, b)| Some((self.landmark_3d(a)?.point(), self.landmark_3d(b)?.point())))
            .collect()
    }
}
