use crate::config::{Config, FilterConfig};
use crate::depth::{self, CameraIntrinsics, DepthMap};
use crate::filter::AdaptiveAzimuthFilter;
use crate::landmark::{Landmark3D, LandmarkLabel};
use crate::math;
use crate::orientation::{FamilyOrientation, OrientationEstimate, OrientationResult};
use crate::skeleton::{Skeleton, TrackId};

use log::{debug, trace, warn};
use nalgebra as na;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TrackContext {
    pub track_id: TrackId,
    pub body: AdaptiveAzimuthFilter,
    pub gaze: AdaptiveAzimuthFilter,

    /// Pipeline frame counter value when this track last had a skeleton
    pub last_seen: u64,
}

impl TrackContext {
    pub fn new(track_id: TrackId, config: &FilterConfig) -> Self {
        Self {
            track_id,
            body: AdaptiveAzimuthFilter::from_config(config),
            gaze: AdaptiveAzimuthFilter::from_config(config),
            last_seen: 0,
        }
    }

    pub fn reset(&mut self) {
        self.body.reset();
        self.gaze.reset();
    }
}

struct Family {
    name: &'static str,
    anchors: [LandmarkLabel; 3],
    pivot: LandmarkLabel,
    reference: LandmarkLabel,
    arrow_length: f32,
    azimuth: fn(&na::Vector3<f32>, &na::Point3<f32>) -> f32,
}

fn orient_family(
    track_id: TrackId,
    family: &Family,
    points: &HashMap<LandmarkLabel, na::Point3<f32>>,
    filter: &mut AdaptiveAzimuthFilter,
) -> Option<FamilyOrientation> {
    let [a1, a2, a3] = family.anchors;

    let (p1, p2, p3, pivot, reference) = match (
        points.get(&a1),
        points.get(&a2),
        points.get(&a3),
        points.get(&family.pivot),
        points.get(&family.reference),
    ) {
        (Some(p1), Some(p2), Some(p3), Some(pivot), Some(reference)) => (p1, p2, p3, pivot, reference),
        _ => {
            trace!("track {}: {} anchors incomplete", track_id, family.name);
            return None;
        }
    };

    let plane = match math::plane_orientation(p1, p2, p3, pivot, reference, family.arrow_length) {
        Some(plane) => plane,
        None => {
            warn!("track {}: degenerate {} anchors, skipping", track_id, family.name);
            return None;
        }
    };

    let raw = (family.azimuth)(&(plane.arrow_end - plane.arrow_start), pivot);
    let filtered = filter.apply(raw);

    debug!(
        "track {}: {} azimuth raw {:.2} -> {:.2}{}",
        track_id,
        family.name,
        raw,
        filtered.degrees,
        if filtered.filtered { " (kalman)" } else { "" }
    );

    Some(FamilyOrientation {
        estimate: OrientationEstimate::new(&plane, raw),
        azimuth: filtered,
    })
}

pub fn process_skeleton(
    ctx: &mut TrackContext,
    skeleton: &Skeleton,
    depth: &DepthMap,
    intrinsics: &CameraIntrinsics,
    config: &Config,
) -> OrientationResult {
    use LandmarkLabel::*;

    let track_id = ctx.track_id;

    let mut skeleton = skeleton.clone();
    skeleton.add_derived();

    let mut landmarks_2d: Vec<_> = skeleton.iter().copied().collect();
    landmarks_2d.sort_by_key(|lm| lm.label);

    let mut landmarks_3d = Vec::with_capacity(landmarks_2d.len());
    let mut points = HashMap::with_capacity(landmarks_2d.len());

    for lm in &landmarks_2d {
        let projected = depth::unproject(lm.pixel_x, lm.pixel_y, depth, intrinsics, &config.depth);
        let landmark = projected.and_then(|un| Landmark3D::new(lm.label, un.point));

        match (landmark, projected) {
            (Some(l3), Some(un)) => {
                debug!(
                    "track {}: {:?} ({}, {}) -> ({:.3}, {:.3}, {:.3}), depth {}",
                    track_id, lm.label, lm.pixel_x, lm.pixel_y, l3.x, l3.y, l3.z, un.sampled_depth
                );

                points.insert(lm.label, l3.point());
                landmarks_3d.push(l3);
            }
            _ => trace!("track {}: {:?} has no usable depth, dropped", track_id, lm.label),
        }
    }

    let body_family = Family {
        name: "body",
        anchors: [ShoulderL, ShoulderR, Pelvis],
        pivot: Pelvis,
        reference: Neck,
        arrow_length: config.pipeline.body_arrow_length,
        azimuth: math::body_azimuth,
    };

    let gaze_family = Family {
        name: "gaze",
        anchors: [EyeL, EyeR, Neck],
        pivot: Neck,
        reference: Neck,
        arrow_length: config.pipeline.gaze_arrow_length,
        azimuth: math::gaze_azimuth,
    };

    let body = orient_family(track_id, &body_family, &points, &mut ctx.body);
    let gaze = orient_family(track_id, &gaze_family, &points, &mut ctx.gaze);

    let turned_around = skeleton.turned_around();
    if turned_around {
        debug!("track {}: turned around", track_id);
    }

    OrientationResult {
        track_id,
        body,
        gaze,
        turned_around,
        landmarks_2d,
        landmarks_3d,
    }
}
