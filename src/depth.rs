use crate::config::DepthConfig;
use crate::error::{Error, Result};

use nalgebra as na;
use ndarray::prelude::*;
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub focal_x: f32,
    pub focal_y: f32,
    pub principal_x: f32,
    pub principal_y: f32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl CameraIntrinsics {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.focal_x,
            self.focal_y,
            self.principal_x,
            self.principal_y,
        ]
        .iter()
        .all(|v| v.is_finite());

        if !finite {
            return Err(Error::InvalidIntrinsics(format!("non-finite value in {:?}", self)));
        }

        if self.focal_x <= 0.0 || self.focal_y <= 0.0 {
            return Err(Error::InvalidIntrinsics(format!(
                "focal lengths must be positive, got ({}, {})",
                self.focal_x, self.focal_y
            )));
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(Error::InvalidIntrinsics("empty frame size".to_string()));
        }

        Ok(())
    }

    #[inline]
    pub fn project(&self, point: &na::Point3<f32>) -> na::Point2<f32> {
        na::Point2::new(
            point.x * self.focal_x / point.z + self.principal_x,
            point.y * self.focal_y / point.z + self.principal_y,
        )
    }
}

/// Indexed `[row, col]`, zero means no reading
#[derive(Debug, Clone)]
pub struct DepthMap {
    data: Array2<u16>,
}

impl DepthMap {
    pub fn new(data: Array2<u16>) -> Self {
        Self { data }
    }

    pub fn from_shape_vec(width: usize, height: usize, raw: Vec<u16>) -> Result<Self> {
        let actual = raw.len();
        let data = Array2::from_shape_vec((height, width), raw).map_err(|_| Error::DepthBufferLength {
            expected: width * height,
            actual,
        })?;

        Ok(Self { data })
    }

    pub fn filled(width: usize, height: usize, value: u16) -> Self {
        Self {
            data: Array2::from_elem((height, width), value),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<u16> {
        self.data.get((row, col)).copied()
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: u16) {
        if let Some(v) = self.data.get_mut((row, col)) {
            *v = value;
        }
    }

    #[inline]
    pub fn view(&self) -> ArrayView2<'_, u16> {
        self.data.view()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unprojection {
    pub point: na::Point3<f32>,
    pub sampled_depth: u16,
}

#[inline]
fn usable(raw: u16, cfg: &DepthConfig) -> bool {
    raw != 0 && raw as f32 * cfg.depth_unit <= cfg.max_depth
}

fn nearest_sample(map: ArrayView2<'_, u16>, col: usize, row: usize, cfg: &DepthConfig) -> Option<u16> {
    let (h, w) = map.dim();
    let r = cfg.search_radius;

    let mut best: Option<(usize, u16)> = None;

    let (rows, cols) = (
        row.saturating_sub(r)..row.saturating_add(r).saturating_add(1).min(h),
        col.saturating_sub(r)..col.saturating_add(r).saturating_add(1).min(w),
    );

    for y in rows {
        for x in cols.clone() {
            let raw = map[(y, x)];
            if !usable(raw, cfg) {
                continue;
            }

            let dist = x.abs_diff(col).pow(2) + y.abs_diff(row).pow(2);
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, raw));
            }
        }
    }

    best.map(|(_, raw)| raw)
}

/// A missing sample falls back to the closest usable one within `search_radius`.
pub fn unproject(
    pixel_x: f32,
    pixel_y: f32,
    depth: &DepthMap,
    intrinsics: &CameraIntrinsics,
    cfg: &DepthConfig,
) -> Option<Unprojection> {
    if !(pixel_x >= 0.0 && pixel_y >= 0.0) {
        return None;
    }

    let (col, row) = (pixel_x.floor() as usize, pixel_y.floor() as usize);
    let raw = depth.get(col, row)?;

    let sampled_depth = if usable(raw, cfg) {
        raw
    } else {
        nearest_sample(depth.view(), col, row, cfg)?
    };

    let z = sampled_depth as f32 * cfg.depth_unit;
    let x = (pixel_x - intrinsics.principal_x) * z / intrinsics.focal_x;
    let y = (pixel_y - intrinsics.principal_y) * z / intrinsics.focal_y;

    Some(Unprojection {
        point: na::Point3::new(x, y, z),
        sampled_depth,
    })
}
