pub mod config;
pub mod depth;
pub mod error;
pub mod filter;
pub mod frame;
pub mod history;
pub mod landmark;
pub mod math;
pub mod orientation;
pub mod skeleton;
pub mod tracker;

pub use config::Config;
pub use depth::{CameraIntrinsics, DepthMap};
pub use frame::Frame;
pub use landmark::{Landmark2D, Landmark3D, LandmarkLabel};
pub use orientation::{FamilyOrientation, OrientationEstimate, OrientationResult};
pub use skeleton::{Skeleton, TrackId};
pub use tracker::TrackContext;

use error::Error;
use log::{debug, info, warn};
use nalgebra as na;
use std::collections::{HashMap, HashSet};
use std::fmt;

pub trait Float: num_traits::Float + na::RealField + Copy + fmt::Debug + 'static {}

impl<T> Float for T where T: num_traits::Float + na::RealField + Copy + fmt::Debug + 'static {}

pub trait Orienting {
    /// One result per distinct track, in input order. Only the first skeleton
    /// of a repeated `TrackId` is processed; later ones are skipped and
    /// produce no result.
    fn process(&mut self, frame: &Frame) -> Result<Vec<OrientationResult>, Error>;
    fn reset_track(&mut self, track_id: TrackId);
}

pub struct OrientationPipeline {
    config: Config,
    intrinsics: CameraIntrinsics,
    tracks: HashMap<TrackId, TrackContext>,
    frame_no: u64,
}

impl OrientationPipeline {
    pub fn new(intrinsics: CameraIntrinsics, config: Config) -> Result<Self, Error> {
        intrinsics.validate()?;
        config.validate()?;

        Ok(Self {
            config,
            intrinsics,
            tracks: HashMap::new(),
            frame_no: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    #[inline]
    pub fn track(&self, track_id: TrackId) -> Option<&TrackContext> {
        self.tracks.get(&track_id)
    }

    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    fn evict_stale(&mut self) {
        let (now, max_age) = (self.frame_no, self.config.pipeline.max_track_age);

        self.tracks.retain(|id, ctx| {
            let keep = now - ctx.last_seen <= max_age;
            if !keep {
                debug!("track {}: unseen for {} frames, dropping context", id, now - ctx.last_seen);
            }

            keep
        });
    }
}

impl crate::Orienting for OrientationPipeline {
    fn process(&mut self, frame: &Frame) -> Result<Vec<OrientationResult>, Error> {
        let expected = (
            self.intrinsics.frame_width as usize,
            self.intrinsics.frame_height as usize,
        );

        if frame.dims() != expected {
            return Err(Error::DepthMapShape {
                expected,
                actual: frame.dims(),
            });
        }

        self.frame_no += 1;

        let mut seen = HashSet::with_capacity(frame.len());
        let mut results = Vec::with_capacity(frame.len());

        for skeleton in frame.iter() {
            let id = skeleton.track_id;
            if !seen.insert(id) {
                warn!("track {}: repeated in frame at {:.3}s, ignoring", id, frame.timestamp);
                continue;
            }

            let filter_config = &self.config.filter;
            let ctx = self.tracks.entry(id).or_insert_with(|| {
                info!("track {}: new orientation context", id);
                TrackContext::new(id, filter_config)
            });

            ctx.last_seen = self.frame_no;

            results.push(tracker::process_skeleton(
                ctx,
                skeleton,
                &frame.depth,
                &self.intrinsics,
                &self.config,
            ));
        }

        self.evict_stale();

        Ok(results)
    }

    fn reset_track(&mut self, track_id: TrackId) {
        if let Some(ctx) = self.tracks.get_mut(&track_id) {
            ctx.reset();
        }
    }
}
