//! End-to-end behaviour of the orientation pipeline

use bodyorient::config::FilterConfig;
use bodyorient::error::Error;
use bodyorient::filter::FilterState;
use bodyorient::{
    CameraIntrinsics, Config, DepthMap, Frame, Landmark2D, LandmarkLabel, OrientationPipeline,
    Orienting, Skeleton, TrackId,
};

use LandmarkLabel::*;

const WIDTH: usize = 640;
const HEIGHT: usize = 720;

fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics {
        focal_x: 600.0,
        focal_y: 600.0,
        principal_x: 320.0,
        principal_y: 240.0,
        frame_width: WIDTH as u32,
        frame_height: HEIGHT as u32,
    }
}

/// Left half of the image at 1.8 m, right half at 2.4 m
fn stepped_depth() -> DepthMap {
    let mut depth = DepthMap::filled(WIDTH, HEIGHT, 1800);
    for row in 0..HEIGHT {
        for col in 320..WIDTH {
            depth.set(col, row, 2400);
        }
    }

    depth
}

/// Shoulders (-0.2, 1.0, 2.0) and (0.2, 1.0, 2.0), pelvis (0.0, 1.5, 2.0)
/// on a flat 2 m depth map.
fn facing_camera(track_id: TrackId) -> Skeleton {
    Skeleton::with_landmarks(
        track_id,
        vec![
            Landmark2D::new(ShoulderL, 260.0, 540.0),
            Landmark2D::new(ShoulderR, 380.0, 540.0),
            Landmark2D::new(HipL, 290.0, 690.0),
            Landmark2D::new(HipR, 350.0, 690.0),
            Landmark2D::new(EyeL, 300.0, 420.0),
            Landmark2D::new(EyeR, 340.0, 420.0),
            Landmark2D::new(EarL, 280.0, 425.0),
            Landmark2D::new(EarR, 360.0, 425.0),
        ],
    )
}

/// Facing the camera, entirely in the 1.8 m half of `stepped_depth`
fn facing_left_half(track_id: TrackId) -> Skeleton {
    Skeleton::with_landmarks(
        track_id,
        vec![
            Landmark2D::new(ShoulderL, 100.0, 540.0),
            Landmark2D::new(ShoulderR, 220.0, 540.0),
            Landmark2D::new(HipL, 130.0, 690.0),
            Landmark2D::new(HipR, 190.0, 690.0),
        ],
    )
}

/// Shoulder line straddling the depth step, so the torso is turned towards profile
fn near_profile(track_id: TrackId) -> Skeleton {
    Skeleton::with_landmarks(
        track_id,
        vec![
            Landmark2D::new(ShoulderL, 300.0, 540.0),
            Landmark2D::new(ShoulderR, 340.0, 540.0),
            Landmark2D::new(HipL, 300.0, 690.0),
            Landmark2D::new(HipR, 340.0, 690.0),
        ],
    )
}

fn pipeline(config: Config) -> OrientationPipeline {
    OrientationPipeline::new(intrinsics(), config).unwrap()
}

#[test]
fn test_facing_camera_end_to_end() {
    let mut pipeline = pipeline(Config::default());
    let frame = Frame::new(DepthMap::filled(WIDTH, HEIGHT, 2000), vec![facing_camera(1)], 0.0);

    let results = pipeline.process(&frame).unwrap();
    assert_eq!(results.len(), 1);

    let result = &results[0];
    let body = result.body.unwrap();

    let direction = result.body_direction().unwrap();
    assert!(direction.z.abs() > 0.999);
    assert!(!body.azimuth.filtered);
    assert_eq!(result.body_azimuth(), Some(body.estimate.raw_azimuth_degrees));
    assert!((body.azimuth.degrees - 180.0).abs() < 1e-3);

    let pelvis = result.landmark_3d(Pelvis).unwrap();
    assert!((pelvis.x - 0.0).abs() < 1e-5);
    assert!((pelvis.y - 1.5).abs() < 1e-5);
    assert!((pelvis.z - 2.0).abs() < 1e-5);

    let shoulder_l = result.landmark_3d(ShoulderL).unwrap();
    assert!((shoulder_l.x + 0.2).abs() < 1e-5);
    assert!((shoulder_l.y - 1.0).abs() < 1e-5);

    assert!(result.gaze_azimuth().is_some());
    assert!(!result.turned_around);
    assert_eq!(result.bones_3d().len(), 4);
}

#[test]
fn test_profile_engages_filter() {
    let mut pipeline = pipeline(Config::default());
    let frame = Frame::new(stepped_depth(), vec![near_profile(5)], 0.0);

    let results = pipeline.process(&frame).unwrap();
    let body = results[0].body.unwrap();

    let raw = body.estimate.raw_azimuth_degrees;
    assert!((70.0..=110.0).contains(&raw), "raw azimuth {}", raw);
    assert!(body.azimuth.filtered);
    assert!((body.azimuth.degrees - raw * 0.5).abs() < 1e-3);

    let display = body.display_direction();
    assert!(display.y.abs() < 1e-6);
}

#[test]
fn test_tracks_are_isolated() {
    let mut pipeline = pipeline(Config::default());
    let initial = FilterState::from_config(&FilterConfig::default());

    let frame = Frame::new(stepped_depth(), vec![facing_left_half(1), near_profile(2)], 0.0);
    let results = pipeline.process(&frame).unwrap();

    assert_eq!(results.len(), 2);
    assert!(!results[0].body.unwrap().azimuth.filtered);
    assert!(results[1].body.unwrap().azimuth.filtered);

    let facing = pipeline.track(1).unwrap();
    assert_eq!(*facing.body.state(), initial);
    assert_eq!(facing.body.history().len(), 1);

    let profile = pipeline.track(2).unwrap();
    assert_ne!(*profile.body.state(), initial);
    assert_eq!(profile.body.history().len(), 1);

    let frame = Frame::new(stepped_depth(), vec![near_profile(2)], 0.04);
    pipeline.process(&frame).unwrap();

    assert_eq!(pipeline.track(1).unwrap().body.history().len(), 1);
    assert_eq!(pipeline.track(2).unwrap().body.history().len(), 2);
}

#[test]
fn test_missing_anchor_omits_family() {
    let mut pipeline = pipeline(Config::default());

    let full = facing_camera(3);
    let skeleton = Skeleton::with_landmarks(
        full.track_id,
        full.iter().copied().filter(|lm| lm.label != HipR).collect::<Vec<_>>(),
    );

    let frame = Frame::new(DepthMap::filled(WIDTH, HEIGHT, 2000), vec![skeleton], 0.0);
    let results = pipeline.process(&frame).unwrap();

    assert!(results[0].body.is_none());
    assert!(results[0].gaze.is_some());
    assert!(results[0].landmark_3d(Pelvis).is_none());
    assert!(pipeline.track(3).unwrap().body.history().is_empty());
}

#[test]
fn test_collinear_body_plane_leaves_filter_untouched() {
    let mut pipeline = pipeline(Config::default());

    let frame = Frame::new(stepped_depth(), vec![near_profile(6)], 0.0);
    assert!(pipeline.process(&frame).unwrap()[0].body.unwrap().azimuth.filtered);

    let before = pipeline.track(6).unwrap().body.clone();
    assert_eq!(before.history().len(), 1);

    // hips on the shoulder line put the pelvis on the shoulder segment
    let flat = Skeleton::with_landmarks(
        6,
        vec![
            Landmark2D::new(ShoulderL, 260.0, 540.0),
            Landmark2D::new(ShoulderR, 380.0, 540.0),
            Landmark2D::new(HipL, 290.0, 540.0),
            Landmark2D::new(HipR, 350.0, 540.0),
        ],
    );

    let frame = Frame::new(DepthMap::filled(WIDTH, HEIGHT, 2000), vec![flat], 0.04);
    let results = pipeline.process(&frame).unwrap();

    assert!(results[0].body.is_none());
    assert!(results[0].landmark_3d(Pelvis).is_some());

    let after = &pipeline.track(6).unwrap().body;
    assert_eq!(after.history().len(), before.history().len());
    assert_eq!(*after.state(), *before.state());
}

#[test]
fn test_turned_around_flag() {
    let mut pipeline = pipeline(Config::default());

    let back = Skeleton::with_landmarks(
        9,
        vec![
            Landmark2D::new(ShoulderL, 300.0, 200.0),
            Landmark2D::new(ShoulderR, 200.0, 200.0),
            Landmark2D::new(EarL, 270.0, 120.0),
            Landmark2D::new(EarR, 230.0, 120.0),
        ],
    );

    let frame = Frame::new(DepthMap::filled(WIDTH, HEIGHT, 2000), vec![back.clone()], 0.0);
    assert!(pipeline.process(&frame).unwrap()[0].turned_around);

    let mut front = back;
    front.insert(Landmark2D::new(EyeL, 260.0, 110.0));
    front.insert(Landmark2D::new(EyeR, 240.0, 110.0));

    let frame = Frame::new(DepthMap::filled(WIDTH, HEIGHT, 2000), vec![front], 0.04);
    assert!(!pipeline.process(&frame).unwrap()[0].turned_around);
}

#[test]
fn test_stale_tracks_are_evicted() {
    let mut config = Config::default();
    config.pipeline.max_track_age = 2;
    let mut pipeline = pipeline(config);

    let both = Frame::new(stepped_depth(), vec![facing_left_half(1), near_profile(2)], 0.0);
    pipeline.process(&both).unwrap();
    assert_eq!(pipeline.num_tracks(), 2);

    for i in 1..=3 {
        let only_one = Frame::new(stepped_depth(), vec![facing_left_half(1)], i as f32 * 0.04);
        pipeline.process(&only_one).unwrap();
    }

    assert_eq!(pipeline.num_tracks(), 1);
    assert!(pipeline.track(2).is_none());

    pipeline.process(&both).unwrap();
    let profile = pipeline.track(2).unwrap();
    assert_eq!(profile.body.history().len(), 1);
}

#[test]
fn test_reset_track() {
    let mut pipeline = pipeline(Config::default());
    let frame = Frame::new(stepped_depth(), vec![near_profile(2)], 0.0);
    pipeline.process(&frame).unwrap();

    pipeline.reset_track(2);

    let ctx = pipeline.track(2).unwrap();
    assert!(ctx.body.history().is_empty());
    assert_eq!(*ctx.body.state(), FilterState::from_config(&FilterConfig::default()));
}

#[test]
fn test_repeated_track_id_processed_once() {
    let mut pipeline = pipeline(Config::default());
    let frame = Frame::new(
        DepthMap::filled(WIDTH, HEIGHT, 2000),
        vec![facing_camera(4), facing_camera(4)],
        0.0,
    );

    let results = pipeline.process(&frame).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(pipeline.track(4).unwrap().body.history().len(), 1);
}

#[test]
fn test_rejects_mismatched_depth_map() {
    let mut pipeline = pipeline(Config::default());
    let frame = Frame::new(DepthMap::filled(320, 240, 2000), vec![facing_camera(1)], 0.0);

    match pipeline.process(&frame) {
        Err(Error::DepthMapShape { expected, actual }) => {
            assert_eq!(expected, (WIDTH, HEIGHT));
            assert_eq!(actual, (320, 240));
        }
        other => panic!("unexpected {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_rejects_bad_intrinsics() {
    let mut k = intrinsics();
    k.focal_y = -1.0;

    assert!(matches!(
        OrientationPipeline::new(k, Config::default()),
        Err(Error::InvalidIntrinsics(_))
    ));
}

#[test]
fn test_rejects_bad_config() {
    let mut config = Config::default();
    config.filter.measurement_variance = 0.0;

    assert!(matches!(
        OrientationPipeline::new(intrinsics(), config),
        Err(Error::InvalidConfig(_))
    ));
}
