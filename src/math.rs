use nalgebra as na;

pub const PLANE_EPSILON: f32 = 1e-6;

const SIDE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneOrientation {
    pub arrow_start: na::Point3<f32>,
    pub arrow_end: na::Point3<f32>,

    /// Angle between the plane normal and the camera's +z axis, degrees in [0, 180]
    pub angle_to_camera_axis: f32,

    /// Inclination of the normal above the ground plane, degrees in [-90, 90]
    pub orientation_degrees: f32,
}

impl PlaneOrientation {
    #[inline]
    pub fn direction(&self) -> na::Unit<na::Vector3<f32>> {
        na::Unit::new_normalize(self.arrow_end - self.arrow_start)
    }
}

/// The normal is `(p3 - p1) x (p2 - p1)`, flipped away from `reference` only
/// when the reference lies off the plane.
pub fn plane_orientation(
    p1: &na::Point3<f32>,
    p2: &na::Point3<f32>,
    p3: &na::Point3<f32>,
    pivot: &na::Point3<f32>,
    reference: &na::Point3<f32>,
    arrow_length: f32,
) -> Option<PlaneOrientation> {
    let across = p2 - p1;
    let down = p3 - p1;

    let (mut normal, magnitude) = na::Unit::new_and_get(down.cross(&across));
    if !(magnitude > PLANE_EPSILON) {
        return None;
    }

    let side = normal.dot(&(reference - p1));
    if side > SIDE_EPSILON {
        normal = -normal;
    }

    let axis = na::Vector3::z();
    let angle_to_camera_axis = normal.dot(&axis).clamp(-1.0, 1.0).acos().to_degrees();
    let horizontal = (normal.x * normal.x + normal.z * normal.z).sqrt();
    let orientation_degrees = f32::atan2(-normal.y, horizontal).to_degrees();

    Some(PlaneOrientation {
        arrow_start: *pivot,
        arrow_end: pivot + normal.into_inner() * arrow_length,
        angle_to_camera_axis,
        orientation_degrees,
    })
}

// x right, y down, z forward: 0 looks away from the camera, 180 back at it
pub fn azimuth(direction: &na::Vector3<f32>) -> f32 {
    let deg = f32::atan2(direction.x, direction.z).to_degrees();
    let deg = if deg < 0.0 { deg + 360.0 } else { deg };

    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

#[inline]
pub fn body_azimuth(direction: &na::Vector3<f32>, _pelvis: &na::Point3<f32>) -> f32 {
    azimuth(direction)
}

#[inline]
pub fn gaze_azimuth(direction: &na::Vector3<f32>, _neck: &na::Point3<f32>) -> f32 {
    azimuth(direction)
}

/// Horizontal unit vector pointing along `degrees`, the inverse of [`azimuth`]
#[inline]
pub fn azimuth_direction(degrees: f32) -> na::Unit<na::Vector3<f32>> {
    let (s, c) = degrees.to_radians().sin_cos();

    na::Unit::new_unchecked(na::Vector3::new(s, 0.0, c))
}
