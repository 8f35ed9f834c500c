use std::f32::consts::PI;

use glam::Vec3;

pub const PITCH: usize = 0;
pub const YAW: usize = 1;
pub const ROLL: usize = 2;

/// Converts a 16-bit wire angle to degrees.
pub fn short_to_angle(value: i16) -> f32 {
    value as f32 * (360.0 / 65536.0)
}

pub fn angle_to_short(degrees: f32) -> i32 {
    ((degrees * 65536.0 / 360.0) as i32) & 65535
}

/// Forward, right and up vectors for `(pitch, yaw, roll)` in degrees.
pub fn angle_vectors(angles: Vec3) -> (Vec3, Vec3, Vec3) {
    let (sy, cy) = (angles.y * (PI * 2.0 / 360.0)).sin_cos();
    let (sp, cp) = (angles.x * (PI * 2.0 / 360.0)).sin_cos();
    let (sr, cr) = (angles.z * (PI * 2.0 / 360.0)).sin_cos();

    let forward = Vec3::new(cp * cy, cp * sy, -sp);
    let right = Vec3::new(
        -sr * sp * cy + cr * sy,
        -sr * sp * sy - cr * cy,
        -sr * cp,
    );
    let up = Vec3::new(cr * sp * cy + sr * sy, cr * sp * sy - sr * cy, cr * cp);

    (forward, right, up)
}

/// Normalizes in place and returns the previous length. Zero vectors stay zero.
pub fn normalize_in_place(v: &mut Vec3) -> f32 {
    let length = v.length();
    if length != 0.0 {
        *v *= 1.0 / length;
    }
    length
}

pub fn snap_vector(v: Vec3) -> Vec3 {
    Vec3::new(v.x.round(), v.y.round(), v.z.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_zero_faces_positive_x() {
        let (forward, right, up) = angle_vectors(Vec3::ZERO);
        assert!((forward - Vec3::X).length() < 1e-6);
        assert!((right + Vec3::Y).length() < 1e-6);
        assert!((up - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn yaw_ninety_faces_positive_y() {
        let (forward, _, _) = angle_vectors(Vec3::new(0.0, 90.0, 0.0));
        assert!((forward - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn short_angle_conversion() {
        assert_eq!(angle_to_short(90.0), 16384);
        assert!((short_to_angle(16384) - 90.0).abs() < 1e-4);
        assert!((short_to_angle(-16384) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn normalize_keeps_zero() {
        let mut v = Vec3::ZERO;
        assert_eq!(normalize_in_place(&mut v), 0.0);
        assert_eq!(v, Vec3::ZERO);

        let mut v = Vec3::new(3.0, 0.0, 4.0);
        assert_eq!(normalize_in_place(&mut v), 5.0);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
}
