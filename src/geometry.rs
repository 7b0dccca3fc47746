// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use edgefirst_schemas::geometry_msgs::{Point, Pose, Quaternion, Vector3};
use nalgebra::{UnitQuaternion, Vector3 as Vec3};

/// Velocities below this norm have no usable heading.
const MIN_HEADING_SPEED: f64 = 1e-6;

/// Converts a spherical measurement (degrees) to sensor Cartesian coordinates
/// with x forward, y left and z up.
pub fn transform_xyz(range: f64, azimuth: f64, elevation: f64) -> [f64; 3] {
    let azi = azimuth.to_radians();
    let ele = elevation.to_radians();
    let x = range * ele.cos() * azi.cos();
    let y = range * ele.cos() * azi.sin();
    let z = range * ele.sin();
    [x, y, z]
}

/// Pose of a spherical measurement, oriented along the line of sight.
pub fn spherical_to_pose(range: f64, azimuth: f64, elevation: f64) -> Pose {
    let rotation =
        UnitQuaternion::from_euler_angles(0.0, -elevation.to_radians(), azimuth.to_radians());
    to_pose(transform_xyz(range, azimuth, elevation), &rotation)
}

/// Radial speed projected onto the line of sight of a spherical measurement.
pub fn radial_velocity(speed: f64, azimuth: f64, elevation: f64) -> Vector3 {
    let [x, y, z] = transform_xyz(speed, azimuth, elevation);
    Vector3 { x, y, z }
}

/// Pose at `position` heading along `velocity`.
///
/// The heading has no roll; a stationary target keeps the identity
/// orientation.
pub fn pose_from_pos_vel(position: [f64; 3], velocity: [f64; 3]) -> Pose {
    let vel = Vec3::from(velocity);
    let rotation = if vel.norm() < MIN_HEADING_SPEED {
        UnitQuaternion::identity()
    } else {
        let yaw = vel.y.atan2(vel.x);
        let pitch = (-vel.z).atan2(vel.x.hypot(vel.y));
        UnitQuaternion::from_euler_angles(0.0, pitch, yaw)
    };
    to_pose(position, &rotation)
}

/// Pose from a position and an x, y, z, w quaternion.
pub fn pose_from_parts(position: [f64; 3], orientation: [f64; 4]) -> Pose {
    let [x, y, z] = position;
    let [qx, qy, qz, qw] = orientation;
    Pose {
        position: Point { x, y, z },
        orientation: Quaternion {
            x: qx,
            y: qy,
            z: qz,
            w: qw,
        },
    }
}

fn to_pose(position: [f64; 3], rotation: &UnitQuaternion<f64>) -> Pose {
    let q = rotation.quaternion();
    pose_from_parts(position, [q.i, q.j, q.k, q.w])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn heading(pose: &Pose) -> Vec3<f64> {
        let o = &pose.orientation;
        let q = UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(o.w, o.x, o.y, o.z));
        q * Vec3::x()
    }

    #[test]
    fn test_transform_xyz() {
        let [x, y, z] = transform_xyz(10.0, 0.0, 0.0);
        assert!((x - 10.0).abs() < EPS && y.abs() < EPS && z.abs() < EPS);

        let [x, y, z] = transform_xyz(2.0, 90.0, 0.0);
        assert!(x.abs() < EPS && (y - 2.0).abs() < EPS && z.abs() < EPS);

        let [x, y, z] = transform_xyz(3.0, 0.0, 90.0);
        assert!(x.abs() < EPS && y.abs() < EPS && (z - 3.0).abs() < EPS);
    }

    #[test]
    fn test_spherical_pose_points_at_target() {
        let pose = spherical_to_pose(5.0, 30.0, 10.0);
        let p = &pose.position;
        let los = Vec3::new(p.x, p.y, p.z).normalize();
        assert!((heading(&pose) - los).norm() < 1e-6);
    }

    #[test]
    fn test_pose_follows_velocity() {
        let pose = pose_from_pos_vel([1.0, 2.0, 3.0], [0.0, 4.0, -4.0]);
        assert_eq!(pose.position.x, 1.0);
        assert_eq!(pose.position.y, 2.0);
        assert_eq!(pose.position.z, 3.0);

        let expected = Vec3::new(0.0, 4.0, -4.0).normalize();
        assert!((heading(&pose) - expected).norm() < 1e-6);

        // Heading straight backwards must not degenerate.
        let pose = pose_from_pos_vel([0.0; 3], [-2.0, 0.0, 0.0]);
        assert!((heading(&pose) - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_stationary_pose_is_identity() {
        let pose = pose_from_pos_vel([1.0, 1.0, 0.0], [0.0; 3]);
        assert_eq!(pose.orientation.w, 1.0);
        assert_eq!(pose.orientation.x, 0.0);
        assert_eq!(pose.orientation.y, 0.0);
        assert_eq!(pose.orientation.z, 0.0);
    }

    #[test]
    fn test_radial_velocity() {
        let v = radial_velocity(-2.0, 0.0, 0.0);
        assert!((v.x + 2.0).abs() < EPS && v.y.abs() < EPS && v.z.abs() < EPS);
    }
}
