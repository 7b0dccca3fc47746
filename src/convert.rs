// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    geometry::{
        pose_from_parts, pose_from_pos_vel, radial_velocity, spherical_to_pose, transform_xyz,
    },
    msgs::{self, RadarTarget, RadarTargetArray, RadarTrackedObject},
    target::{BoundingBox, CartesianTarget, Target, TrackedTarget},
};
use edgefirst_schemas::{
    geometry_msgs::{Twist, Vector3},
    sensor_msgs::{PointCloud2, PointField},
};
use tracing::instrument;

/// Extent of the proxy box attached to Cartesian tracks, in meters.
pub const CARTESIAN_BOX_EXTENT: f64 = 0.01;

/// Bytes per point in the raw cloud: x, y, z, speed, snr.
const POINT_STEP: u32 = 20;

/// Datatype codes of `sensor_msgs/PointField`.
#[derive(Debug)]
#[allow(dead_code)]
pub enum PointFieldType {
    /// Signed 8 bit integer
    INT8 = 1,
    /// Unsigned 8 bit integer
    UINT8 = 2,
    /// Signed 16 bit integer
    INT16 = 3,
    /// Unsigned 16 bit integer
    UINT16 = 4,
    /// Signed 32 bit integer
    INT32 = 5,
    /// Unsigned 32 bit integer
    UINT32 = 6,
    /// 32 bit float
    FLOAT32 = 7,
    /// 64 bit float
    FLOAT64 = 8,
}

/// Raw detection message for a valid target.
pub fn target_to_msg(target: &Target) -> RadarTarget {
    RadarTarget {
        target_id: target.id as u32,
        snr: target.snr,
        range: target.range,
        speed: target.speed,
        azimuth: target.azimuth,
        elevation: target.elevation,
    }
}

/// Tracked object for a spherical track.
///
/// The pose looks along the line of sight and the velocity is the radial
/// speed along that direction. The box carries the pose with zero extents.
pub fn target_to_object(target: &TrackedTarget) -> RadarTrackedObject {
    let pose = spherical_to_pose(target.range, target.azimuth, target.elevation);
    let linear = radial_velocity(target.speed, target.azimuth, target.elevation);

    RadarTrackedObject {
        id: target.id as u32,
        pose: pose.clone(),
        velocity: twist(linear),
        bbox: msgs::BoundingBox {
            pose,
            dimensions: Vector3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
        },
    }
}

/// Tracked object for a Cartesian track, with a minimal proxy box.
pub fn cartesian_to_object(target: &CartesianTarget) -> RadarTrackedObject {
    let pose = pose_from_pos_vel(target.position, target.velocity);
    let [x, y, z] = target.velocity;

    RadarTrackedObject {
        id: target.id as u32,
        pose: pose.clone(),
        velocity: twist(Vector3 { x, y, z }),
        bbox: msgs::BoundingBox {
            pose,
            dimensions: Vector3 {
                x: CARTESIAN_BOX_EXTENT,
                y: CARTESIAN_BOX_EXTENT,
                z: CARTESIAN_BOX_EXTENT,
            },
        },
    }
}

/// Box message for a measured bounding box.
pub fn bounding_box_to_msg(bbox: &BoundingBox) -> msgs::BoundingBox {
    let [x, y, z] = bbox.dimensions;
    msgs::BoundingBox {
        pose: pose_from_parts(bbox.position, bbox.orientation),
        dimensions: Vector3 { x, y, z },
    }
}

fn twist(linear: Vector3) -> Twist {
    Twist {
        linear,
        angular: Vector3 {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
    }
}

/// Converts raw detections into a point cloud with the same header and points.
#[instrument(skip_all)]
pub fn format_cloud(msg: &RadarTargetArray) -> PointCloud2 {
    let n_targets = msg.targets.len() as u32;
    let data: Vec<u8> = msg
        .targets
        .iter()
        .flat_map(|target| {
            let [x, y, z] = transform_xyz(target.range, target.azimuth, target.elevation);
            [
                x as f32,
                y as f32,
                z as f32,
                target.speed as f32,
                target.snr as f32,
            ]
        })
        .flat_map(|elem| elem.to_le_bytes())
        .collect();

    let fields = ["x", "y", "z", "speed", "snr"]
        .iter()
        .enumerate()
        .map(|(i, name)| PointField {
            name: name.to_string(),
            offset: 4 * i as u32,
            datatype: PointFieldType::FLOAT32 as u8,
            count: 1,
        })
        .collect();

    PointCloud2 {
        header: msg.header.clone(),
        height: 1,
        width: n_targets,
        fields,
        is_bigendian: false,
        point_step: POINT_STEP,
        row_step: POINT_STEP * n_targets,
        data,
        is_dense: true,
    }
}
