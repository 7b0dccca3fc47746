// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Published message types.
//!
//! The layouts follow the ROS radar message conventions so that CDR encoded
//! samples can be consumed by ROS2 bridges. Headers, poses and twists reuse
//! the EdgeFirst schema types.

use edgefirst_schemas::{
    builtin_interfaces::Time,
    geometry_msgs::{Pose, Twist, Vector3},
    std_msgs::Header,
};
use serde::{Deserialize, Serialize};

/// Single raw radar detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarTarget {
    /// Target id assigned by the sensor
    pub target_id: u32,
    /// Signal to noise ratio in dB
    pub snr: f64,
    /// Range in meters
    pub range: f64,
    /// Radial speed in m/s
    pub speed: f64,
    /// Azimuth in degrees
    pub azimuth: f64,
    /// Elevation in degrees
    pub elevation: f64,
}

/// Raw detections of one sensor cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarTargetArray {
    /// Stamp and frame of the detections
    pub header: Header,
    /// Valid detections
    pub targets: Vec<RadarTarget>,
}

impl RadarTargetArray {
    /// Schema name advertised in the zenoh encoding.
    pub const SCHEMA: &'static str = "radar_msgs/msg/RadarTargetArray";
}

/// Oriented box around a tracked object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Box center and orientation
    pub pose: Pose,
    /// Box extents in meters
    pub dimensions: Vector3,
}

/// Bounding boxes of one sensor cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBoxArray {
    /// Stamp and frame of the boxes
    pub header: Header,
    /// Boxes in sensor order
    pub boxes: Vec<BoundingBox>,
}

impl BoundingBoxArray {
    /// Schema name advertised in the zenoh encoding.
    pub const SCHEMA: &'static str = "radar_msgs/msg/BoundingBoxArray";
}

/// Object tracked by the sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarTrackedObject {
    /// Track id assigned by the sensor
    pub id: u32,
    /// Object position and heading
    pub pose: Pose,
    /// Object velocity, only the linear part is populated
    pub velocity: Twist,
    /// Object extents
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Tracked objects of one sensor cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarTrackedObjectArray {
    /// Stamp and frame of the objects
    pub header: Header,
    /// Objects with a valid track id
    pub objects: Vec<RadarTrackedObject>,
}

impl RadarTrackedObjectArray {
    /// Schema name advertised in the zenoh encoding.
    pub const SCHEMA: &'static str = "radar_msgs/msg/RadarTrackedObjectArray";
}

/// Fixed capabilities of the sensor, published once on a latched channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarInfo {
    /// Stamp at publication and sensor frame
    pub header: Header,
    /// Sensor update rate in Hz
    pub update_rate: f64,
    /// Maximum number of targets reported per cycle
    pub max_num_targets: u32,
    /// Minimum range in meters
    pub range_min: f64,
    /// Maximum range in meters
    pub range_max: f64,
    /// Minimum radial speed in m/s
    pub speed_min: f64,
    /// Maximum radial speed in m/s
    pub speed_max: f64,
    /// Minimum azimuth in degrees
    pub azimuth_min: f64,
    /// Maximum azimuth in degrees
    pub azimuth_max: f64,
    /// Minimum elevation in degrees
    pub elevation_min: f64,
    /// Maximum elevation in degrees
    pub elevation_max: f64,
    /// Range resolution in meters
    pub range_resolution: f64,
    /// Range accuracy in meters
    pub range_accuracy: f64,
    /// Speed resolution in m/s
    pub speed_resolution: f64,
    /// Speed accuracy in m/s
    pub speed_accuracy: f64,
    /// Azimuth resolution in degrees
    pub azimuth_resolution: f64,
    /// Azimuth accuracy in degrees
    pub azimuth_accuracy: f64,
    /// Elevation resolution in degrees
    pub elevation_resolution: f64,
    /// Elevation accuracy in degrees
    pub elevation_accuracy: f64,
}

impl RadarInfo {
    /// Schema name advertised in the zenoh encoding.
    pub const SCHEMA: &'static str = "radar_msgs/msg/RadarInfo";

    /// Capabilities of the O79 sensor from its datasheet.
    pub fn o79(frame_id: &str, stamp: Time) -> Self {
        RadarInfo {
            header: Header {
                stamp,
                frame_id: frame_id.to_string(),
            },
            update_rate: o79::UPDATE_RATE,
            max_num_targets: o79::MAX_NUM_TARGETS,
            range_min: o79::RANGE_MIN,
            range_max: o79::RANGE_MAX,
            speed_min: o79::SPEED_MIN,
            speed_max: o79::SPEED_MAX,
            azimuth_min: o79::AZIMUTH_MIN,
            azimuth_max: o79::AZIMUTH_MAX,
            elevation_min: o79::ELEVATION_MIN,
            elevation_max: o79::ELEVATION_MAX,
            range_resolution: o79::RANGE_RES,
            range_accuracy: o79::RANGE_ACC,
            speed_resolution: o79::SPEED_RES,
            speed_accuracy: o79::SPEED_ACC,
            azimuth_resolution: o79::AZIMUTH_RES,
            azimuth_accuracy: o79::AZIMUTH_ACC,
            elevation_resolution: o79::ELEVATION_RES,
            elevation_accuracy: o79::ELEVATION_ACC,
        }
    }
}

/// O79 sensor specifications.
pub mod o79 {
    /// Update rate in Hz
    pub const UPDATE_RATE: f64 = 20.0;
    /// Target list ceiling per cycle
    pub const MAX_NUM_TARGETS: u32 = 1000;

    /// Minimum range in meters
    pub const RANGE_MIN: f64 = 0.2;
    /// Maximum range in meters
    pub const RANGE_MAX: f64 = 40.0;

    /// Minimum speed in m/s
    pub const SPEED_MIN: f64 = -20.0;
    /// Maximum speed in m/s
    pub const SPEED_MAX: f64 = 20.0;

    /// Minimum azimuth in degrees
    pub const AZIMUTH_MIN: f64 = -60.0;
    /// Maximum azimuth in degrees
    pub const AZIMUTH_MAX: f64 = 60.0;

    /// Minimum elevation in degrees
    pub const ELEVATION_MIN: f64 = -15.0;
    /// Maximum elevation in degrees
    pub const ELEVATION_MAX: f64 = 15.0;

    /// Range resolution in meters
    pub const RANGE_RES: f64 = 0.04;
    /// Range accuracy in meters
    pub const RANGE_ACC: f64 = 0.02;

    /// Speed resolution in m/s
    pub const SPEED_RES: f64 = 0.06;
    /// Speed accuracy in m/s
    pub const SPEED_ACC: f64 = 0.03;

    /// Azimuth resolution in degrees
    pub const AZIMUTH_RES: f64 = 6.0;
    /// Azimuth accuracy in degrees
    pub const AZIMUTH_ACC: f64 = 1.0;

    /// Elevation resolution in degrees
    pub const ELEVATION_RES: f64 = 12.0;
    /// Elevation accuracy in degrees
    pub const ELEVATION_ACC: f64 = 2.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_o79_info() {
        let info = RadarInfo::o79("radar", Time { sec: 3, nanosec: 7 });

        assert_eq!(info.header.frame_id, "radar");
        assert_eq!(info.header.stamp.sec, 3);
        assert_eq!(info.header.stamp.nanosec, 7);
        assert_eq!(info.update_rate, o79::UPDATE_RATE);
        assert_eq!(info.max_num_targets, o79::MAX_NUM_TARGETS);
        assert!(info.range_min < info.range_max);
        assert!(info.speed_min < info.speed_max);
        assert!(info.azimuth_min < info.azimuth_max);
        assert!(info.elevation_min < info.elevation_max);
    }
}
