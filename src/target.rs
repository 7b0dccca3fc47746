// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use serde::{Deserialize, Serialize};

/// Radar detection reported in sensor spherical coordinates.
///
/// A negative `id` marks an unused slot in the sensor's target list; such
/// entries are never published.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    /// Target id, negative when the slot is invalid
    pub id: i32,
    /// Range distance in meters
    pub range: f64,
    /// Radial velocity in m/s
    pub speed: f64,
    /// Azimuth angle in degrees
    pub azimuth: f64,
    /// Elevation angle in degrees
    pub elevation: f64,
    /// Signal to noise ratio in dB
    pub snr: f64,
}

impl Target {
    /// True when the target carries a valid (non-negative) id.
    pub fn is_valid(&self) -> bool {
        self.id >= 0
    }
}

/// Tracked targets share the spherical detection layout.
pub type TrackedTarget = Target;

/// Oriented bounding box of a tracked object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Box center in meters
    pub position: [f64; 3],
    /// Box orientation quaternion ordered x, y, z, w
    pub orientation: [f64; 4],
    /// Box extents along x, y and z in meters
    pub dimensions: [f64; 3],
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox {
            position: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
            dimensions: [0.0; 3],
        }
    }
}

/// Tracked target reported in Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianTarget {
    /// Track id, negative when the slot is invalid
    pub id: i32,
    /// Position in meters
    pub position: [f64; 3],
    /// Velocity in m/s
    pub velocity: [f64; 3],
}

impl CartesianTarget {
    /// True when the target carries a valid (non-negative) id.
    pub fn is_valid(&self) -> bool {
        self.id >= 0
    }
}

/// The collections decoded from a single transport receive.
///
/// Any subset of the collections may be empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scan {
    /// Raw detections
    pub targets: Vec<Target>,
    /// Tracked targets in spherical coordinates
    pub tracked: Vec<TrackedTarget>,
    /// Tracked object bounding boxes
    pub boxes: Vec<BoundingBox>,
    /// Tracked targets in Cartesian coordinates
    pub tracked_cartesian: Vec<CartesianTarget>,
}

impl Scan {
    /// True when none of the collections holds an entry.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
            && self.tracked.is_empty()
            && self.boxes.is_empty()
            && self.tracked_cartesian.is_empty()
    }
}
