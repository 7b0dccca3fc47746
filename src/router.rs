// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    common::{to_stamp, Clock},
    convert::{
        bounding_box_to_msg, cartesian_to_object, format_cloud, target_to_msg, target_to_object,
    },
    msgs::{BoundingBoxArray, RadarInfo, RadarTargetArray, RadarTrackedObjectArray},
    publisher::Publisher,
    target::{BoundingBox, CartesianTarget, Scan, Target, TrackedTarget},
};
use edgefirst_schemas::{builtin_interfaces::Time, sensor_msgs::PointCloud2, std_msgs::Header};
use std::time::Duration;
use tracing::{debug, error, info_span, trace};
use tracy_client::{frame_mark, plot};

/// Default gap without raw targets before an empty raw frame is forced.
pub const RAW_TIMEOUT: Duration = Duration::from_millis(400);

/// Router settings.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Frame id stamped into every published header
    pub frame_id: String,
    /// Staleness window of the raw targets channel
    pub raw_timeout: Duration,
    /// Emit Tracy plots and frame marks
    pub tracy: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            frame_id: "map".to_string(),
            raw_timeout: RAW_TIMEOUT,
            tracy: false,
        }
    }
}

/// Output channels of the router. The cloud channel is optional.
pub struct Channels {
    /// Raw targets
    pub targets: Box<dyn Publisher<RadarTargetArray>>,
    /// Tracked objects, from spherical or Cartesian tracks
    pub objects: Box<dyn Publisher<RadarTrackedObjectArray>>,
    /// Tracked object bounding boxes
    pub boxes: Box<dyn Publisher<BoundingBoxArray>>,
    /// Raw targets as a point cloud
    pub cloud: Option<Box<dyn Publisher<PointCloud2>>>,
}

/// Converts scans into output messages and publishes them.
///
/// One record per representation is kept and refilled every cycle, so its
/// frame id is set once at construction.
pub struct Router {
    config: RouterConfig,
    channels: Channels,
    clock: Box<dyn Clock>,
    targets: RadarTargetArray,
    objects: RadarTrackedObjectArray,
    boxes: BoundingBoxArray,
    last_raw: Option<Duration>,
}

fn publish<T>(channel: &str, publisher: &dyn Publisher<T>, msg: &T) {
    let _span = info_span!("publish", channel).entered();
    if let Err(e) = publisher.publish(msg) {
        error!("{} publish error: {:?}", channel, e);
    }
}

impl Router {
    /// Creates a router publishing on `channels`, stamping with `clock`.
    pub fn new(config: RouterConfig, channels: Channels, clock: Box<dyn Clock>) -> Self {
        let header = Header {
            stamp: Time { sec: 0, nanosec: 0 },
            frame_id: config.frame_id.clone(),
        };

        Router {
            targets: RadarTargetArray {
                header: header.clone(),
                targets: Vec::new(),
            },
            objects: RadarTrackedObjectArray {
                header: header.clone(),
                objects: Vec::new(),
            },
            boxes: BoundingBoxArray {
                header,
                boxes: Vec::new(),
            },
            last_raw: None,
            config,
            channels,
            clock,
        }
    }

    /// Frame id stamped into every published header.
    pub fn frame_id(&self) -> &str {
        &self.config.frame_id
    }

    /// Time of the last raw targets publish, including forced empty frames.
    pub fn last_raw(&self) -> Option<Duration> {
        self.last_raw
    }

    /// Sensor capabilities stamped now in the router's frame.
    pub fn capabilities(&self) -> RadarInfo {
        RadarInfo::o79(&self.config.frame_id, to_stamp(self.clock.now()))
    }

    /// Publishes every non-empty collection of `scan`.
    ///
    /// Raw targets go first so the staleness check after a tracked publish
    /// sees this cycle's raw frame.
    pub fn dispatch(&mut self, scan: &Scan) {
        if scan.is_empty() {
            trace!("empty scan");
            return;
        }

        if !scan.targets.is_empty() {
            self.publish_targets(&scan.targets);
        }

        if !scan.tracked.is_empty() {
            self.publish_tracked(&scan.tracked);
        }

        if !scan.boxes.is_empty() {
            self.publish_boxes(&scan.boxes);
        }

        if !scan.tracked_cartesian.is_empty() {
            self.publish_tracked_cartesian(&scan.tracked_cartesian);
        }

        self.config.tracy.then(frame_mark);
    }

    /// Publishes the valid raw targets, and their point cloud when enabled.
    pub fn publish_targets(&mut self, targets: &[Target]) {
        let now = self.clock.now();
        self.targets.targets.clear();
        self.targets.targets.extend(
            targets
                .iter()
                .filter(|t| t.is_valid())
                .map(target_to_msg),
        );

        if self.config.tracy {
            plot!("targets", self.targets.targets.len() as f64);
        }

        self.emit_targets(now);
    }

    /// Publishes the valid spherical tracks as tracked objects.
    pub fn publish_tracked(&mut self, tracked: &[TrackedTarget]) {
        self.objects.header.stamp = to_stamp(self.clock.now());
        self.objects.objects.clear();
        self.objects.objects.extend(
            tracked
                .iter()
                .filter(|t| t.is_valid())
                .map(target_to_object),
        );

        if self.config.tracy {
            plot!("tracks", self.objects.objects.len() as f64);
        }

        publish("objects", &*self.channels.objects, &self.objects);
        self.clear_stale_targets();
    }

    /// Publishes the bounding boxes.
    pub fn publish_boxes(&mut self, boxes: &[BoundingBox]) {
        self.boxes.header.stamp = to_stamp(self.clock.now());
        self.boxes.boxes.clear();
        self.boxes
            .boxes
            .extend(boxes.iter().map(bounding_box_to_msg));

        publish("boxes", &*self.channels.boxes, &self.boxes);
    }

    /// Publishes the valid Cartesian tracks as tracked objects.
    ///
    /// Invalid tracks are skipped, so an input without any valid track
    /// publishes an empty record which clears the objects channel.
    pub fn publish_tracked_cartesian(&mut self, tracked: &[CartesianTarget]) {
        self.objects.header.stamp = to_stamp(self.clock.now());
        self.objects.objects.clear();
        self.objects.objects.extend(
            tracked
                .iter()
                .filter(|t| t.is_valid())
                .map(cartesian_to_object),
        );

        if self.config.tracy {
            plot!("tracks", self.objects.objects.len() as f64);
        }

        publish("objects", &*self.channels.objects, &self.objects);
        self.clear_stale_targets();
    }

    /// Forces an empty raw frame when raw targets have been absent for longer
    /// than the staleness window. Runs after every tracked publish.
    fn clear_stale_targets(&mut self) {
        let now = self.clock.now();
        let stale = match self.last_raw {
            None => true,
            Some(last) => now.saturating_sub(last) > self.config.raw_timeout,
        };

        if stale {
            debug!("raw targets stale, publishing empty frame");
            self.targets.targets.clear();
            self.emit_targets(now);
        }
    }

    fn emit_targets(&mut self, now: Duration) {
        self.targets.header.stamp = to_stamp(now);
        publish("targets", &*self.channels.targets, &self.targets);

        if let Some(cloud) = &self.channels.cloud {
            publish("cloud", &**cloud, &format_cloud(&self.targets));
        }

        self.last_raw = Some(now);
    }
}
