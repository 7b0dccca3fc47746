// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use clap::Parser;
use radarrelay::RouterConfig;
use serde_json::json;
use tracing::level_filters::LevelFilter;
use zenoh::config::{Config, WhatAmI};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Local address receiving radar data
    #[arg(long, env, default_value = "10.0.0.75")]
    pub host_ip: IpAddr,

    /// Local port receiving radar data
    #[arg(long, env, default_value = "1024")]
    pub host_port: u16,

    /// Radar address
    #[arg(long, env, default_value = "10.0.0.10")]
    pub radar_ip: IpAddr,

    /// Radar port
    #[arg(long, env, default_value = "7")]
    pub radar_port: u16,

    /// Radar receive timeout in milliseconds, bounds the shutdown latency.
    #[arg(long, env, default_value = "100")]
    pub receive_timeout: u64,

    /// The name of the radar frame stamped into every message
    #[arg(long, env, default_value = "map")]
    pub frame_id: String,

    /// Also publish the raw targets as a point cloud on the cloud_topic.
    #[arg(long, env, default_value = "false")]
    pub publish_raw_cloud: bool,

    /// Seconds without raw targets before an empty raw frame is published
    /// to clear stale detections.
    #[arg(long, env, default_value = "0.4")]
    pub raw_timeout: f64,

    /// raw radar targets topic name
    #[arg(long, default_value = "rt/radar/targets/raw")]
    pub targets_topic: String,

    /// tracked objects topic name
    #[arg(long, default_value = "rt/radar/objects")]
    pub objects_topic: String,

    /// tracked object bounding boxes topic name
    #[arg(long, default_value = "rt/radar/boxes")]
    pub boxes_topic: String,

    /// raw targets point cloud topic name
    #[arg(long, default_value = "rt/radar/cloud/raw")]
    pub cloud_topic: String,

    /// latched radar info topic name
    #[arg(long, default_value = "rt/radar/info")]
    pub info_topic: String,

    /// Application log level
    #[arg(long, env, default_value = "info")]
    pub rust_log: LevelFilter,

    /// Enable Tracy profiler broadcast
    #[arg(long, env)]
    pub tracy: bool,

    /// zenoh connection mode
    #[arg(long, env, default_value = "peer")]
    mode: WhatAmI,

    /// connect to zenoh endpoints
    #[arg(long, env)]
    connect: Vec<String>,

    /// listen to zenoh endpoints
    #[arg(long, env)]
    listen: Vec<String>,

    /// disable zenoh multicast scouting
    #[arg(long, env)]
    no_multicast_scouting: bool,
}

impl Args {
    pub fn host_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host_ip, self.host_port)
    }

    pub fn radar_addr(&self) -> SocketAddr {
        SocketAddr::new(self.radar_ip, self.radar_port)
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout.max(1))
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            frame_id: self.frame_id.clone(),
            raw_timeout: Duration::try_from_secs_f64(self.raw_timeout)
                .unwrap_or(radarrelay::router::RAW_TIMEOUT),
            tracy: self.tracy,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut config = Config::default();

        config
            .insert_json5("mode", &json!(args.mode).to_string())
            .unwrap();

        if !args.connect.is_empty() {
            config
                .insert_json5("connect/endpoints", &json!(args.connect).to_string())
                .unwrap();
        }

        if !args.listen.is_empty() {
            config
                .insert_json5("listen/endpoints", &json!(args.listen).to_string())
                .unwrap();
        }

        if args.no_multicast_scouting {
            config
                .insert_json5("scouting/multicast/enabled", &json!(false).to_string())
                .unwrap();
        }

        config
    }
}
