// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;

use args::Args;
use clap::Parser;
use radarrelay::{
    bus::{LatchedPublisher, ZenohPublisher},
    common::MonotonicClock,
    msgs::{BoundingBoxArray, RadarInfo, RadarTargetArray, RadarTrackedObjectArray},
    Channels, Driver, Publisher, Router, UdpTransport,
};
use edgefirst_schemas::sensor_msgs::PointCloud2;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt as _, Layer as _, Registry};

#[cfg(feature = "profiling")]
#[global_allocator]
static GLOBAL: tracy_client::ProfiledAllocator<std::alloc::System> =
    tracy_client::ProfiledAllocator::new(std::alloc::System, 100);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    args.tracy.then(tracy_client::Client::start);

    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(args.rust_log);

    let journald = match tracing_journald::layer() {
        Ok(journald) => Some(journald.with_filter(args.rust_log)),
        Err(_) => None,
    };

    let tracy = match args.tracy {
        true => Some(tracing_tracy::TracyLayer::default().with_filter(args.rust_log)),
        false => None,
    };

    let subscriber = Registry::default()
        .with(stdout_log)
        .with(journald)
        .with(tracy);
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
    tracing_log::LogTracer::init()?;

    let session = zenoh::open(args.clone()).await?;

    let cloud = match args.publish_raw_cloud {
        true => Some(Box::new(ZenohPublisher::<PointCloud2>::declare(
            &session,
            &args.cloud_topic,
            "sensor_msgs/msg/PointCloud2",
        )?) as Box<dyn Publisher<PointCloud2>>),
        false => None,
    };

    let channels = Channels {
        targets: Box::new(ZenohPublisher::<RadarTargetArray>::declare(
            &session,
            &args.targets_topic,
            RadarTargetArray::SCHEMA,
        )?),
        objects: Box::new(ZenohPublisher::<RadarTrackedObjectArray>::declare(
            &session,
            &args.objects_topic,
            RadarTrackedObjectArray::SCHEMA,
        )?),
        boxes: Box::new(ZenohPublisher::<BoundingBoxArray>::declare(
            &session,
            &args.boxes_topic,
            BoundingBoxArray::SCHEMA,
        )?),
        cloud,
    };

    let info = LatchedPublisher::<RadarInfo>::declare(&session, &args.info_topic, RadarInfo::SCHEMA)?;

    let router = Router::new(
        args.router_config(),
        channels,
        Box::new(MonotonicClock::default()),
    );
    let transport = UdpTransport::new(args.host_addr(), args.radar_addr(), args.receive_timeout());
    let mut driver = Driver::start(transport, router, Box::new(info))?;

    info!(
        "publishing radar {} on {} {} {}",
        args.frame_id, args.targets_topic, args.objects_topic, args.boxes_topic
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    tokio::task::spawn_blocking(move || driver.shutdown()).await?;

    Ok(())
}
