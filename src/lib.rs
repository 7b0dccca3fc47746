// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! RadarRelay Library
//!
//! This library republishes the decoded output of an O79 radar sensor. Each
//! receive from the sensor transport may carry raw detections, spherical
//! tracks, bounding boxes and Cartesian tracks; every representation is
//! converted and published on its own channel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────────────┐
//! │  Transport  │ ──► │  Driver thread   │ ──► │  Router              │
//! │  (UDP/test) │     │  (connect, loop) │     │  targets / objects / │
//! └─────────────┘     └──────────────────┘     │  boxes / cloud       │
//!                                              └──────────────────────┘
//! ```
//!
//! When only tracked data keeps arriving, the router forces an empty raw
//! frame once the raw channel has been quiet for longer than the staleness
//! window, so viewers stop drawing old detections.
//!
//! # Modules
//!
//! - [`driver`]: acquisition thread and lifecycle
//! - [`router`]: conversion dispatch and raw staleness handling
//! - [`transport`]: sensor transport abstraction and UDP transport
//! - [`publisher`]: publisher abstraction and in-memory publisher
//! - [`bus`]: Zenoh publishers (feature `zenoh`)

#![warn(missing_docs)]

/// Zenoh publishers
#[cfg(feature = "zenoh")]
pub mod bus;

/// Clocks and thread utilities
pub mod common;

/// Conversion of target records into messages
pub mod convert;

/// Acquisition loop and lifecycle
pub mod driver;

/// Pose and coordinate utilities
pub mod geometry;

/// Published message types
pub mod msgs;

/// Publisher abstraction
pub mod publisher;

/// Output routing and staleness handling
pub mod router;

/// Decoded target records
pub mod target;

/// Sensor transport
pub mod transport;

pub use driver::Driver;
pub use publisher::{MemoryPublisher, Publisher};
pub use router::{Channels, Router, RouterConfig};
pub use target::{BoundingBox, CartesianTarget, Scan, Target, TrackedTarget};
pub use transport::{Transport, UdpTransport};
