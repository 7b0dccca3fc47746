// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    common::set_thread_priority,
    msgs::RadarInfo,
    publisher::{self, Publisher},
    router::Router,
    transport::{self, Transport},
};
use std::{
    fmt, io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};
use tracing::{error, info, trace, warn};

/// Driver start-up error types.
#[derive(Debug)]
pub enum Error {
    /// I/O error while spawning the acquisition thread
    Io(io::Error),
    /// Sensor capabilities could not be published
    Publish(publisher::Error),
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<publisher::Error> for Error {
    fn from(err: publisher::Error) -> Error {
        Error::Publish(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Publish(err) => write!(f, "publish error: {}", err),
        }
    }
}

/// Runs the acquisition loop on a dedicated thread for its whole lifetime.
///
/// Dropping the driver stops the loop and waits for the thread to exit. The
/// loop only observes the stop request between receives, so teardown may
/// block for up to one transport receive timeout.
pub struct Driver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    _info: Box<dyn Publisher<RadarInfo>>,
}

impl Driver {
    /// Publishes the sensor capabilities on the latched `info` channel and
    /// starts the acquisition thread.
    ///
    /// `info` is kept alive with the driver so late joiners can still fetch
    /// the capabilities.
    pub fn start<T>(
        transport: T,
        router: Router,
        info: Box<dyn Publisher<RadarInfo>>,
    ) -> Result<Self, Error>
    where
        T: Transport + 'static,
    {
        info.publish(&router.capabilities())?;

        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = thread::Builder::new()
            .name("radar".to_string())
            .spawn(move || acquire(transport, router, flag))?;

        Ok(Driver {
            running,
            handle: Some(handle),
            _info: info,
        })
    }

    /// True while the acquisition thread has not been asked to stop.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops the acquisition loop and waits for its thread to exit.
    ///
    /// Calling it again after the thread has exited does nothing.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("radar acquisition thread panicked");
            }
            info!("radar acquisition stopped");
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn acquire<T: Transport>(mut transport: T, mut router: Router, running: Arc<AtomicBool>) {
    set_thread_priority();

    match transport.connect() {
        Ok(()) => info!("radar {} transport connected", router.frame_id()),
        Err(err) => error!("radar {} connect error: {}", router.frame_id(), err),
    }

    while running.load(Ordering::Acquire) {
        match transport.receive() {
            Ok(scan) => router.dispatch(&scan),
            Err(transport::Error::Timeout) => trace!("radar receive timeout"),
            Err(err) => warn!("failed to read radar data: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::ManualClock,
        msgs::{BoundingBoxArray, RadarTargetArray, RadarTrackedObjectArray},
        publisher::MemoryPublisher,
        router::{Channels, RouterConfig},
        target::{CartesianTarget, Scan, Target},
    };
    use std::{
        collections::VecDeque,
        sync::Mutex,
        time::{Duration, Instant},
    };

    /// Replays queued results, then times out until stopped.
    struct ScriptedTransport {
        connect: Option<transport::Error>,
        script: Arc<Mutex<VecDeque<Result<Scan, transport::Error>>>>,
        connects: Arc<Mutex<usize>>,
        receives: Arc<Mutex<usize>>,
    }

    impl Transport for ScriptedTransport {
        fn connect(&mut self) -> Result<(), transport::Error> {
            *self.connects.lock().unwrap() += 1;
            match self.connect.take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn receive(&mut self) -> Result<Scan, transport::Error> {
            *self.receives.lock().unwrap() += 1;
            match self.script.lock().unwrap().pop_front() {
                Some(result) => result,
                None => {
                    thread::sleep(Duration::from_millis(5));
                    Err(transport::Error::Timeout)
                }
            }
        }
    }

    struct Harness {
        targets: MemoryPublisher<RadarTargetArray>,
        objects: MemoryPublisher<RadarTrackedObjectArray>,
        boxes: MemoryPublisher<BoundingBoxArray>,
        info: MemoryPublisher<RadarInfo>,
        script: Arc<Mutex<VecDeque<Result<Scan, transport::Error>>>>,
        connects: Arc<Mutex<usize>>,
        receives: Arc<Mutex<usize>>,
    }

    fn start(script: Vec<Result<Scan, transport::Error>>) -> (Driver, Harness) {
        start_with(None, script)
    }

    fn start_with(
        connect: Option<transport::Error>,
        script: Vec<Result<Scan, transport::Error>>,
    ) -> (Driver, Harness) {
        let harness = Harness {
            targets: MemoryPublisher::new(),
            objects: MemoryPublisher::new(),
            boxes: MemoryPublisher::new(),
            info: MemoryPublisher::new(),
            script: Arc::new(Mutex::new(script.into())),
            connects: Arc::new(Mutex::new(0)),
            receives: Arc::new(Mutex::new(0)),
        };
        let transport = ScriptedTransport {
            connect,
            script: harness.script.clone(),
            connects: harness.connects.clone(),
            receives: harness.receives.clone(),
        };
        let channels = Channels {
            targets: Box::new(harness.targets.clone()),
            objects: Box::new(harness.objects.clone()),
            boxes: Box::new(harness.boxes.clone()),
            cloud: None,
        };
        let config = RouterConfig {
            frame_id: "radar".to_string(),
            ..Default::default()
        };
        let router = Router::new(
            config,
            channels,
            Box::new(ManualClock::new(Duration::from_secs(10))),
        );
        let driver = Driver::start(transport, router, Box::new(harness.info.clone())).unwrap();
        (driver, harness)
    }

    fn wait_for(what: &str, cond: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "timed out waiting for {}", what);
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_publishes_capabilities_once() {
        let (mut driver, harness) = start(vec![]);
        wait_for("receive", || *harness.receives.lock().unwrap() > 3);
        driver.shutdown();

        let info = harness.info.messages();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].header.frame_id, "radar");
        assert_eq!(info[0].update_rate, crate::msgs::o79::UPDATE_RATE);
        assert_eq!(*harness.connects.lock().unwrap(), 1);
    }

    #[test]
    fn test_receive_errors_are_not_fatal() {
        let scan = Scan {
            targets: vec![Target {
                id: 1,
                range: 2.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let (mut driver, harness) = start(vec![
            Err(transport::Error::NotConnected),
            Err(transport::Error::Io(io::Error::other("boom"))),
            Ok(scan),
        ]);

        wait_for("targets", || !harness.targets.is_empty());
        assert!(driver.is_running());
        driver.shutdown();

        let targets = harness.targets.messages();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].targets.len(), 1);
        assert_eq!(targets[0].targets[0].target_id, 1);
        assert!(harness.objects.is_empty());
        assert!(harness.boxes.is_empty());
    }

    #[test]
    fn test_connect_failure_keeps_receiving() {
        let scan = Scan {
            targets: vec![Target {
                id: 3,
                range: 1.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let (mut driver, harness) = start_with(
            Some(transport::Error::NotConnected),
            vec![
                Err(transport::Error::NotConnected),
                Err(transport::Error::Timeout),
                Ok(scan),
            ],
        );

        wait_for("targets", || !harness.targets.is_empty());
        assert!(driver.is_running());
        driver.shutdown();

        assert_eq!(*harness.connects.lock().unwrap(), 1);
        assert!(*harness.receives.lock().unwrap() >= 3);
        let targets = harness.targets.messages();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].targets[0].target_id, 3);
        assert_eq!(harness.info.len(), 1);
    }

    #[test]
    fn test_invalid_cartesian_clears_objects() {
        let scan = Scan {
            tracked_cartesian: vec![CartesianTarget {
                id: -1,
                ..Default::default()
            }],
            ..Default::default()
        };
        let (driver, harness) = start(vec![Ok(scan)]);

        wait_for("objects", || !harness.objects.is_empty());
        drop(driver);

        let objects = harness.objects.messages();
        assert_eq!(objects.len(), 1);
        assert!(objects[0].objects.is_empty());
    }

    #[test]
    fn test_no_receive_after_shutdown() {
        let (mut driver, harness) = start(vec![]);
        wait_for("receive", || *harness.receives.lock().unwrap() > 0);

        driver.shutdown();
        assert!(!driver.is_running());
        let receives = *harness.receives.lock().unwrap();

        harness.script.lock().unwrap().push_back(Ok(Scan {
            targets: vec![Target::default()],
            ..Default::default()
        }));
        thread::sleep(Duration::from_millis(20));

        assert_eq!(*harness.receives.lock().unwrap(), receives);
        assert!(harness.targets.is_empty());

        // A second teardown is a no-op.
        driver.shutdown();
    }
}
