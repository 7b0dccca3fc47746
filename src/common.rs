// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use edgefirst_schemas::builtin_interfaces::Time;
use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing::warn;

/// Source of message stamps and staleness time.
///
/// Successive calls must never go backwards.
pub trait Clock: Send {
    /// Current time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Reads `CLOCK_MONOTONIC_RAW`.
pub fn timestamp() -> Result<Duration, io::Error> {
    let mut tp = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    let err = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC_RAW, &mut tp) };
    if err != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(Duration::new(tp.tv_sec as u64, tp.tv_nsec as u32))
}

/// Clock backed by the raw monotonic system clock.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Duration>,
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        let mut last = match self.last.lock() {
            Ok(last) => last,
            Err(poisoned) => poisoned.into_inner(),
        };
        match timestamp() {
            Ok(now) => *last = now.max(*last),
            Err(err) => warn!("clock_gettime failed: {}", err),
        }
        *last
    }
}

/// Clock advanced by hand, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Starts the clock at `start`.
    pub fn new(start: Duration) -> Self {
        ManualClock {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += step;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Converts a clock reading into a message stamp.
pub fn to_stamp(time: Duration) -> Time {
    Time {
        sec: time.as_secs() as i32,
        nanosec: time.subsec_nanos(),
    }
}

/// Requests the real-time FIFO scheduler for the calling thread.
#[cfg(target_os = "linux")]
pub fn set_thread_priority() {
    let param = libc::sched_param { sched_priority: 10 };
    let err =
        unsafe { libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param) };
    if err != 0 {
        let err = io::Error::from_raw_os_error(err);
        warn!("unable to set real-time fifo scheduler: {}", err);
    }
}

/// Real-time scheduling is only requested on Linux.
#[cfg(not(target_os = "linux"))]
pub fn set_thread_priority() {}
