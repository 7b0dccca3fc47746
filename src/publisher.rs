// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

/// Publisher error types.
#[derive(Debug)]
pub enum Error {
    /// Message could not be encoded
    Serialize(String),
    /// Zenoh declaration or put failed
    #[cfg(feature = "zenoh")]
    Zenoh(zenoh::Error),
    /// A lock guarding publisher state was poisoned
    Poisoned,
}

impl std::error::Error for Error {}

#[cfg(feature = "zenoh")]
impl From<zenoh::Error> for Error {
    fn from(err: zenoh::Error) -> Error {
        Error::Zenoh(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Serialize(err) => write!(f, "serialize error: {}", err),
            #[cfg(feature = "zenoh")]
            Error::Zenoh(err) => write!(f, "zenoh error: {}", err),
            Error::Poisoned => write!(f, "publisher lock poisoned"),
        }
    }
}

/// Output channel for one message type.
///
/// The message is only borrowed for the duration of the call; the caller
/// reuses it for the next cycle.
pub trait Publisher<T>: Send {
    /// Publishes one message.
    fn publish(&self, msg: &T) -> Result<(), Error>;
}

/// Publisher keeping a copy of every message, shared between clones.
#[derive(Debug)]
pub struct MemoryPublisher<T> {
    messages: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for MemoryPublisher<T> {
    fn default() -> Self {
        MemoryPublisher {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Clone for MemoryPublisher<T> {
    fn clone(&self) -> Self {
        MemoryPublisher {
            messages: self.messages.clone(),
        }
    }
}

impl<T: Clone> MemoryPublisher<T> {
    /// Creates an empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages published so far.
    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// True when nothing was published.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of the published messages, oldest first.
    pub fn messages(&self) -> Vec<T> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl<T: Clone + Send> Publisher<T> for MemoryPublisher<T> {
    fn publish(&self, msg: &T) -> Result<(), Error> {
        self.messages
            .lock()
            .map_err(|_| Error::Poisoned)?
            .push(msg.clone());
        Ok(())
    }
}
