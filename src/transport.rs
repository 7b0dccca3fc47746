// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::target::Scan;
use std::{
    fmt, io,
    net::{SocketAddr, UdpSocket},
    thread,
    time::Duration,
};
use tracing::{debug, info};

/// Largest datagram accepted from the sensor bridge.
const MAX_DATAGRAM_SIZE: usize = 65507;

/// Transport error types.
#[derive(Debug)]
pub enum Error {
    /// I/O error from underlying socket operations
    Io(io::Error),
    /// No data arrived within the receive timeout
    Timeout,
    /// The socket has not been opened yet
    NotConnected,
    /// Datagram did not contain a valid scan
    Decode(serde_json::Error),
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout,
            _ => Error::Io(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Decode(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Timeout => write!(f, "receive timed out"),
            Error::NotConnected => write!(f, "not connected"),
            Error::Decode(err) => write!(f, "decode error: {}", err),
        }
    }
}

/// Source of decoded sensor scans.
pub trait Transport: Send {
    /// Opens the session with the sensor.
    fn connect(&mut self) -> Result<(), Error>;

    /// Blocks until the next scan arrives, the transport fails or its
    /// receive timeout expires.
    fn receive(&mut self) -> Result<Scan, Error>;
}

/// Receives scans as JSON datagrams from the radar decoder.
///
/// The socket is bound to the host address and connected to the sensor
/// address, so datagrams from any other peer are discarded by the kernel.
/// A receive without an open socket waits one timeout and then retries
/// `connect`.
#[derive(Debug)]
pub struct UdpTransport {
    host: SocketAddr,
    radar: SocketAddr,
    timeout: Duration,
    socket: Option<UdpSocket>,
    buf: Vec<u8>,
}

impl UdpTransport {
    /// Creates an unconnected transport.
    pub fn new(host: SocketAddr, radar: SocketAddr, timeout: Duration) -> Self {
        UdpTransport {
            host,
            radar,
            timeout,
            socket: None,
            buf: vec![0; MAX_DATAGRAM_SIZE],
        }
    }

    /// Local address of the connected socket.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        match &self.socket {
            Some(socket) => Ok(socket.local_addr()?),
            None => Err(Error::NotConnected),
        }
    }
}

impl Transport for UdpTransport {
    fn connect(&mut self) -> Result<(), Error> {
        let socket = UdpSocket::bind(self.host)?;
        socket.connect(self.radar)?;
        socket.set_read_timeout(Some(self.timeout))?;
        info!("listening on {} for radar {}", self.host, self.radar);
        self.socket = Some(socket);
        Ok(())
    }

    fn receive(&mut self) -> Result<Scan, Error> {
        if self.socket.is_none() {
            thread::sleep(self.timeout);
            self.connect()?;
        }

        let socket = self.socket.as_ref().ok_or(Error::NotConnected)?;
        let n = socket.recv(&mut self.buf)?;
        debug!("received {} byte scan", n);
        Ok(serde_json::from_slice(&self.buf[..n])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;

    fn localhost() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[test]
    fn test_receive_reconnects() {
        let radar = UdpSocket::bind(localhost()).unwrap();
        let mut transport = UdpTransport::new(
            localhost(),
            radar.local_addr().unwrap(),
            Duration::from_millis(10),
        );
        assert!(matches!(transport.local_addr(), Err(Error::NotConnected)));

        assert!(matches!(transport.receive(), Err(Error::Timeout)));
        assert!(transport.local_addr().is_ok());
    }

    #[test]
    fn test_receive_scan() {
        let radar = UdpSocket::bind(localhost()).unwrap();
        let mut transport = UdpTransport::new(
            localhost(),
            radar.local_addr().unwrap(),
            Duration::from_millis(500),
        );
        transport.connect().unwrap();

        let scan = Scan {
            targets: vec![Target {
                id: 1,
                range: 3.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let payload = serde_json::to_vec(&scan).unwrap();
        radar
            .send_to(&payload, transport.local_addr().unwrap())
            .unwrap();

        assert_eq!(transport.receive().unwrap(), scan);
    }

    #[test]
    fn test_receive_timeout() {
        let radar = UdpSocket::bind(localhost()).unwrap();
        let mut transport = UdpTransport::new(
            localhost(),
            radar.local_addr().unwrap(),
            Duration::from_millis(20),
        );
        transport.connect().unwrap();
        assert!(matches!(transport.receive(), Err(Error::Timeout)));
    }

    #[test]
    fn test_receive_garbage() {
        let radar = UdpSocket::bind(localhost()).unwrap();
        let mut transport = UdpTransport::new(
            localhost(),
            radar.local_addr().unwrap(),
            Duration::from_millis(500),
        );
        transport.connect().unwrap();
        radar
            .send_to(b"not a scan", transport.local_addr().unwrap())
            .unwrap();
        assert!(matches!(transport.receive(), Err(Error::Decode(_))));
    }
}
