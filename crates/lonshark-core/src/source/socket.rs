//! Live LonTalk/IP reception over UDP.
//!
//! Devices exchange CNIP datagrams on a well-known UDP port, sending from and
//! to that same port, so the local socket binds it too and is connected to
//! the device. One `recv` yields exactly one datagram.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use thiserror::Error;

use crate::packet::{DecodeError, Packet, decode};

/// Well-known LonTalk/IP (CNIP) UDP port.
pub const LONTALK_PORT: u16 = 1628;
/// Largest datagram read in one receive; longer datagrams are truncated by the OS.
pub const MAX_DATAGRAM_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl SocketError {
    /// Receive timeouts surface as `WouldBlock` or `TimedOut` depending on the platform.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SocketError::Io(err) if matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            )
        )
    }
}

/// UDP socket connected to one LonTalk/IP device.
#[derive(Debug)]
pub struct LonSocket {
    socket: UdpSocket,
}

impl LonSocket {
    /// Bind `port` on all local interfaces and connect to `device:port`.
    pub fn dial(device: IpAddr, port: u16) -> Result<Self, SocketError> {
        let local = match device {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port),
        };
        let remote = SocketAddr::new(device, port);
        let socket = UdpSocket::bind(local)?;
        socket.connect(remote)?;
        tracing::info!(%local, %remote, "LonTalk/IP socket connected");
        Ok(Self { socket })
    }

    /// Wrap an already bound (and usually connected) socket.
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }

    /// `None` blocks until a datagram arrives.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), SocketError> {
        self.socket.set_read_timeout(timeout)?;
        Ok(())
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SocketError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive one raw datagram.
    pub fn recv_datagram(&self) -> Result<Vec<u8>, SocketError> {
        let mut buf = vec![0u8; MAX_DATAGRAM_LEN];
        let len = self.socket.recv(&mut buf)?;
        buf.truncate(len);
        tracing::trace!(len, "datagram received");
        Ok(buf)
    }

    /// Receive and decode one datagram.
    pub fn recv_packet(&self) -> Result<Packet, SocketError> {
        let datagram = self.recv_datagram()?;
        Ok(decode(datagram)?)
    }
}
