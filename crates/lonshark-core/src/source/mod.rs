//! Packet sources.
//!
//! Sources own all I/O. `pcap` replays link-layer frames from capture files
//! through [`PacketSource`]; `socket` receives LonTalk/IP datagrams live from
//! a device. Decoding itself never blocks and lives in [`crate::packet`].

pub mod pcap;
pub mod socket;

pub use pcap::PcapFileSource;
pub use socket::{LONTALK_PORT, LonSocket, MAX_DATAGRAM_LEN, SocketError};

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured link-layer frame.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Capture timestamp in seconds since the Unix epoch, when known.
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}
