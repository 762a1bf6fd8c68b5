//! PCAP/PCAPNG capture replay.
//!
//! Provides a `PacketSource` backed by a capture file, emitting raw
//! link-layer frames and their timestamps. LonTalk/IP datagrams are picked
//! out of those frames by the analysis layer.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
