//! Single-datagram decoding.
//!
//! `decode` turns one received datagram into a [`Packet`]: the CNIP
//! envelope, the LON header, and the boundary of the enclosed PDU. The packet
//! owns its bytes and is never mutated after construction; rendering happens
//! on demand through [`crate::render`].

use std::fmt;
use std::ops::Range;

use thiserror::Error;

use crate::protocols::cnip::{self, CnipError, Envelope, layout::ENVELOPE_LEN};
use crate::protocols::lon::{self, Header, LonError};
use crate::render::{self, RenderError};

/// Errors that abort decoding; no partial packet is produced.
///
/// Byte counts are absolute, measured from the start of the datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated envelope: need {needed} bytes, got {actual}")]
    TruncatedEnvelope { needed: usize, actual: usize },
    #[error("truncated LON header: need {needed} bytes, got {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
    #[error("unknown {field} value: {value}")]
    UnknownFormat { field: &'static str, value: u8 },
}

impl DecodeError {
    /// Stable identifier used in reports.
    pub fn id(&self) -> &'static str {
        match self {
            DecodeError::TruncatedEnvelope { .. } => "LS-CNIP-TRUNCATED",
            DecodeError::TruncatedHeader { .. } => "LS-LON-TRUNCATED",
            DecodeError::UnknownFormat { .. } => "LS-LON-UNKNOWN-FORMAT",
        }
    }

    /// Occurrence-independent description used in reports.
    pub fn summary(&self) -> &'static str {
        match self {
            DecodeError::TruncatedEnvelope { .. } => "Datagram shorter than the CNIP envelope",
            DecodeError::TruncatedHeader { .. } => "Datagram ends inside the LON header",
            DecodeError::UnknownFormat { .. } => "Unknown LON format selector",
        }
    }
}

impl From<CnipError> for DecodeError {
    fn from(value: CnipError) -> Self {
        match value {
            CnipError::TooShort { needed, actual } => {
                DecodeError::TruncatedEnvelope { needed, actual }
            }
        }
    }
}

impl From<LonError> for DecodeError {
    fn from(value: LonError) -> Self {
        match value {
            LonError::TooShort { needed, actual } => DecodeError::TruncatedHeader {
                needed: ENVELOPE_LEN + needed,
                actual: ENVELOPE_LEN + actual,
            },
            LonError::UnknownFormat { field, value } => {
                DecodeError::UnknownFormat { field, value }
            }
        }
    }
}

/// A decoded LonTalk/IP datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: Vec<u8>,
    envelope: Envelope,
    header: Header,
}

impl Packet {
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The datagram exactly as received.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Position of the enclosed PDU within [`Packet::bytes`].
    pub fn payload_range(&self) -> Range<usize> {
        ENVELOPE_LEN + self.header.payload_offset..self.bytes.len()
    }

    /// The enclosed PDU; may be empty.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[self.payload_range()]
    }
}

/// Decode one datagram.
///
/// Accepts anything convertible into an owned buffer: a `Vec<u8>` is moved
/// in, a slice is copied.
///
/// # Examples
/// ```
/// use lonshark_core::{decode, render_packet};
///
/// let mut datagram = vec![0u8; 20];
/// // flags, format (APDU, subnet broadcast, no domain), src 1/2, dst subnet 5
/// datagram.extend_from_slice(&[0x00, 0x30, 0x01, 0x02, 0x05]);
/// datagram.extend_from_slice(&[0x42, 0x10, 0x20]);
///
/// let packet = decode(datagram)?;
/// assert_eq!(render_packet(&packet)?, "0,1,2 -> 5,* APDU dt=66,size=2");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
/// `TruncatedEnvelope` when fewer than 20 bytes are given, `TruncatedHeader`
/// when the buffer ends inside the LON header.
pub fn decode(buffer: impl Into<Vec<u8>>) -> Result<Packet, DecodeError> {
    let bytes = buffer.into();
    let envelope = cnip::parse_envelope(&bytes)?;
    let header = lon::parse_header(&bytes[ENVELOPE_LEN..])?;
    Ok(Packet {
        bytes,
        envelope,
        header,
    })
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match render::render_packet(self) {
            Ok(text) => f.write_str(&text),
            Err(RenderError::EmptyPayload) => write!(
                f,
                "{} -> {} {} <empty payload>",
                render::render_source(self),
                render::render_destination(self),
                self.header.pdu_format.label()
            ),
        }
    }
}
