use serde::{Deserialize, Serialize};

use super::error::CnipError;
use super::layout;
use super::reader::CnipReader;

/// Fixed 20-byte transport envelope preceding the LON header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Envelope + payload length as declared by the sender (not verified).
    pub length: u16,
    pub version: u8,
    pub message_type: u8,
    /// Extended header flag; the extended header itself is not decoded.
    pub ext_header: u8,
    pub flags: u8,
    pub vendor: u16,
    pub session_id: u32,
    pub sequence: u32,
    pub timestamp: u32,
}

pub fn parse_envelope(payload: &[u8]) -> Result<Envelope, CnipError> {
    let reader = CnipReader::new(payload);
    reader.require_len(layout::ENVELOPE_LEN)?;

    Ok(Envelope {
        length: reader.read_u16_be(layout::LENGTH_RANGE)?,
        version: reader.read_u8(layout::VERSION_OFFSET)?,
        message_type: reader.read_u8(layout::MESSAGE_TYPE_OFFSET)?,
        ext_header: reader.read_u8(layout::EXT_HEADER_OFFSET)?,
        flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        vendor: reader.read_u16_be(layout::VENDOR_RANGE)?,
        session_id: reader.read_u32_be(layout::SESSION_ID_RANGE)?,
        sequence: reader.read_u32_be(layout::SEQUENCE_RANGE)?,
        timestamp: reader.read_u32_be(layout::TIMESTAMP_RANGE)?,
    })
}
