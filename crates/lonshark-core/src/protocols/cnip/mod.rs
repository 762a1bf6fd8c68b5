//! CNIP envelope decoding.
//!
//! Every LonTalk/IP datagram starts with a fixed 20-byte big-endian envelope
//! (length, version, message type, extended header flag, flags, vendor,
//! session id, sequence, timestamp). The parser reads the nine fields at
//! fixed offsets and does not validate them: the declared length is kept as
//! sent and is not compared with the received size.
//!
//! Offsets live in `layout`, bounds-checked reads in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::CnipError;
pub use parser::{Envelope, parse_envelope};
