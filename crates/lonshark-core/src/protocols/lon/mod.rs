//! LonTalk protocol header decoding.
//!
//! The header that follows the CNIP envelope is bit-packed and variable in
//! length: a flags byte, a format byte selecting the PDU format, address
//! format and domain length, then a source address, a destination address
//! whose layout depends on the address format (and, for subnet/node
//! addressing, on bit 7 of the source node byte), and a 0/1/3/6-byte domain.
//! Everything after the domain is the enclosed PDU.
//!
//! The format selectors are decoded into enums so downstream matches are
//! exhaustive. Every indexed read goes through `reader` and is bounds checked
//! before it happens; no combination of flags reads past the buffer.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::LonError;
pub use parser::{
    AddressFormat, Destination, DomainLength, Header, PduFormat, SourceAddress, parse_header,
};
