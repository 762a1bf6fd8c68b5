//! Human-readable rendering of decoded packets.
//!
//! Rendering is pure: the same packet always yields the same text. Source and
//! destination never fail. PDU rendering reports `RenderError::EmptyPayload`
//! when a byte it needs is missing; the packet stays usable.
//! Unassigned message type codes are not errors and render as `???(<code>)`.

use thiserror::Error;

use crate::packet::Packet;
use crate::protocols::lon::{Destination, PduFormat};

/// TPDU/SPDU message type bits of the first PDU byte.
const TRANSPORT_CODE_MASK: u8 = 0x70;
/// AuthPDU message type bits of the first PDU byte.
const AUTH_CODE_MASK: u8 = 0x30;
const CODE_SHIFT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("enclosed PDU is empty")]
    EmptyPayload,
}

impl RenderError {
    /// Stable identifier used in reports.
    pub fn id(&self) -> &'static str {
        match self {
            RenderError::EmptyPayload => "LS-LON-EMPTY-PAYLOAD",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            RenderError::EmptyPayload => "Enclosed PDU too short to render",
        }
    }
}

/// `<domain>,<src-subnet>,<src-node>` in decimal.
pub fn render_source(packet: &Packet) -> String {
    let header = packet.header();
    format!(
        "{},{},{}",
        header.domain, header.source.subnet, header.source.node
    )
}

pub fn render_destination(packet: &Packet) -> String {
    match packet.header().destination {
        Destination::Subnet { subnet } => format!("{subnet},*"),
        Destination::Group { group } => format!("g={group}"),
        Destination::SubnetNode { subnet, node } => format!("{subnet},{node}"),
        Destination::SubnetNodeGroup {
            subnet,
            node,
            group,
            member,
        } => format!("{subnet},{node},g={group},m={member}"),
        // Neuron ID addressing carries no node number.
        Destination::NeuronId { subnet, neuron_id } => {
            format!("{subnet},0,n={neuron_id:012x}")
        }
    }
}

/// `dt=<first byte>,size=<remaining byte count>`.
pub fn render_payload_summary(bytes: &[u8]) -> Result<String, RenderError> {
    let (first, rest) = bytes.split_first().ok_or(RenderError::EmptyPayload)?;
    Ok(format!("dt={},size={}", first, rest.len()))
}

/// `<pdu-format> <message type>(<code>)[ <summary>]`, e.g. `TPDU ACKD(0) dt=1,size=2`.
pub fn render_pdu(packet: &Packet) -> Result<String, RenderError> {
    let format = packet.header().pdu_format;
    let payload = packet.payload();
    let body = match format {
        PduFormat::Apdu => render_payload_summary(payload)?,
        PduFormat::Tpdu => {
            let (code, rest) = split_message(payload, TRANSPORT_CODE_MASK)?;
            render_message(code, transport_kind(code), rest)?
        }
        PduFormat::Spdu => {
            let (code, rest) = split_message(payload, TRANSPORT_CODE_MASK)?;
            render_message(code, session_kind(code), rest)?
        }
        PduFormat::AuthPdu => {
            let (code, rest) = split_message(payload, AUTH_CODE_MASK)?;
            render_message(code, auth_kind(code), rest)?
        }
    };
    Ok(format!("{} {}", format.label(), body))
}

/// `<source> -> <destination> <pdu>`.
pub fn render_packet(packet: &Packet) -> Result<String, RenderError> {
    Ok(format!(
        "{} -> {} {}",
        render_source(packet),
        render_destination(packet),
        render_pdu(packet)?
    ))
}

enum MessageKind {
    Bare(&'static str),
    WithSummary(&'static str),
}

/// Message type code from the first PDU byte, and the bytes after it.
fn split_message(payload: &[u8], mask: u8) -> Result<(u8, &[u8]), RenderError> {
    let (first, rest) = payload.split_first().ok_or(RenderError::EmptyPayload)?;
    Ok(((first & mask) >> CODE_SHIFT, rest))
}

fn render_message(
    code: u8,
    kind: Option<MessageKind>,
    rest: &[u8],
) -> Result<String, RenderError> {
    match kind {
        Some(MessageKind::Bare(label)) => Ok(format!("{label}({code})")),
        Some(MessageKind::WithSummary(label)) => {
            Ok(format!("{label}({code}) {}", render_payload_summary(rest)?))
        }
        None => Ok(format!("???({code})")),
    }
}

fn transport_kind(code: u8) -> Option<MessageKind> {
    match code {
        0 => Some(MessageKind::WithSummary("ACKD")),
        1 => Some(MessageKind::WithSummary("UnACKD_TPR")),
        2 => Some(MessageKind::Bare("ACK")),
        4 => Some(MessageKind::Bare("REMINDER")),
        5 => Some(MessageKind::Bare("REM/MSG")),
        _ => None,
    }
}

fn session_kind(code: u8) -> Option<MessageKind> {
    match code {
        0 => Some(MessageKind::WithSummary("REQUEST")),
        2 => Some(MessageKind::WithSummary("RESPONSE")),
        4 => Some(MessageKind::Bare("REMINDER")),
        5 => Some(MessageKind::Bare("REM/MSG")),
        _ => None,
    }
}

fn auth_kind(code: u8) -> Option<MessageKind> {
    match code {
        0 => Some(MessageKind::Bare("CHALLENGE")),
        2 => Some(MessageKind::Bare("REPLY")),
        _ => None,
    }
}
