use std::collections::BTreeMap;

use crate::packet::Packet;
use crate::protocols::lon::PduFormat;
use crate::render::{RenderError, render_destination, render_pdu, render_source};
use crate::{PacketSummary, PduFormatCount};

use super::udp::UdpPacket;

pub(crate) fn summarize_packet(
    frame: u64,
    ts: Option<String>,
    udp: &UdpPacket<'_>,
    packet: &Packet,
) -> (PacketSummary, Option<RenderError>) {
    let header = packet.header();
    let (pdu, render_error) = match render_pdu(packet) {
        Ok(text) => (Some(text), None),
        Err(err) => (None, Some(err)),
    };
    let summary = PacketSummary {
        frame,
        ts,
        src: udp.src().to_string(),
        dst: udp.dst().to_string(),
        envelope: *packet.envelope(),
        priority: header.priority,
        alternate_path: header.alternate_path,
        delta_backlog: header.delta_backlog,
        version: header.version,
        pdu_format: header.pdu_format.label().to_string(),
        address_format: header.address_format().label().to_string(),
        source: render_source(packet),
        destination: render_destination(packet),
        domain: header.domain,
        payload_len: packet.payload().len(),
        pdu,
        render_error: render_error.map(|err| err.to_string()),
    };
    (summary, render_error)
}

pub(crate) fn build_pdu_format_counts(counts: BTreeMap<PduFormat, u64>) -> Vec<PduFormatCount> {
    counts
        .into_iter()
        .map(|(format, count)| PduFormatCount {
            pdu_format: format.label().to_string(),
            count,
        })
        .collect()
}
