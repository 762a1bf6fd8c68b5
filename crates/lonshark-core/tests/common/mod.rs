#![allow(dead_code)]

use std::fs;
use std::path::Path;

const ETHERTYPE_IPV4: u16 = 0x0800;
const UDP_PROTO: u8 = 17;
pub const LONTALK_PORT: u16 = 1628;
pub const ENVELOPE_LEN: usize = 20;

/// CNIP envelope with a declared length matching the datagram, followed by `lon`.
pub fn cnip_datagram(sequence: u32, lon: &[u8]) -> Vec<u8> {
    let mut datagram = vec![0u8; ENVELOPE_LEN];
    let total = (ENVELOPE_LEN + lon.len()) as u16;
    datagram[0..2].copy_from_slice(&total.to_be_bytes());
    datagram[2] = 0x01;
    datagram[8..12].copy_from_slice(&0x0000_0042u32.to_be_bytes());
    datagram[12..16].copy_from_slice(&sequence.to_be_bytes());
    datagram.extend_from_slice(lon);
    datagram
}

pub fn format_byte(pdu: u8, addr: u8, domain: u8) -> u8 {
    (pdu << 4) | (addr << 2) | domain
}

pub fn build_ipv4_udp_frame(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    frame.extend_from_slice(&[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]);
    frame.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

    let total_len = 20u16 + 8u16 + (payload.len() as u16);
    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&total_len.to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = UDP_PROTO;
    ip_header[12..16].copy_from_slice(&src_ip);
    ip_header[16..20].copy_from_slice(&dst_ip);
    let checksum = ipv4_checksum(&ip_header);
    ip_header[10..12].copy_from_slice(&checksum.to_be_bytes());
    frame.extend_from_slice(&ip_header);

    let udp_len = 8u16 + (payload.len() as u16);
    frame.extend_from_slice(&src_port.to_be_bytes());
    frame.extend_from_slice(&dst_port.to_be_bytes());
    frame.extend_from_slice(&udp_len.to_be_bytes());
    frame.extend_from_slice(&0u16.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

fn ipv4_checksum(header: &[u8; 20]) -> u16 {
    let mut sum = 0u32;
    for chunk in header.chunks(2) {
        sum = sum.wrapping_add(u16::from_be_bytes([chunk[0], chunk[1]]) as u32);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

/// Write Ethernet frames as a single-interface PCAPNG with microsecond timestamps.
pub fn write_pcapng(path: &Path, frames: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body()));
    for (ts_us, data) in frames {
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(*ts_us, data)));
    }
    fs::write(path, output).expect("write pcapng");
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    body
}

fn enhanced_packet_body(ts_us: u64, data: &[u8]) -> Vec<u8> {
    let ts_high = (ts_us >> 32) as u32;
    let ts_low = (ts_us & 0xFFFF_FFFF) as u32;
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}

/// A small mixed capture: one datagram per PDU format, a truncated header,
/// an empty TPDU, and an unrelated UDP flow.
pub fn mixed_capture() -> Vec<(u64, Vec<u8>)> {
    let device = [192, 168, 1, 133];
    let host = [192, 168, 1, 10];
    let lon_frame = |ts_us: u64, seq: u32, lon: &[u8]| {
        (
            ts_us,
            build_ipv4_udp_frame(
                device,
                host,
                LONTALK_PORT,
                LONTALK_PORT,
                &cnip_datagram(seq, lon),
            ),
        )
    };

    vec![
        // TPDU ACKD, subnet broadcast, 1-byte domain 7
        lon_frame(1_000_000, 1, &[0x00, format_byte(0, 0, 1), 0x01, 0x02, 0x05, 0x07, 0x00, 0xaa, 0xbb]),
        // SPDU RESPONSE, group 9
        lon_frame(1_100_000, 2, &[0x00, format_byte(1, 1, 0), 0x01, 0x02, 0x09, 0x20, 0x11]),
        // AuthPDU REPLY, subnet/node with group
        lon_frame(1_200_000, 3, &[0x00, format_byte(2, 2, 0), 0x01, 0x02, 0x03, 0x0c, 0x07, 0x02, 0x20]),
        // APDU, neuron id
        lon_frame(
            1_300_000,
            4,
            &[0x00, format_byte(3, 3, 0), 0x01, 0x02, 0x04, 0x01, 0x02, 0x03, 0x04, 0x05, 0xab, 0x42, 0x01],
        ),
        // truncated: 6-byte domain missing
        lon_frame(1_400_000, 5, &[0x00, format_byte(3, 0, 3), 0x01, 0x02, 0x05, 0x01]),
        // TPDU without PDU bytes
        lon_frame(1_500_000, 6, &[0x00, format_byte(0, 0, 0), 0x01, 0x02, 0x05]),
        // unrelated UDP
        (
            1_600_000,
            build_ipv4_udp_frame(device, host, 6454, 6454, &[0u8; 24]),
        ),
    ]
}
