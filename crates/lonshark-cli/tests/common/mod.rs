#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const LONTALK_PORT: u16 = 1628;

/// TPDU from 42,1,2 to group 9 carrying ACK.
pub const GROUP_ACK_HEX: &str = "000000000000000000000000000000000000000000050102092a20";

/// 20-byte CNIP envelope followed by `lon`.
pub fn cnip_datagram(lon: &[u8]) -> Vec<u8> {
    let mut datagram = vec![0u8; 20];
    datagram[0..2].copy_from_slice(&((20 + lon.len()) as u16).to_be_bytes());
    datagram[2] = 0x01;
    datagram.extend_from_slice(lon);
    datagram
}

/// Ethernet/IPv4/UDP frame; the IPv4 checksum is left at zero.
pub fn udp_frame(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    frame.extend_from_slice(&[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]);
    frame.extend_from_slice(&0x0800u16.to_be_bytes());

    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&(28 + payload.len() as u16).to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = 17;
    ip_header[12..16].copy_from_slice(&[192, 168, 1, 133]);
    ip_header[16..20].copy_from_slice(&[192, 168, 1, 10]);
    frame.extend_from_slice(&ip_header);

    frame.extend_from_slice(&src_port.to_be_bytes());
    frame.extend_from_slice(&dst_port.to_be_bytes());
    frame.extend_from_slice(&(8 + payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(&0u16.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Legacy little-endian pcap, Ethernet link type, microsecond timestamps.
pub fn write_pcap(path: &Path, frames: &[(u32, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&1u32.to_le_bytes());
    for (ts_sec, data) in frames {
        output.extend_from_slice(&ts_sec.to_le_bytes());
        output.extend_from_slice(&0u32.to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(data);
    }
    fs::write(path, output).expect("write pcap");
}

/// Two decodable datagrams and one with a truncated header.
pub fn sample_frames() -> Vec<(u32, Vec<u8>)> {
    let lon = |bytes: &[u8]| udp_frame(LONTALK_PORT, LONTALK_PORT, &cnip_datagram(bytes));
    vec![
        (1, lon(&[0x00, 0x05, 0x01, 0x02, 0x09, 0x2a, 0x20])),
        (2, lon(&[0x00, 0x30, 0x01, 0x02, 0x05, 0x10, 0xaa])),
        (3, lon(&[0x00, 0x03, 0x01])),
    ]
}

pub fn sample_capture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("capture.pcap");
    write_pcap(&path, &sample_frames());
    path
}
