mod common;

use std::fs;

use lonshark_core::{PacketSource, PcapFileSource, SourceError};
use tempfile::TempDir;

use common::{mixed_capture, write_pcapng};

#[test]
fn pcap_source_reads_every_frame_with_timestamps() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("input.pcapng");
    let frames = mixed_capture();
    write_pcapng(&path, &frames);

    let mut source = PcapFileSource::open(&path).unwrap();
    let mut seen = Vec::new();
    while let Some(event) = source.next_packet().unwrap() {
        seen.push(event);
    }

    assert_eq!(seen.len(), frames.len());
    assert_eq!(seen[0].data, frames[0].1);
    let ts = seen[0].ts.expect("timestamp");
    assert!((ts - 1.0).abs() < 1e-9);
}

#[test]
fn pcap_source_rejects_truncated_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("truncated.pcapng");
    fs::write(&path, [0x0a, 0x0d, 0x0d]).unwrap();

    let err = match PcapFileSource::open(&path) {
        Ok(_) => panic!("expected truncated file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}
