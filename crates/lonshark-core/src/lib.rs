//! LonShark core library: LonTalk/IP (CNIP) datagram decoding.
//!
//! A datagram is a fixed 20-byte CNIP envelope followed by a bit-packed,
//! variable-length LON header and the enclosed PDU. [`decode`] parses one
//! datagram into an owned [`Packet`]; the `render_*` functions turn a packet
//! into diagnostic text on demand. Decoding and rendering are pure and
//! stateless, so packets can be decoded concurrently from independent
//! buffers.
//!
//! Around that core, `source` provides capture replay (pcap/pcapng) and a
//! live UDP socket, and the analysis layer turns a capture into a
//! deterministic JSON [`Report`].
//!
//! Layering follows the protocol modules: `layout` holds offsets and masks,
//! `reader` performs bounds-checked reads, `parser` builds domain types and
//! `error` lists what can go wrong. No read ever goes past the buffer.
//!
//! # Examples
//! ```
//! use lonshark_core::{decode, render_destination, render_source};
//!
//! let mut datagram = vec![0u8; 20];
//! // TPDU, group addressing, 1-byte domain 0x2a
//! datagram.extend_from_slice(&[0x00, 0x05, 0x01, 0x02, 0x09, 0x2a, 0x20]);
//!
//! let packet = decode(datagram)?;
//! assert_eq!(render_source(&packet), "42,1,2");
//! assert_eq!(render_destination(&packet), "g=9");
//! assert_eq!(packet.to_string(), "42,1,2 -> g=9 TPDU ACK(2)");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod packet;
pub mod protocols;
pub mod render;
pub mod source;

pub use analysis::{AnalysisConfig, AnalysisError, analyze_pcap_file, analyze_source};
pub use packet::{DecodeError, Packet, decode};
pub use protocols::cnip::Envelope;
pub use render::{
    RenderError, render_destination, render_packet, render_payload_summary, render_pdu,
    render_source,
};
pub use source::{
    LONTALK_PORT, LonSocket, PacketEvent, PacketSource, PcapFileSource, SocketError, SourceError,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded capture with deterministic ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp of the last captured frame, or the epoch.
    pub generated_at: String,
    pub input: InputInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Successfully decoded packets in capture order.
    pub packets: Vec<PacketSummary>,
    /// Packet counts per PDU format, in format code order.
    pub pdu_formats: Vec<PduFormatCount>,
    /// Decode and render problems, errors first, then by id.
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Link-layer frames read from the capture.
    pub frames_total: u64,
    /// UDP datagrams on the LonTalk/IP port.
    pub datagrams_total: u64,
    /// Datagrams that decoded into a packet.
    pub decoded_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// One decoded datagram.
///
/// # Examples
/// ```
/// use lonshark_core::PacketSummary;
///
/// let json = r#"{"frame":1,"src":"10.0.0.1:1628","dst":"10.0.0.2:1628",
///     "envelope":{"length":28,"version":1,"message_type":0,"ext_header":0,"flags":0,
///     "vendor":0,"session_id":0,"sequence":0,"timestamp":0},
///     "priority":false,"alternate_path":false,"delta_backlog":0,"version":0,
///     "pdu_format":"APDU","address_format":"subnet","source":"0,1,2","destination":"5,*",
///     "domain":0,"payload_len":0,"render_error":"enclosed PDU is empty"}"#;
/// let summary: PacketSummary = serde_json::from_str(json)?;
/// assert!(summary.pdu.is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketSummary {
    /// 1-based frame index within the capture.
    pub frame: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// UDP source endpoint in `ip:port` form.
    pub src: String,
    /// UDP destination endpoint in `ip:port` form.
    pub dst: String,
    pub envelope: Envelope,
    pub priority: bool,
    pub alternate_path: bool,
    pub delta_backlog: u8,
    pub version: u8,
    pub pdu_format: String,
    pub address_format: String,
    /// Rendered LON source (`domain,subnet,node`).
    pub source: String,
    /// Rendered LON destination.
    pub destination: String,
    pub domain: u64,
    pub payload_len: usize,
    /// Rendered PDU, absent when rendering failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PduFormatCount {
    pub pdu_format: String,
    pub count: u64,
}

/// Aggregated decode or render problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Stable identifier (e.g., `LS-LON-TRUNCATED`).
    pub id: String,
    /// `error` (datagram not decoded) or `warning` (decoded, not fully rendered).
    pub severity: String,
    pub message: String,
    pub count: u64,
    /// At most three example contexts, formatted as `frame N source ip:port @ ts: detail`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use lonshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, lonshark_core::REPORT_VERSION);
/// assert!(report.packets.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "lonshark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        packets: vec![],
        pdu_formats: vec![],
        issues: vec![],
    }
}
