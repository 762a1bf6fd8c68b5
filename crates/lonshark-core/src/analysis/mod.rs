use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::packet::decode;
use crate::protocols::lon::PduFormat;
use crate::source::{LONTALK_PORT, PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, Report, make_stub_report};

mod issues;
mod packets;
mod udp;

use issues::{IssueTracker, Severity};
use packets::{build_pdu_format_counts, summarize_packet};
use udp::parse_udp_packet;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Analysis settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// UDP port carrying LonTalk/IP; a datagram matches on either endpoint.
    pub port: u16,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { port: LONTALK_PORT }
    }
}

pub fn analyze_pcap_file(path: &Path, config: &AnalysisConfig) -> Result<Report, AnalysisError> {
    let source = PcapFileSource::open(path)?;
    analyze_source(path, source, config)
}

/// Decode every LonTalk/IP datagram delivered by `source`.
///
/// Frames that are not UDP on the configured port are counted and skipped.
/// Datagrams that fail to decode are recorded as issues; they never abort
/// the analysis.
pub fn analyze_source<S: PacketSource>(
    path: &Path,
    mut source: S,
    config: &AnalysisConfig,
) -> Result<Report, AnalysisError> {
    let mut frames_total = 0u64;
    let mut datagrams_total = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut packets = Vec::new();
    let mut pdu_counts: BTreeMap<PduFormat, u64> = BTreeMap::new();
    let mut issues = IssueTracker::default();

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        frames_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let udp = match parse_udp_packet(linktype, &data) {
            Ok(Some(udp)) if udp.uses_port(config.port) => udp,
            Ok(_) => continue,
            Err(err) => {
                tracing::debug!(frame = frames_total, %err, "skipping frame");
                continue;
            }
        };
        datagrams_total += 1;

        let ts_text = ts_to_rfc3339(ts);
        let context = format!(
            "frame {} source {} @ {}",
            frames_total,
            udp.src(),
            ts_text.as_deref().unwrap_or("unknown")
        );

        let packet = match decode(udp.payload) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::debug!(frame = frames_total, %err, "datagram not decoded");
                issues.record(
                    err.id(),
                    Severity::Error,
                    err.summary(),
                    format!("{context}: {err}"),
                );
                continue;
            }
        };

        *pdu_counts.entry(packet.header().pdu_format).or_default() += 1;
        let (summary, render_error) = summarize_packet(frames_total, ts_text, &udp, &packet);
        if let Some(err) = render_error {
            issues.record(
                err.id(),
                Severity::Warning,
                err.summary(),
                format!("{context}: {err}"),
            );
        }
        tracing::trace!(frame = frames_total, %packet, "decoded");
        packets.push(summary);
    }

    if issues.has_errors() {
        tracing::warn!(path = %path.display(), "some datagrams could not be decoded");
    }

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        frames_total,
        datagrams_total,
        decoded_total: packets.len() as u64,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.packets = packets;
    report.pdu_formats = build_pdu_format_counts(pdu_counts);
    report.issues = issues.into_issues();
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{ts_to_rfc3339, update_ts_bounds};

    #[test]
    fn ts_bounds_track_min_and_max() {
        let mut first = None;
        let mut last = None;
        for ts in [Some(2.0), None, Some(1.0), Some(3.0)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(1.0));
        assert_eq!(last, Some(3.0));
    }

    #[test]
    fn ts_formats_as_rfc3339() {
        assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(
            ts_to_rfc3339(Some(1.5)).as_deref(),
            Some("1970-01-01T00:00:01.5Z")
        );
        assert!(ts_to_rfc3339(None).is_none());
    }
}
