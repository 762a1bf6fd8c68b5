use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    is_pcapng_magic, legacy_ts_to_seconds, linktype_for_interface, pcapng_ts_to_seconds,
    read_magic_and_rewind,
};

/// Capture file replayed frame by frame.
pub struct PcapFileSource {
    inner: PcapReader,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    /// Open a `.pcap` or `.pcapng` file; the format is detected from its magic.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        let inner = create_reader(file).map_err(SourceError::from)?;
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        let event = match &mut self.inner {
            PcapReader::Legacy { reader, linktype } => next_legacy(reader, linktype),
            PcapReader::Ng { reader, linktypes } => next_ng(reader, linktypes),
        };
        event.map_err(SourceError::from)
    }
}

fn create_reader(mut file: File) -> Result<PcapReader, PcapSourceError> {
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        tracing::debug!("opening pcapng capture");
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcapng reader init", e))?;
        Ok(PcapReader::Ng {
            reader,
            linktypes: Vec::new(),
        })
    } else {
        tracing::debug!("opening legacy pcap capture");
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcap reader init", e))?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: None,
        })
    }
}

fn next_legacy(
    reader: &mut LegacyPcapReader<File>,
    linktype: &mut Option<Linktype>,
) -> Result<Option<PacketEvent>, PcapSourceError> {
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        *linktype = Some(header.network);
                        None
                    }
                    PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                        ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec)),
                        linktype: linktype.unwrap_or(Linktype::ETHERNET),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                };
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| PcapSourceError::pcap("pcap reader refill", e))?;
            }
            Err(e) => return Err(PcapSourceError::pcap("pcap reader next", e)),
        }
    }
}

fn next_ng(
    reader: &mut PcapNGReader<File>,
    linktypes: &mut Vec<Linktype>,
) -> Result<Option<PacketEvent>, PcapSourceError> {
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = match block {
                    PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                        linktypes.push(intf.linktype);
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
                        ts: Some(pcapng_ts_to_seconds(packet.ts_high, packet.ts_low)),
                        linktype: linktype_for_interface(linktypes, packet.if_id),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                };
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader
                    .refill()
                    .map_err(|e| PcapSourceError::pcap("pcapng reader refill", e))?;
            }
            Err(e) => return Err(PcapSourceError::pcap("pcapng reader next", e)),
        }
    }
}
