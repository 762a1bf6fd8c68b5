pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
pub const PCAP_READER_BUFFER_SIZE: usize = 64 * 1024;
/// PCAPNG timestamps default to microsecond resolution.
pub const PCAPNG_TS_UNITS_PER_SECOND: f64 = 1e6;
pub const LEGACY_USEC_PER_SECOND: f64 = 1e6;
