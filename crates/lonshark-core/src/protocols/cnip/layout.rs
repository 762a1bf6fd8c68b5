pub const LENGTH_RANGE: std::ops::Range<usize> = 0..2;
pub const VERSION_OFFSET: usize = 2;
pub const MESSAGE_TYPE_OFFSET: usize = 3;
pub const EXT_HEADER_OFFSET: usize = 4;
pub const FLAGS_OFFSET: usize = 5;
pub const VENDOR_RANGE: std::ops::Range<usize> = 6..8;
pub const SESSION_ID_RANGE: std::ops::Range<usize> = 8..12;
pub const SEQUENCE_RANGE: std::ops::Range<usize> = 12..16;
pub const TIMESTAMP_RANGE: std::ops::Range<usize> = 16..20;

/// Fixed envelope size; the LON header starts right after it.
pub const ENVELOPE_LEN: usize = 20;
