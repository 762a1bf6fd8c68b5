// Offsets are relative to the first header byte (envelope excluded).

pub const FLAGS_OFFSET: usize = 0;
pub const PRIORITY_MASK: u8 = 0x80;
pub const ALT_PATH_MASK: u8 = 0x40;
pub const DELTA_BACKLOG_MASK: u8 = 0x3f;

pub const FORMAT_OFFSET: usize = 1;
pub const VERSION_SHIFT: u8 = 6;
pub const PDU_FORMAT_SHIFT: u8 = 4;
pub const ADDRESS_FORMAT_SHIFT: u8 = 2;
pub const DOMAIN_LENGTH_SHIFT: u8 = 0;
pub const SELECTOR_MASK: u8 = 0x03;

pub const SRC_SUBNET_OFFSET: usize = 2;
pub const SRC_NODE_OFFSET: usize = 3;
pub const NODE_MASK: u8 = 0x7f;
/// Bit 7 of the source node byte; selects the subnet/node layout without group.
pub const SUBNET_NODE_MODE_MASK: u8 = 0x80;

/// Destination subnet, or destination group for group addressing.
pub const DST_OFFSET: usize = 4;
pub const DST_NODE_OFFSET: usize = 5;
pub const GROUP_OFFSET: usize = 6;
pub const GROUP_MEMBER_OFFSET: usize = 7;
pub const NEURON_ID_RANGE: std::ops::Range<usize> = 5..11;

pub const DOMAIN_OFFSET_SUBNET: usize = 5;
pub const DOMAIN_OFFSET_GROUP: usize = 5;
pub const DOMAIN_OFFSET_SUBNET_NODE: usize = 6;
pub const DOMAIN_OFFSET_SUBNET_NODE_GROUP: usize = 8;
pub const DOMAIN_OFFSET_NEURON_ID: usize = NEURON_ID_RANGE.end;

/// Domain field widths in bytes, indexed by the 2-bit domain length code.
pub const DOMAIN_LENGTHS: [usize; 4] = [0, 1, 3, 6];

/// Every address format reads at least up to the first destination byte.
pub const MIN_LEN: usize = DST_OFFSET + 1;
