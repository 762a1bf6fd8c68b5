use super::error::LonError;
use super::layout;
use super::reader::LonReader;

/// Enclosed PDU format, selected by bits 4-5 of the format byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PduFormat {
    Tpdu,
    Spdu,
    AuthPdu,
    Apdu,
}

impl PduFormat {
    pub fn label(self) -> &'static str {
        match self {
            PduFormat::Tpdu => "TPDU",
            PduFormat::Spdu => "SPDU",
            PduFormat::AuthPdu => "AuthPDU",
            PduFormat::Apdu => "APDU",
        }
    }
}

impl TryFrom<u8> for PduFormat {
    type Error = LonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PduFormat::Tpdu),
            1 => Ok(PduFormat::Spdu),
            2 => Ok(PduFormat::AuthPdu),
            3 => Ok(PduFormat::Apdu),
            _ => Err(LonError::UnknownFormat {
                field: "pdu format",
                value,
            }),
        }
    }
}

/// Destination address layout, selected by bits 2-3 of the format byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    Subnet,
    Group,
    SubnetNode,
    NeuronId,
}

impl AddressFormat {
    pub fn label(self) -> &'static str {
        match self {
            AddressFormat::Subnet => "subnet",
            AddressFormat::Group => "group",
            AddressFormat::SubnetNode => "subnet-node",
            AddressFormat::NeuronId => "neuron-id",
        }
    }
}

impl TryFrom<u8> for AddressFormat {
    type Error = LonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AddressFormat::Subnet),
            1 => Ok(AddressFormat::Group),
            2 => Ok(AddressFormat::SubnetNode),
            3 => Ok(AddressFormat::NeuronId),
            _ => Err(LonError::UnknownFormat {
                field: "address format",
                value,
            }),
        }
    }
}

/// Domain field width, selected by bits 0-1 of the format byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainLength {
    Zero,
    One,
    Three,
    Six,
}

impl DomainLength {
    pub fn byte_len(self) -> usize {
        layout::DOMAIN_LENGTHS[self as usize]
    }
}

impl TryFrom<u8> for DomainLength {
    type Error = LonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DomainLength::Zero),
            1 => Ok(DomainLength::One),
            2 => Ok(DomainLength::Three),
            3 => Ok(DomainLength::Six),
            _ => Err(LonError::UnknownFormat {
                field: "domain length",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceAddress {
    pub subnet: u8,
    pub node: u8,
}

/// Decoded destination address, one variant per wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Broadcast to a subnet.
    Subnet { subnet: u8 },
    Group { group: u8 },
    /// Subnet/node addressing, source node mode bit set.
    SubnetNode { subnet: u8, node: u8 },
    /// Subnet/node addressing carrying the group and member of the sender,
    /// source node mode bit clear.
    SubnetNodeGroup {
        subnet: u8,
        node: u8,
        group: u8,
        member: u8,
    },
    /// Neuron ID addressing; no node number is carried on the wire.
    NeuronId { subnet: u8, neuron_id: u64 },
}

impl Destination {
    pub fn format(&self) -> AddressFormat {
        match self {
            Destination::Subnet { .. } => AddressFormat::Subnet,
            Destination::Group { .. } => AddressFormat::Group,
            Destination::SubnetNode { .. } | Destination::SubnetNodeGroup { .. } => {
                AddressFormat::SubnetNode
            }
            Destination::NeuronId { .. } => AddressFormat::NeuronId,
        }
    }
}

/// Decoded LON protocol header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub priority: bool,
    pub alternate_path: bool,
    pub delta_backlog: u8,
    pub version: u8,
    pub pdu_format: PduFormat,
    pub domain_length: DomainLength,
    pub source: SourceAddress,
    pub destination: Destination,
    pub domain: u64,
    /// Offset of the enclosed PDU, relative to the first header byte.
    pub payload_offset: usize,
}

impl Header {
    pub fn address_format(&self) -> AddressFormat {
        self.destination.format()
    }
}

/// Decode the LON header from the bytes following the envelope.
///
/// The enclosed PDU is everything from `payload_offset` to the end of
/// `payload` and may be empty.
///
/// # Errors
/// Returns `LonError::TooShort` when the buffer ends before a field implied
/// by the format byte.
pub fn parse_header(payload: &[u8]) -> Result<Header, LonError> {
    let reader = LonReader::new(payload);
    reader.require_len(layout::MIN_LEN)?;

    let flags = reader.read_u8(layout::FLAGS_OFFSET)?;
    let format = reader.read_u8(layout::FORMAT_OFFSET)?;
    let selector = |shift: u8| (format >> shift) & layout::SELECTOR_MASK;

    let pdu_format = PduFormat::try_from(selector(layout::PDU_FORMAT_SHIFT))?;
    let address_format = AddressFormat::try_from(selector(layout::ADDRESS_FORMAT_SHIFT))?;
    let domain_length = DomainLength::try_from(selector(layout::DOMAIN_LENGTH_SHIFT))?;

    let src_node_byte = reader.read_u8(layout::SRC_NODE_OFFSET)?;
    let source = SourceAddress {
        subnet: reader.read_u8(layout::SRC_SUBNET_OFFSET)?,
        node: src_node_byte & layout::NODE_MASK,
    };

    let (destination, domain_offset) =
        parse_destination(&reader, address_format, src_node_byte)?;

    let domain_end = domain_offset + domain_length.byte_len();
    reader.require_len(domain_end)?;
    let domain = reader.read_uint_be(domain_offset..domain_end)?;

    Ok(Header {
        priority: flags & layout::PRIORITY_MASK != 0,
        alternate_path: flags & layout::ALT_PATH_MASK != 0,
        delta_backlog: flags & layout::DELTA_BACKLOG_MASK,
        version: format >> layout::VERSION_SHIFT,
        pdu_format,
        domain_length,
        source,
        destination,
        domain,
        payload_offset: domain_end,
    })
}

/// Decode the destination and return it with the offset where the domain starts.
fn parse_destination(
    reader: &LonReader<'_>,
    format: AddressFormat,
    src_node_byte: u8,
) -> Result<(Destination, usize), LonError> {
    match format {
        AddressFormat::Subnet => Ok((
            Destination::Subnet {
                subnet: reader.read_u8(layout::DST_OFFSET)?,
            },
            layout::DOMAIN_OFFSET_SUBNET,
        )),
        AddressFormat::Group => Ok((
            Destination::Group {
                group: reader.read_u8(layout::DST_OFFSET)?,
            },
            layout::DOMAIN_OFFSET_GROUP,
        )),
        AddressFormat::SubnetNode => {
            let subnet = reader.read_u8(layout::DST_OFFSET)?;
            let node = reader.read_node(layout::DST_NODE_OFFSET)?;
            if src_node_byte & layout::SUBNET_NODE_MODE_MASK != 0 {
                return Ok((
                    Destination::SubnetNode { subnet, node },
                    layout::DOMAIN_OFFSET_SUBNET_NODE,
                ));
            }
            Ok((
                Destination::SubnetNodeGroup {
                    subnet,
                    node,
                    group: reader.read_u8(layout::GROUP_OFFSET)?,
                    member: reader.read_u8(layout::GROUP_MEMBER_OFFSET)?,
                },
                layout::DOMAIN_OFFSET_SUBNET_NODE_GROUP,
            ))
        }
        AddressFormat::NeuronId => Ok((
            Destination::NeuronId {
                subnet: reader.read_u8(layout::DST_OFFSET)?,
                neuron_id: reader.read_uint_be(layout::NEURON_ID_RANGE)?,
            },
            layout::DOMAIN_OFFSET_NEURON_ID,
        )),
    }
}
