use std::net::{IpAddr, SocketAddr};

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use super::error::UdpError;
use super::reader::UdpReader;

/// Parsed UDP datagram with source/destination endpoints.
pub struct UdpPacket<'a> {
    pub src_ip: IpAddr,
    pub src_port: u16,
    pub dst_ip: IpAddr,
    pub dst_port: u16,
    pub payload: &'a [u8],
}

impl UdpPacket<'_> {
    /// True when either endpoint uses `port`.
    pub fn uses_port(&self, port: u16) -> bool {
        self.src_port == port || self.dst_port == port
    }

    pub fn src(&self) -> SocketAddr {
        SocketAddr::new(self.src_ip, self.src_port)
    }

    pub fn dst(&self) -> SocketAddr {
        SocketAddr::new(self.dst_ip, self.dst_port)
    }
}

/// Parse a UDP datagram from a link-layer frame.
///
/// Returns `Ok(None)` when the frame does not carry UDP.
pub fn parse_udp_packet(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<UdpPacket<'_>>, UdpError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            SlicedPacket::from_ethernet(data).map_err(|e| UdpError::Slice(e.to_string()))?
        }
        Linktype::RAW => SlicedPacket::from_ip(data).map_err(|e| UdpError::Slice(e.to_string()))?,
        _ => return Ok(None),
    };

    let net = sliced.net.ok_or(UdpError::MissingNetworkLayer)?;
    let udp = match sliced.transport {
        Some(TransportSlice::Udp(udp)) => udp,
        _ => return Ok(None),
    };

    let (src_ip, dst_ip) = match net {
        NetSlice::Ipv4(ref ipv4) => (
            IpAddr::V4(ipv4.header().source_addr()),
            IpAddr::V4(ipv4.header().destination_addr()),
        ),
        NetSlice::Ipv6(ref ipv6) => (
            IpAddr::V6(ipv6.header().source_addr()),
            IpAddr::V6(ipv6.header().destination_addr()),
        ),
    };

    let ip_payload = net.ip_payload_ref().ok_or(UdpError::MissingIpPayload)?;
    let reader = UdpReader::new(ip_payload.payload);
    let payload = reader.payload_without_header()?;

    Ok(Some(UdpPacket {
        src_ip,
        src_port: udp.source_port(),
        dst_ip,
        dst_port: udp.destination_port(),
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::parse_udp_packet;
    use crate::analysis::udp::error::UdpError;
    use crate::source::LONTALK_PORT;
    use etherparse::PacketBuilder;
    use pcap_parser::Linktype;

    #[test]
    fn parse_lontalk_datagram() {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([192, 168, 1, 133], [192, 168, 1, 10], 64)
            .udp(LONTALK_PORT, LONTALK_PORT);
        let payload = [0u8; 24];
        let mut packet = Vec::<u8>::with_capacity(builder.size(payload.len()));
        builder.write(&mut packet, &payload).unwrap();

        let parsed = parse_udp_packet(Linktype::ETHERNET, &packet).unwrap().unwrap();
        assert!(parsed.uses_port(LONTALK_PORT));
        assert!(!parsed.uses_port(6454));
        assert_eq!(parsed.src().to_string(), "192.168.1.133:1628");
        assert_eq!(parsed.payload, payload);
    }

    #[test]
    fn parse_raw_ip_frame() {
        let builder = PacketBuilder::ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64).udp(40000, LONTALK_PORT);
        let payload = [1, 2, 3];
        let mut packet = Vec::<u8>::with_capacity(builder.size(payload.len()));
        builder.write(&mut packet, &payload).unwrap();

        let parsed = parse_udp_packet(Linktype::RAW, &packet).unwrap().unwrap();
        assert_eq!(parsed.dst_port, LONTALK_PORT);
        assert!(parsed.uses_port(LONTALK_PORT));
    }

    #[test]
    fn parse_non_udp() {
        let builder = PacketBuilder::ethernet2([1, 1, 1, 1, 1, 1], [2, 2, 2, 2, 2, 2])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .tcp(1628, 1628, 0, 0);
        let payload = [0u8; 4];
        let mut packet = Vec::<u8>::with_capacity(builder.size(payload.len()));
        builder.write(&mut packet, &payload).unwrap();

        assert!(parse_udp_packet(Linktype::ETHERNET, &packet).unwrap().is_none());
    }

    #[test]
    fn parse_slice_error() {
        let result = parse_udp_packet(Linktype::ETHERNET, &[]);
        assert!(matches!(result, Err(UdpError::Slice(_))));
    }
}
