//! Ethernet link-layer parsing (C2): MAC extraction and the symmetric
//! link hash.

use crate::hash::{self, FNV_BASIS};
use crate::layers::{LayerTag, layers_info};
use crate::packet::PacketView;

const ETH_SRC_OFFSET: usize = 6;
const ETH_DST_OFFSET: usize = 0;
pub const ETH_HLEN: usize = 14;
pub const ETH_PROTO_OFFSET: usize = 12;

/// Populated link-layer fields of a flow record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkLayer {
    pub mac_src: [u8; 6],
    pub mac_dst: [u8; 6],
    /// Accumulated VLAN id, each stacked tag shifted in 12 bits at a time.
    pub vlan_id: u32,
    /// Symmetric hash: identical for a packet and its reply.
    pub hash: u64,
    /// Direction-sensitive hash of the source MAC only, used by the
    /// table engine's `is_ab_packet` direction test.
    pub hash_src: u64,
}

/// Parses the Ethernet header at offset 0 and fills in `link`'s MAC
/// addresses and symmetric hash. Returns the EtherType found at the end
/// of the fixed 14-byte header (which may itself be `ETH_P_8021Q`,
/// handled by the VLAN parser next).
pub fn parse_link(
    pkt: &PacketView,
    link: &mut LinkLayer,
    layers_path: &mut super::LayersPath,
    layers_info_bits: &mut u8,
) -> u16 {
    link.mac_dst = pkt.read_mac(ETH_DST_OFFSET);
    link.mac_src = pkt.read_mac(ETH_SRC_OFFSET);

    let mut hash_src = 0u64;
    hash::update_half(&mut hash_src, u16::from(link.mac_src[0]) << 8 | u16::from(link.mac_src[1]));
    hash::update_half(&mut hash_src, u16::from(link.mac_src[2]) << 8 | u16::from(link.mac_src[3]));
    hash::update_half(&mut hash_src, u16::from(link.mac_src[4]) << 8 | u16::from(link.mac_src[5]));
    link.hash_src = hash_src;

    let mut hash_dst = 0u64;
    hash::update_half(&mut hash_dst, u16::from(link.mac_dst[0]) << 8 | u16::from(link.mac_dst[1]));
    hash::update_half(&mut hash_dst, u16::from(link.mac_dst[2]) << 8 | u16::from(link.mac_dst[3]));
    hash::update_half(&mut hash_dst, u16::from(link.mac_dst[4]) << 8 | u16::from(link.mac_dst[5]));

    link.hash = FNV_BASIS ^ hash_src ^ hash_dst;

    layers_path.push(LayerTag::Eth);
    *layers_info_bits |= layers_info::LINK;

    pkt.read_u16(ETH_PROTO_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayersPath;

    fn eth_packet(src: [u8; 6], dst: [u8; 6], ethertype: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&dst);
        buf.extend_from_slice(&src);
        buf.extend_from_slice(&ethertype.to_be_bytes());
        buf
    }

    #[test]
    fn link_hash_is_symmetric_under_src_dst_swap() {
        let a = eth_packet([1, 2, 3, 4, 5, 6], [0xa, 0xb, 0xc, 0xd, 0xe, 0xf], 0x0800);
        let b = eth_packet([0xa, 0xb, 0xc, 0xd, 0xe, 0xf], [1, 2, 3, 4, 5, 6], 0x0800);

        let mut link_a = LinkLayer::default();
        let mut path_a = LayersPath::new();
        let mut info_a = 0u8;
        parse_link(&PacketView::new(&a), &mut link_a, &mut path_a, &mut info_a);

        let mut link_b = LinkLayer::default();
        let mut path_b = LayersPath::new();
        let mut info_b = 0u8;
        parse_link(&PacketView::new(&b), &mut link_b, &mut path_b, &mut info_b);

        assert_eq!(link_a.hash, link_b.hash);
        assert_ne!(link_a.hash_src, link_b.hash_src);
    }

    #[test]
    fn sets_link_layer_info_and_path() {
        let buf = eth_packet([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12], 0x0800);
        let mut link = LinkLayer::default();
        let mut path = LayersPath::new();
        let mut info = 0u8;
        let ethertype = parse_link(&PacketView::new(&buf), &mut link, &mut path, &mut info);
        assert_eq!(ethertype, 0x0800);
        assert_eq!(info & layers_info::LINK, layers_info::LINK);
        assert_eq!(path.len(), 1);
    }
}
