//! TCP/UDP/SCTP transport-layer parsing (C5): port extraction, the
//! same-address port-order fallback, and the TCP flags byte the table
//! engine uses for SYN/FIN/RST timestamping.

use crate::hash::{self, FNV_BASIS};
use crate::layers::network::{IPPROTO_SCTP, IPPROTO_TCP, IPPROTO_UDP};
use crate::layers::{LayerTag, LayersPath, layers_info};
use crate::packet::PacketView;

pub const TCP_FIN: u8 = 0x01;
pub const TCP_SYN: u8 = 0x02;
pub const TCP_RST: u8 = 0x04;

const PORT_SRC_OFFSET: usize = 0;
const PORT_DST_OFFSET: usize = 2;
const TCP_FLAGS_OFFSET: usize = 13;

/// Populated transport-layer fields of a flow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportLayer {
    pub protocol: u8,
    pub port_src: u16,
    pub port_dst: u16,
    pub hash: u64,
    /// Raw TCP flags byte (`SYN`/`FIN`/`RST` bits); `0` for UDP/SCTP.
    pub tcp_flags: u8,
}

impl Default for TransportLayer {
    fn default() -> Self {
        Self {
            protocol: 0,
            port_src: 0,
            port_dst: 0,
            hash: 0,
            tcp_flags: 0,
        }
    }
}

/// Parses the transport header at `offset`. `swap` is the network
/// layer's canonical direction flag; when `netequal` (both endpoints
/// share the same address, e.g. loopback) it is recomputed from port
/// order instead, since address order carries no information there.
pub fn parse_transport(
    pkt: &PacketView,
    protocol: u8,
    offset: usize,
    tm: u64,
    mut swap: bool,
    netequal: bool,
    transport: &mut TransportLayer,
    layers_path: &mut LayersPath,
    layers_info_bits: &mut u8,
) {
    let _ = tm;
    transport.protocol = protocol;
    transport.port_src = pkt.read_u16(offset + PORT_SRC_OFFSET);
    transport.port_dst = pkt.read_u16(offset + PORT_DST_OFFSET);

    if netequal {
        swap = transport.port_src > transport.port_dst;
    }

    if protocol == IPPROTO_TCP {
        transport.tcp_flags = pkt.read_u8(offset + TCP_FLAGS_OFFSET);
    }

    let mut hash_src = 0u64;
    hash::update_half(&mut hash_src, transport.port_src);
    let mut hash_dst = 0u64;
    hash::update_half(&mut hash_dst, transport.port_dst);

    let (hash_lo, hash_hi) = if swap { (hash_dst, hash_src) } else { (hash_src, hash_dst) };
    transport.hash = FNV_BASIS ^ hash::rotl(hash_lo, 16) ^ hash_hi;

    let tag = match protocol {
        IPPROTO_TCP => LayerTag::Tcp,
        IPPROTO_UDP => LayerTag::Udp,
        IPPROTO_SCTP => LayerTag::Sctp,
        _ => return,
    };
    layers_path.push(tag);
    *layers_info_bits |= layers_info::TRANSPORT;
}
