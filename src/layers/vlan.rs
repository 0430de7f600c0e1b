//! 802.1Q VLAN stack parsing (C3), including the hardware-offload path.
//!
//! Preserves a deliberate legacy asymmetry (spec §4.3/§9): inline-parsed
//! VLAN ids are mixed into `link.hash` via FNV, but a hardware-stripped
//! tag reported by the tap is XORed in raw. This is a known quirk of the
//! original eBPF probe this crate generalizes, kept for compatibility
//! with collectors that already interpret `link.hash` this way — it is
//! not "fixed" here.

use crate::hash;
use crate::layers::link::LinkLayer;
use crate::layers::{LayerTag, LayersPath};
use crate::packet::PacketView;

pub const ETH_P_8021Q: u16 = 0x8100;
const MAX_VLAN_LAYERS: usize = 5;
const TCI_LEN: usize = 2;
const ETHERTYPE_LEN: usize = 2;

/// Parses up to [`MAX_VLAN_LAYERS`] stacked 802.1Q tags starting at
/// `offset`, plus one hardware-offloaded tag if the tap reported one.
/// Returns the final inner EtherType and the offset of the first byte
/// after the VLAN tags (unchanged if `ethertype` wasn't `0x8100`).
pub fn parse_vlans(
    pkt: &PacketView,
    mut ethertype: u16,
    mut offset: usize,
    link: &mut LinkLayer,
    layers_path: &mut LayersPath,
) -> (u16, usize) {
    if ethertype == ETH_P_8021Q {
        for _ in 0..MAX_VLAN_LAYERS {
            let tci = pkt.read_u16(offset);
            let inner_ethertype = pkt.read_u16(offset + TCI_LEN);
            let vlan_id = tci & 0x0FFF;

            let mut hash_vlan = 0u64;
            hash::update_half(&mut hash_vlan, vlan_id);
            link.hash ^= hash_vlan;
            link.vlan_id = (link.vlan_id << 12) | u32::from(vlan_id);

            layers_path.push(LayerTag::Dot1q);
            offset += TCI_LEN + ETHERTYPE_LEN;

            ethertype = inner_ethertype;
            if ethertype != ETH_P_8021Q {
                break;
            }
        }
    }

    if let Some(tci) = pkt.vlan_offloaded {
        let vlan_id = u32::from(tci & 0x0FFF);
        link.hash ^= u64::from(vlan_id); // raw XOR, not FNV-hashed: see module docs
        link.vlan_id = (link.vlan_id << 12) | vlan_id;
        layers_path.push(LayerTag::Dot1q);
    }

    (ethertype, offset)
}
