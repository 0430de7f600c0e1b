//! ICMPv4/ICMPv6 parsing (C6): type/code/echo-id extraction, with echo
//! request and reply deliberately canonicalized to the same hash so a
//! ping and its reply land in one flow.

use crate::hash::{self, FNV_BASIS};
use crate::layers::{LayerTag, LayersPath, layers_info};
use crate::packet::PacketView;

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const ECHO_ID_OFFSET: usize = 4;

const ICMPV4_ECHO_REPLY: u8 = 0;
const ICMPV4_ECHO_REQUEST: u8 = 8;
/// Folded into the hash in place of `icmp_type` for echo messages, so a
/// request and its reply land on the same accumulator value.
const ICMPV4_ECHO_CONST: u8 = ICMPV4_ECHO_REQUEST | ICMPV4_ECHO_REPLY;

const ICMPV6_ECHO_REQUEST: u8 = 128;
const ICMPV6_ECHO_REPLY: u8 = 129;
const ICMPV6_ECHO_CONST: u8 = ICMPV6_ECHO_REQUEST | ICMPV6_ECHO_REPLY;

/// Populated ICMP fields of a flow record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IcmpLayer {
    pub icmp_type: u8,
    pub code: u8,
    /// Echo identifier, valid only for echo request/reply messages.
    pub id: u16,
    pub hash: u64,
}

fn finalize(
    icmp: &mut IcmpLayer,
    is_echo: bool,
    echo_const: u8,
    layers_path: &mut LayersPath,
    layers_info_bits: &mut u8,
    tag: LayerTag,
) {
    let mut h = 0u64;
    if is_echo {
        hash::update_half(&mut h, u16::from(echo_const) << 8 | u16::from(icmp.code));
        hash::update_half(&mut h, icmp.id);
    } else {
        // Non-echo messages hash on `code` alone — `icmp_type` is stored
        // on the record but deliberately left out of the accumulator, so
        // e.g. Destination-Unreachable and Time-Exceeded sharing a code
        // byte collide into the same flow, matching fill_icmpv4/fill_icmpv6.
        hash::update_half(&mut h, u16::from(icmp.code));
    }
    icmp.hash = FNV_BASIS ^ h;

    layers_path.push(tag);
    *layers_info_bits |= layers_info::ICMP;
}

/// Parses an ICMPv4 header at `offset`.
pub fn parse_icmpv4(
    pkt: &PacketView,
    offset: usize,
    icmp: &mut IcmpLayer,
    layers_path: &mut LayersPath,
    layers_info_bits: &mut u8,
) {
    icmp.icmp_type = pkt.read_u8(offset + TYPE_OFFSET);
    icmp.code = pkt.read_u8(offset + CODE_OFFSET);

    let is_echo = icmp.icmp_type == ICMPV4_ECHO_REQUEST || icmp.icmp_type == ICMPV4_ECHO_REPLY;
    icmp.id = if is_echo { pkt.read_u16(offset + ECHO_ID_OFFSET) } else { 0 };

    finalize(icmp, is_echo, ICMPV4_ECHO_CONST, layers_path, layers_info_bits, LayerTag::Icmp4);
}

/// Parses an ICMPv6 header at `offset`.
pub fn parse_icmpv6(
    pkt: &PacketView,
    offset: usize,
    icmp: &mut IcmpLayer,
    layers_path: &mut LayersPath,
    layers_info_bits: &mut u8,
) {
    icmp.icmp_type = pkt.read_u8(offset + TYPE_OFFSET);
    icmp.code = pkt.read_u8(offset + CODE_OFFSET);

    let is_echo = icmp.icmp_type == ICMPV6_ECHO_REQUEST || icmp.icmp_type == ICMPV6_ECHO_REPLY;
    icmp.id = if is_echo { pkt.read_u16(offset + ECHO_ID_OFFSET) } else { 0 };

    finalize(icmp, is_echo, ICMPV6_ECHO_CONST, layers_path, layers_info_bits, LayerTag::Icmp6);
}
