//! Serializable snapshots of a [`FlowRecord`]/[`Stats`], for a collector
//! that wants to export the table over JSON rather than walking the
//! live atomics itself.
//!
//! Mirrors the teacher's `NetflowPacket`/`NetflowCommonFlowSet`
//! convention: `Serialize` only, no `Deserialize` — this crate classifies
//! packets, it doesn't reconstruct `FlowRecord`s from JSON.

use std::sync::atomic::Ordering;

use serde::Serialize;

use crate::config::Stats;
use crate::flow::FlowRecord;

#[derive(Debug, Clone, Serialize)]
pub struct LinkSnapshot {
    pub mac_src: [u8; 6],
    pub mac_dst: [u8; 6],
    pub vlan_id: u32,
    pub hash: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkSnapshot {
    pub protocol: u16,
    pub ip_src: [u8; 16],
    pub ip_dst: [u8; 16],
    pub hash: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportSnapshot {
    pub protocol: u8,
    pub port_src: u16,
    pub port_dst: u16,
    pub ab_syn: u64,
    pub ab_fin: u64,
    pub ab_rst: u64,
    pub ba_syn: u64,
    pub ba_fin: u64,
    pub ba_rst: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IcmpSnapshot {
    pub kind: u8,
    pub code: u8,
    pub id: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub ab_packets: u64,
    pub ab_bytes: u64,
    pub ba_packets: u64,
    pub ba_bytes: u64,
}

/// A point-in-time, JSON-serializable copy of a [`FlowRecord`]. Taking
/// one never blocks a concurrent writer — every field is loaded with a
/// single relaxed atomic read, the same consistency model the table
/// engine itself relies on (spec.md §5: counters are eventually
/// consistent, never lost once an insert has succeeded).
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub key: u64,
    pub layers_path: Vec<u8>,
    pub layers_info: u8,
    pub link: LinkSnapshot,
    pub network: NetworkSnapshot,
    pub transport: TransportSnapshot,
    pub icmp: IcmpSnapshot,
    pub metrics: MetricsSnapshot,
    pub start: u64,
    pub last: u64,
}

impl FlowRecord {
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            key: self.key,
            layers_path: crate::layers::LayersPath::decode(self.layers_path, self.layers_path_len),
            layers_info: self.layers_info,
            link: LinkSnapshot {
                mac_src: self.link.mac_src,
                mac_dst: self.link.mac_dst,
                vlan_id: self.link.vlan_id,
                hash: self.link.hash,
            },
            network: NetworkSnapshot {
                protocol: self.network.protocol,
                ip_src: self.network.ip_src,
                ip_dst: self.network.ip_dst,
                hash: self.network.hash,
            },
            transport: TransportSnapshot {
                protocol: self.transport.protocol,
                port_src: self.transport.port_src,
                port_dst: self.transport.port_dst,
                ab_syn: self.transport.ab_syn.load(Ordering::Relaxed),
                ab_fin: self.transport.ab_fin.load(Ordering::Relaxed),
                ab_rst: self.transport.ab_rst.load(Ordering::Relaxed),
                ba_syn: self.transport.ba_syn.load(Ordering::Relaxed),
                ba_fin: self.transport.ba_fin.load(Ordering::Relaxed),
                ba_rst: self.transport.ba_rst.load(Ordering::Relaxed),
            },
            icmp: IcmpSnapshot {
                kind: self.icmp.icmp_type,
                code: self.icmp.code,
                id: self.icmp.id,
            },
            metrics: MetricsSnapshot {
                ab_packets: self.metrics.ab_packets.load(Ordering::Relaxed),
                ab_bytes: self.metrics.ab_bytes.load(Ordering::Relaxed),
                ba_packets: self.metrics.ba_packets.load(Ordering::Relaxed),
                ba_bytes: self.metrics.ba_bytes.load(Ordering::Relaxed),
            },
            start: self.start,
            last: self.last.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`Stats`]'s three atomics.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsSnapshot {
    pub start_time_ns: u64,
    pub active_page: u8,
    pub insert_failures: u64,
}

impl Stats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            start_time_ns: self.start_time_ns.load(Ordering::Relaxed),
            active_page: self.active_page.load(Ordering::Relaxed),
            insert_failures: self.insert_failures.load(Ordering::Relaxed),
        }
    }
}
