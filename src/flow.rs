//! The flow record data model (spec §3) and the C7 flow-key builder that
//! composes per-layer hashes into the table key.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::hash::rotl;
use crate::layers::icmp::IcmpLayer;
use crate::layers::link::LinkLayer;
use crate::layers::network::NetworkLayer;
use crate::layers::transport::TransportLayer as ParsedTransport;
use crate::layers::LayersPath;

/// Composes per-layer hashes into the 64-bit table key, each layer
/// rotating the accumulator 16 bits before XOR-ing its own hash in.
/// Layers that never ran contribute `0`, i.e. no rotation slot of their
/// own — `rotl(x, 16) ^ 0 == rotl(x, 16)`, matching spec §4.7 exactly.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlowKeyBuilder {
    key: u64,
}

impl FlowKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn link(mut self, hash: u64) -> Self {
        self.key = hash;
        self
    }

    #[must_use]
    pub fn network(mut self, hash: u64) -> Self {
        self.key = rotl(self.key, 16) ^ hash;
        self
    }

    #[must_use]
    pub fn transport(mut self, hash: u64) -> Self {
        self.key = rotl(self.key, 16) ^ hash;
        self
    }

    #[must_use]
    pub fn icmp(mut self, hash: u64) -> Self {
        self.key = rotl(self.key, 16) ^ hash;
        self
    }

    pub fn build(self) -> u64 {
        self.key
    }
}

/// Transport-layer state kept on a stored [`FlowRecord`]: the immutable
/// fields captured from the creating packet plus the per-direction TCP
/// flag timestamps the table engine merges into under a zero-guard.
#[derive(Debug, Default)]
pub struct TransportState {
    pub protocol: u8,
    pub port_src: u16,
    pub port_dst: u16,
    pub hash: u64,
    pub ab_syn: AtomicU64,
    pub ab_fin: AtomicU64,
    pub ab_rst: AtomicU64,
    pub ba_syn: AtomicU64,
    pub ba_fin: AtomicU64,
    pub ba_rst: AtomicU64,
}

impl TransportState {
    fn from_parsed(parsed: &ParsedTransport, tm: u64) -> Self {
        use crate::layers::transport::{TCP_FIN, TCP_RST, TCP_SYN};

        let ab_syn = if parsed.tcp_flags & TCP_SYN != 0 { tm } else { 0 };
        let ab_fin = if parsed.tcp_flags & TCP_FIN != 0 { tm } else { 0 };
        let ab_rst = if parsed.tcp_flags & TCP_RST != 0 { tm } else { 0 };

        Self {
            protocol: parsed.protocol,
            port_src: parsed.port_src,
            port_dst: parsed.port_dst,
            hash: parsed.hash,
            ab_syn: AtomicU64::new(ab_syn),
            ab_fin: AtomicU64::new(ab_fin),
            ab_rst: AtomicU64::new(ab_rst),
            ba_syn: AtomicU64::new(0),
            ba_fin: AtomicU64::new(0),
            ba_rst: AtomicU64::new(0),
        }
    }
}

/// Atomic packet/byte counters for both conversation directions.
#[derive(Debug, Default)]
pub struct Metrics {
    pub ab_packets: AtomicU64,
    pub ab_bytes: AtomicU64,
    pub ba_packets: AtomicU64,
    pub ba_bytes: AtomicU64,
}

/// One bidirectional conversation. Layer substructs and `layers_path`
/// are a snapshot from the packet that created the record; only
/// `metrics`, the transport directional timestamps, and `last` mutate
/// afterward, each through an atomic so a shared read guard on the
/// table entry is enough to update them.
#[derive(Debug)]
pub struct FlowRecord {
    pub key: u64,
    pub layers_path: u64,
    pub layers_path_len: u8,
    pub layers_info: u8,
    pub link: LinkLayer,
    pub network: NetworkLayer,
    pub transport: TransportState,
    pub icmp: IcmpLayer,
    pub metrics: Metrics,
    pub start: u64,
    pub last: AtomicU64,
}

impl FlowRecord {
    /// Builds a new record from the packet that created it. The
    /// creating packet always defines the A→B direction: its metrics
    /// seed `ab_packets`/`ab_bytes`, never `ba_*`.
    pub fn new(
        key: u64,
        layers_path: &LayersPath,
        layers_info: u8,
        link: LinkLayer,
        network: NetworkLayer,
        transport: &ParsedTransport,
        icmp: IcmpLayer,
        tm: u64,
        packet_len: u64,
    ) -> Self {
        Self {
            key,
            layers_path: layers_path.packed(),
            layers_path_len: layers_path.len() as u8,
            layers_info,
            link,
            network,
            transport: TransportState::from_parsed(transport, tm),
            icmp,
            metrics: Metrics {
                ab_packets: AtomicU64::new(1),
                ab_bytes: AtomicU64::new(packet_len),
                ba_packets: AtomicU64::new(0),
                ba_bytes: AtomicU64::new(0),
            },
            start: tm,
            last: AtomicU64::new(tm),
        }
    }

    /// Refreshes `last` to the true high-water mark seen so far. Spec
    /// §9's open question: the original folds a delta in via
    /// `fetch_add`, which can transiently run backwards under
    /// concurrent reordering; `fetch_max` is the monotonic equivalent.
    pub fn bump_last(&self, tm: u64) {
        self.last.fetch_max(tm, Ordering::Relaxed);
    }
}
