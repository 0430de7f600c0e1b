//! Flow table engine (C8): dual-generation lookup/insert, the direction
//! test, metric accumulation, and the TCP flag conditional-from-zero
//! merge (spec §4.8, §5, §9).

use std::sync::Arc;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::config::{Config, Stats};
use crate::flow::FlowRecord;
use crate::layers::icmp::IcmpLayer;
use crate::layers::link::LinkLayer;
use crate::layers::network::{IPPROTO_TCP, NetworkLayer};
use crate::layers::transport::{TCP_FIN, TCP_RST, TCP_SYN, TransportLayer as ParsedTransport};
use crate::layers::LayersPath;

/// Two equal-capacity generations, `T1`/`T2` in spec terms, addressed by
/// `stats.active_page`. A sharded concurrent map per generation, so
/// packets for different flows never contend on a single global lock.
pub struct FlowTable {
    generations: [DashMap<u64, Arc<FlowRecord>>; 2],
}

impl FlowTable {
    pub fn new() -> Self {
        Self {
            generations: [DashMap::new(), DashMap::new()],
        }
    }

    fn active(&self, stats: &Stats) -> &DashMap<u64, Arc<FlowRecord>> {
        &self.generations[usize::from(stats.active_page.load(Ordering::Relaxed) & 1)]
    }

    /// Looks up `key` in the inactive generation too, so a collector
    /// driving drain-by-iteration can also spot-check entries; not used
    /// on the classification hot path.
    pub fn generation(&self, page: u8) -> &DashMap<u64, Arc<FlowRecord>> {
        &self.generations[usize::from(page & 1)]
    }

    /// Clears a generation. Called by the collector after draining it
    /// (spec §4.8's rotation discipline); the classifier never deletes.
    pub fn clear_generation(&self, page: u8) {
        self.generations[usize::from(page & 1)].clear();
    }

    #[allow(clippy::too_many_arguments)]
    pub fn classify(
        &self,
        config: &Config,
        stats: &Stats,
        key: u64,
        layers_path: &LayersPath,
        layers_info: u8,
        link: LinkLayer,
        network: NetworkLayer,
        transport: ParsedTransport,
        icmp: IcmpLayer,
        tm: u64,
        packet_len: u64,
    ) {
        stats.init_start_time(tm);
        let table = self.active(stats);

        match table.entry(key) {
            Entry::Occupied(occupied) => {
                apply_hit(occupied.get(), &link, &network, &transport, tm, packet_len);
            }
            Entry::Vacant(vacant) => {
                if table.len() >= config.capacity_per_generation {
                    let failures = stats.insert_failures.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::debug!(key, capacity = config.capacity_per_generation, failures, "flow table full, dropping insert");
                    return;
                }
                let record = FlowRecord::new(key, layers_path, layers_info, link, network, &transport, icmp, tm, packet_len);
                tracing::trace!(key, layers_info, "new flow record created");
                vacant.insert(Arc::new(record));
            }
        }
    }
}

impl Default for FlowTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `is_ab_packet` (spec §4.8): default test is the link-layer source
/// hash; self-to-self traffic (identical MACs, then identical IPs)
/// falls back first to the network layer, then to port comparison.
fn is_ab_packet(link: &LinkLayer, network: &NetworkLayer, transport: &ParsedTransport, prev: &FlowRecord) -> bool {
    if link.mac_src != link.mac_dst {
        return link.hash_src == prev.link.hash_src;
    }
    if network.ip_src != network.ip_dst {
        return network.hash_src == prev.network.hash_src;
    }
    transport.port_src > transport.port_dst
}

fn store_from_zero(cell: &std::sync::atomic::AtomicU64, value: u64) {
    if value == 0 {
        return;
    }
    let _ = cell.compare_exchange(0, value, Ordering::Relaxed, Ordering::Relaxed);
}

fn apply_hit(record: &FlowRecord, link: &LinkLayer, network: &NetworkLayer, transport: &ParsedTransport, tm: u64, packet_len: u64) {
    let ab = is_ab_packet(link, network, transport, record);

    if ab {
        record.metrics.ab_packets.fetch_add(1, Ordering::Relaxed);
        record.metrics.ab_bytes.fetch_add(packet_len, Ordering::Relaxed);
    } else {
        record.metrics.ba_packets.fetch_add(1, Ordering::Relaxed);
        record.metrics.ba_bytes.fetch_add(packet_len, Ordering::Relaxed);
    }
    record.bump_last(tm);

    if transport.protocol != IPPROTO_TCP {
        return;
    }

    let syn = if transport.tcp_flags & TCP_SYN != 0 { tm } else { 0 };
    let fin = if transport.tcp_flags & TCP_FIN != 0 { tm } else { 0 };
    let rst = if transport.tcp_flags & TCP_RST != 0 { tm } else { 0 };

    // spec §4.8 / flow.c:479 gate the flag merge on a separate, simpler
    // test than the metrics direction above: plain port_src equality
    // against the record's creating packet, not the MAC/IP/port fallback
    // chain `is_ab_packet` uses (those disagree for self-to-self traffic).
    let ports_match_ab = record.transport.port_src == transport.port_src;

    if ports_match_ab {
        store_from_zero(&record.transport.ab_syn, syn);
        store_from_zero(&record.transport.ab_fin, fin);
        store_from_zero(&record.transport.ab_rst, rst);
    } else {
        store_from_zero(&record.transport.ba_syn, syn);
        store_from_zero(&record.transport.ba_fin, fin);
        store_from_zero(&record.transport.ba_rst, rst);
    }
}
