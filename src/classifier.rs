//! Top-level `Classifier`: the single per-packet entry point a tap
//! invokes, wiring the layer parsers (C2–C7) into the table engine (C8)
//! under the configuration/stats surface (C9).

use crate::config::{Config, Stats};
use crate::flow::FlowKeyBuilder;
use crate::hash;
use crate::layers::icmp::IcmpLayer;
use crate::layers::link::{self, LinkLayer};
use crate::layers::network::{self, NetworkLayer};
use crate::layers::transport::TransportLayer;
use crate::layers::vlan;
use crate::layers::{layers_info, LayersPath};
use crate::packet::PacketView;
use crate::table::FlowTable;

/// Ties the parsing pipeline to a bounded, concurrently-accessed flow
/// table. Cheap to share: `classify` takes `&self`, so one `Classifier`
/// is built once and handed to every worker thread/CPU the tap runs on.
pub struct Classifier {
    config: Config,
    stats: Stats,
    table: FlowTable,
}

impl Classifier {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stats: Stats::new(),
            table: FlowTable::new(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Drops a generation's entries after a collector has finished
    /// draining it; see [`FlowTable::clear_generation`].
    pub fn clear_generation(&self, page: u8) {
        self.table.clear_generation(page);
    }

    /// Number of distinct flows currently held in generation `page`.
    pub fn flow_count(&self, page: u8) -> usize {
        self.table.generation(page).len()
    }

    /// Direct access to the underlying table, for collector-style
    /// inspection (tests, demos) that need to read specific records
    /// rather than just a count.
    pub fn table(&self) -> &FlowTable {
        &self.table
    }

    /// Classifies one packet: runs the full C2–C7 parsing pipeline, then
    /// inserts or updates the active generation (C8). `tm` is the
    /// packet's timestamp in nanoseconds, `packet_len` its wire length
    /// (may exceed `pkt.len()` for a truncated capture).
    ///
    /// Never fails: a malformed or short packet yields zeroed hashes at
    /// whatever layer ran out of bytes (spec §7), and still produces a
    /// well-defined key from whatever layers did parse.
    pub fn classify(&self, pkt: &PacketView, tm: u64, packet_len: u64) {
        let mut link = LinkLayer::default();
        let mut network = NetworkLayer::default();
        let mut transport = TransportLayer::default();
        let mut icmp = IcmpLayer::default();
        let mut layers_path = LayersPath::new();
        let mut layers_info_bits = 0u8;

        let ethertype = link::parse_link(pkt, &mut link, &mut layers_path, &mut layers_info_bits);
        let (ethertype, offset) = vlan::parse_vlans(pkt, ethertype, link::ETH_HLEN, &mut link, &mut layers_path);

        match ethertype {
            network::ETH_P_ARP => {
                // Mirrors fill_flow's ARP case: the ethertype itself is
                // mixed straight into the running link hash (no separate
                // accumulator, no layers_path tag — ARP never calls
                // add_layer in the original), and its own layers_info bit
                // is set.
                hash::update_half(&mut link.hash, ethertype);
                layers_info_bits |= layers_info::ARP;
            }
            network::ETH_P_IP | network::ETH_P_IPV6 => {
                network::parse_network(
                    pkt,
                    ethertype,
                    offset,
                    tm,
                    &mut network,
                    &mut transport,
                    &mut icmp,
                    &mut layers_path,
                    &mut layers_info_bits,
                );
            }
            _ => {}
        }

        let key = FlowKeyBuilder::new()
            .link(link.hash)
            .network(network.hash)
            .transport(transport.hash)
            .icmp(icmp.hash)
            .build();

        self.table.classify(
            &self.config,
            &self.stats,
            key,
            &layers_path,
            layers_info_bits,
            link,
            network,
            transport,
            icmp,
            tm,
            packet_len,
        );
    }
}
