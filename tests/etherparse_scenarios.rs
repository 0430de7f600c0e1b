//! Scenario packets built with `etherparse::PacketBuilder` instead of
//! hand-typed byte vectors, the same role this dependency plays in the
//! teacher's own `demos/netflow_pcap.rs` (there used to parse a capture;
//! here to construct one realistically for S1/S2).

use etherparse::PacketBuilder;
use flowtap::{Classifier, Config, PacketView};
use std::sync::atomic::Ordering;

fn tcp_packet(src_mac: [u8; 6], dst_mac: [u8; 6], src_ip: [u8; 4], dst_ip: [u8; 4], sport: u16, dport: u16, syn: bool, ack: bool) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2(src_mac, dst_mac)
        .ipv4(src_ip, dst_ip, 64)
        .tcp(sport, dport, 0, 64_240);

    let builder = if syn { builder.syn() } else { builder };
    let builder = if ack { builder.ack(0) } else { builder };

    let mut out = Vec::new();
    builder.write(&mut out, &[]).expect("valid header fields");
    out
}

#[test]
fn s1_s2_tcp_handshake_built_with_etherparse() {
    let classifier = Classifier::new(Config::default());

    let syn = tcp_packet([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12], [10, 0, 0, 1], [10, 0, 0, 2], 40000, 80, true, false);
    classifier.classify(&PacketView::new(&syn), 1000, syn.len() as u64);

    let synack = tcp_packet([7, 8, 9, 10, 11, 12], [1, 2, 3, 4, 5, 6], [10, 0, 0, 2], [10, 0, 0, 1], 80, 40000, true, true);
    classifier.classify(&PacketView::new(&synack), 1100, synack.len() as u64);

    let page = classifier.stats().active_page.load(Ordering::Relaxed);
    assert_eq!(classifier.flow_count(page), 1);

    let record = classifier.table().generation(page).iter().next().unwrap();
    assert_eq!(record.metrics.ab_packets.load(Ordering::Relaxed), 1);
    assert_eq!(record.metrics.ba_packets.load(Ordering::Relaxed), 1);
    assert_eq!(record.transport.ab_syn.load(Ordering::Relaxed), 1000);
    assert_eq!(record.transport.ba_syn.load(Ordering::Relaxed), 1100);
}
