//! Classifies a hand-assembled hex packet dump, the way the teacher's
//! `src/tests.rs` builds NetFlow fixtures with `hex::decode` instead of
//! long literal byte arrays.

use flowtap::layers::layers_info;
use flowtap::{Classifier, Config, PacketView};

/// Ethernet (14B) + IPv4 (20B, no options) + TCP SYN (20B, no options):
/// 10.0.0.1:40000 -> 10.0.0.2:80.
const TCP_SYN_HEX: &str = concat!(
    "080027000001", // dst mac
    "080027000002", // src mac
    "0800",         // ethertype IPv4
    "45",           // version 4 / IHL 5
    "00",           // DSCP/ECN
    "0028",         // total length 40
    "0000",         // identification
    "0000",         // flags/fragment offset
    "40",           // TTL
    "06",           // protocol TCP
    "0000",         // header checksum (unvalidated by this crate)
    "0a000001",     // src ip 10.0.0.1
    "0a000002",     // dst ip 10.0.0.2
    "9c40",         // src port 40000
    "0050",         // dst port 80
    "00000000",     // sequence number
    "00000000",     // ack number
    "50",           // data offset / reserved
    "02",           // flags: SYN
    "0000",         // window
    "0000",         // checksum
    "0000",         // urgent pointer
);

#[test]
fn hex_dump_tcp_syn_classifies_as_expected() {
    let packet = hex::decode(TCP_SYN_HEX).expect("valid hex dump");
    let classifier = Classifier::new(Config::default());
    classifier.classify(&PacketView::new(&packet), 1000, packet.len() as u64);

    let page = classifier.stats().active_page.load(std::sync::atomic::Ordering::Relaxed);
    assert_eq!(classifier.flow_count(page), 1);

    let record = classifier.table().generation(page).iter().next().unwrap();
    assert_eq!(record.transport.port_src, 40000);
    assert_eq!(record.transport.port_dst, 80);
    assert_eq!(record.transport.ab_syn.load(std::sync::atomic::Ordering::Relaxed), 1000);
    assert_eq!(record.layers_info & layers_info::TRANSPORT, layers_info::TRANSPORT);
    assert_eq!(&record.network.ip_src[12..16], &[10, 0, 0, 1]);
    assert_eq!(&record.network.ip_dst[12..16], &[10, 0, 0, 2]);
}
