//! JSON export of flow/stats snapshots, mirroring the teacher's
//! `tests/serialization.rs` (`Serialize`-only, round-tripped through
//! `serde_json` rather than deserialized back).

use flowtap::{Classifier, Config, PacketView};

fn eth_ipv4_tcp_syn() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&[7, 8, 9, 10, 11, 12]);
    buf.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
    buf.extend_from_slice(&0x0800u16.to_be_bytes());

    let mut ip = vec![0u8; 20];
    ip[0] = 0x45;
    ip[9] = 6; // TCP
    ip[12..16].copy_from_slice(&[10, 0, 0, 1]);
    ip[16..20].copy_from_slice(&[10, 0, 0, 2]);
    buf.extend_from_slice(&ip);

    let mut tcp = vec![0u8; 20];
    tcp[0..2].copy_from_slice(&40000u16.to_be_bytes());
    tcp[2..4].copy_from_slice(&80u16.to_be_bytes());
    tcp[13] = 0x02; // SYN
    buf.extend_from_slice(&tcp);

    buf
}

#[test]
fn flow_snapshot_serializes_expected_fields() {
    let classifier = Classifier::new(Config::default());
    let buf = eth_ipv4_tcp_syn();
    classifier.classify(&PacketView::new(&buf), 1000, buf.len() as u64);

    let page = classifier.stats().active_page.load(std::sync::atomic::Ordering::Relaxed);
    let record = classifier.table().generation(page).iter().next().unwrap();
    let snapshot = record.snapshot();

    let json = serde_json::to_string(&snapshot).expect("flow snapshot should serialize");

    assert!(json.contains("\"port_src\":40000"));
    assert!(json.contains("\"port_dst\":80"));
    assert!(json.contains("\"ab_syn\":1000"));
    assert!(json.contains("\"ab_packets\":1"));
}

#[test]
fn flow_snapshot_json_pretty_print_has_newlines() {
    let classifier = Classifier::new(Config::default());
    let buf = eth_ipv4_tcp_syn();
    classifier.classify(&PacketView::new(&buf), 1, buf.len() as u64);

    let page = classifier.stats().active_page.load(std::sync::atomic::Ordering::Relaxed);
    let record = classifier.table().generation(page).iter().next().unwrap();
    let json = serde_json::to_string_pretty(&record.snapshot()).expect("should serialize");

    assert!(json.contains('\n'));
}

#[test]
fn stats_snapshot_serializes_counters() {
    let classifier = Classifier::new(Config::builder().capacity_per_generation(1).build().unwrap());

    classifier.classify(&PacketView::new(&eth_ipv4_tcp_syn()), 1, 60);
    let mut buf2 = eth_ipv4_tcp_syn();
    buf2[0] = 0xff; // different dst mac -> different key -> second insert fails
    classifier.classify(&PacketView::new(&buf2), 2, 60);

    let json = serde_json::to_string(&classifier.stats().snapshot()).expect("should serialize");
    assert!(json.contains("\"insert_failures\":1"));
}
