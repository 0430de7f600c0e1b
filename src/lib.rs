//! `flowtap` parses Ethernet/VLAN/IPv4/IPv6/TCP/UDP/SCTP/ICMP headers one
//! packet at a time and maintains a bounded, concurrently-accessed table
//! of bidirectional flows keyed by a direction-insensitive 64-bit hash.
//!
//! It is meant to sit behind whatever hands it packets — a socket, an
//! XDP/AF_PACKET tap, a pcap replay loop — and is itself silent about
//! how packets arrive or how the resulting tables get drained. Both of
//! those are a collector's job.
//!
//! # Example
//!
//! ```rust
//! use flowtap::{Classifier, Config, PacketView};
//!
//! let classifier = Classifier::new(Config::default());
//!
//! // A minimal Ethernet + IPv4 + TCP SYN packet.
//! let mut buf = vec![0u8; 54];
//! buf[12..14].copy_from_slice(&0x0800u16.to_be_bytes()); // EtherType IPv4
//! buf[14] = 0x45; // IPv4 version/IHL
//! buf[23] = 6; // protocol TCP
//! buf[26..30].copy_from_slice(&[10, 0, 0, 1]);
//! buf[30..34].copy_from_slice(&[10, 0, 0, 2]);
//! buf[34..36].copy_from_slice(&40000u16.to_be_bytes());
//! buf[36..38].copy_from_slice(&80u16.to_be_bytes());
//! buf[47] = 0x02; // SYN
//!
//! classifier.classify(&PacketView::new(&buf), 1_000, buf.len() as u64);
//! ```

pub mod classifier;
pub mod config;
pub mod errors;
pub mod flow;
pub mod hash;
pub mod layers;
pub mod packet;
pub mod snapshot;
pub mod table;

pub use classifier::Classifier;
pub use config::{Config, ConfigBuilder, Stats};
pub use errors::ClassifyError;
pub use flow::{FlowKeyBuilder, FlowRecord};
pub use packet::PacketView;
pub use snapshot::{FlowSnapshot, StatsSnapshot};
pub use table::FlowTable;
