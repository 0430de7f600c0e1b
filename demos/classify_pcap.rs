use flowtap::{Classifier, Config, PacketView};

use pcap_parser::LegacyPcapReader;
use pcap_parser::PcapError;
use pcap_parser::traits::PcapReaderIterator;
use std::fs::File;
use std::sync::atomic::Ordering;

struct PcapReader;

impl PcapReader {
    fn read_frames(path: &str) -> Vec<Vec<u8>> {
        let mut reader = Self::open(path);
        let mut frames = vec![];

        loop {
            match reader.next() {
                Ok((offset, block)) => {
                    match block {
                        pcap_parser::PcapBlockOwned::LegacyHeader(_header) => (),
                        pcap_parser::PcapBlockOwned::Legacy(pcap_block) => {
                            frames.push(pcap_block.data.to_vec());
                        }
                        pcap_parser::PcapBlockOwned::NG(_) => {
                            eprintln!("Warning: encountered a PCAPNG block in a legacy PCAP file.");
                        }
                    }
                    reader.consume(offset);
                }
                Err(PcapError::Eof) => break,
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().expect("failed to refill buffer");
                }
                Err(e) => {
                    eprintln!("error while reading pcap: {e:?}");
                    break;
                }
            }
        }

        frames
    }

    fn open(path: &str) -> LegacyPcapReader<File> {
        let cargo_home = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        let cargo_home = std::path::Path::new(&cargo_home).join("pcaps");
        let full_path = cargo_home.join(path);
        let file = File::open(full_path).expect("failed to open pcap file");
        LegacyPcapReader::new(65536, file).expect("LegacyPcapReader")
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let frames = PcapReader::read_frames("sample.pcap");
    let classifier = Classifier::new(Config::default());

    for (i, frame) in frames.iter().enumerate() {
        let pkt = PacketView::new(frame);
        // Captures don't carry a packet timestamp here; ticking a counter
        // is enough to exercise ordering/merge behavior end to end.
        classifier.classify(&pkt, i as u64, frame.len() as u64);
    }

    let page = classifier.stats().active_page.load(Ordering::Relaxed);
    let flows = classifier.flow_count(page);
    println!(
        "classified {} frames into {} flows ({} insert failures)",
        frames.len(),
        flows,
        classifier.stats().insert_failures.load(Ordering::Relaxed),
    );
}
