#![no_main]

use flowtap::{Classifier, Config, PacketView};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let classifier = Classifier::new(Config::default());
    classifier.classify(&PacketView::new(data), 1, data.len() as u64);
});
