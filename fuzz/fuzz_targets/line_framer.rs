//! Fuzz target for line framing: arbitrary bytes fed in arbitrary chunks
//! must never panic and never yield a line containing a newline.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::LineFramer;

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::utf8();
    let step = data.first().map_or(1, |b| usize::from(*b % 16) + 1);
    for chunk in data.chunks(step) {
        framer.feed(chunk);
        for line in framer.drain() {
            assert!(!line.contains('\n'));
        }
    }
});
