//! Fuzz target for mode change decoding.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::{decode_mode_changes, FeatureSet};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let args: Vec<&str> = input.split(' ').collect();
        let _ = decode_mode_changes(&args, &FeatureSet::new());
    }
});
