//! Fuzz target for IRC line parsing and event translation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if input.is_empty() || input.len() > 512 {
            return;
        }

        if let Ok(msg) = input.parse::<slirc_client::Message>() {
            let _ = slirc_client::event::translate(&msg);
        }
    }
});
