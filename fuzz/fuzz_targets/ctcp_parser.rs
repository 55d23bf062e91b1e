//! Fuzz target for CTCP de-quoting.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::ctcp;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = ctcp::dequote(input);
        let quoted = ctcp::low_level_quote(input);
        assert_eq!(ctcp::low_level_dequote(&quoted), input);
    }
});
