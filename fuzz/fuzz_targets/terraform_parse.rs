//! Fuzz target for Terraform JSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the Terraform parser,
//! checking for panics, crashes, or hangs. The parse contract requires
//! all failure to come back as structured diagnostics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panconfig::languages::TerraformParser;
use panconfig::plugin::{ParseContext, Parser};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(source) = std::str::from_utf8(data) {
        let _ = TerraformParser.parse(source, &ParseContext::default());
    }
});
