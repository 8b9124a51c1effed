//! Fuzz target for Terraform syntax validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panconfig::languages::TerraformParser;
use panconfig::plugin::Parser;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(source) = std::str::from_utf8(data) {
        let _ = TerraformParser.validate_syntax(source);
    }
});
