#![no_main]

use libfuzzer_sys::fuzz_target;
use prefjudge_core::request::{decompose_prompt, parse_prompt_line};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_prompt_line(1, s);
        let _ = decompose_prompt("fuzz", s);
    }
});
