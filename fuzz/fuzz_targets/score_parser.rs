#![no_main]

use libfuzzer_sys::fuzz_target;
use prefjudge_core::judge::scores::{is_sufficient, parse_scores};
use prefjudge_core::JudgmentResult;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let scores = parse_scores(s);
        assert_eq!(is_sufficient(&scores), JudgmentResult::from_scores(&scores).is_some());
    }
});
