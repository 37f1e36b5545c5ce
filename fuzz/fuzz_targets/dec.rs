#![no_main]
use libfuzzer_sys::fuzz_target;
use uriutils::pct_enc;

fuzz_target!(|data: &str| {
    let _ = pct_enc::decode(data);
    let _ = pct_enc::decode_plus_as_space(data);
});
