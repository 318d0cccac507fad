#![no_main]
use libfuzzer_sys::fuzz_target;
use memfit::api::handlers::{compare_body, simulate};
use memfit::{Limits, Strategy};

// Arbitrary bytes must never panic the decoder or the simulator
fuzz_target!(|data: &[u8]| {
    let limits = Limits::default();
    let _ = compare_body(data, &limits);
    for strategy in Strategy::ALL {
        let _ = simulate(strategy, data, &limits);
    }
});
