#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate stubdns;

fuzz_target!(|data: &[u8]| {
    // Any input must either parse or fail cleanly, never panic or hang.
    if let Ok(m) = stubdns::Response::from_slice(data) {
        let _ = m.entries();
        let _ = m.to_string();
    }
});
