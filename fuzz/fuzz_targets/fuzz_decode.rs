#![no_main]
use libfuzzer_sys::fuzz_target;
use zenqoi::{DecodeEvent, DecodeRequest, Limits};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };

    // Decode and event decode must never panic
    let _ = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable);
    let _ = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode_with_events(|_: DecodeEvent| {}, enough::Unstoppable);
});
