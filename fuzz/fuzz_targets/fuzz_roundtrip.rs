#![no_main]
use libfuzzer_sys::fuzz_target;
use zenqoi::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 20),
        ..Default::default()
    };

    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Decoded images larger than the encoder's 65535 bound are not re-encodable
    let Ok(reencoded) = encode(&decoded, enough::Unstoppable) else {
        return;
    };
    let Ok(decoded2) = decode(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    if decoded.channels == 4 {
        assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    } else {
        for (a, b) in decoded.pixels().chunks_exact(4).zip(decoded2.pixels().chunks_exact(4)) {
            assert_eq!(&a[..3], &b[..3], "roundtrip rgb mismatch");
            assert_eq!(b[3], 255);
        }
    }
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
});
