use enough::Unstoppable;
use zenqoi::*;

fn rgba_stream(width: u32, height: u32, chunks: &[u8]) -> Vec<u8> {
    let mut data = b"qoif".to_vec();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.push(4);
    data.push(0);
    data.extend_from_slice(chunks);
    data.extend_from_slice(&[0, 0, 0, 0]);
    data
}

#[test]
fn rgba_roundtrip_exact() {
    let w = 4;
    let h = 3;
    let mut pixels = vec![0u8; w * h * 4];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * 4;
            pixels[off] = (x * 60) as u8;
            pixels[off + 1] = (y * 80) as u8;
            pixels[off + 2] = 128;
            pixels[off + 3] = if (x + y) % 2 == 0 { 255 } else { 100 };
        }
    }

    let image = Image::from_rgba(w as u32, h as u32, pixels.clone());
    let encoded = encode(&image, Unstoppable).unwrap();
    assert_eq!(&encoded[0..4], b"qoif");

    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.width, w as u32);
    assert_eq!(decoded.height, h as u32);
    assert_eq!(decoded.channels, 4);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn rgb_roundtrip_forces_opaque_alpha() {
    let pixels = vec![
        255, 0, 0, 0, // red, transparent in source
        0, 255, 0, 12, //
        0, 0, 255, 255, //
        9, 9, 9, 200, //
    ];
    let image = Image::from_rgba(2, 2, pixels.clone())
        .with_channels(3)
        .with_color_space(1);
    let encoded = encode(&image, Unstoppable).unwrap();
    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.channels, 3);
    assert_eq!(decoded.color_space, 1);
    for (src, out) in pixels.chunks_exact(4).zip(decoded.pixels().chunks_exact(4)) {
        assert_eq!(&src[..3], &out[..3]);
        assert_eq!(out[3], 255);
    }
}

#[test]
fn first_pixel_near_black_roundtrips() {
    let pixels = vec![0, 0, 0, 255, 1, 1, 1, 255, 0, 0, 0, 255];
    let image = Image::from_rgba(3, 1, pixels.clone());
    let decoded = decode(&encode(&image, Unstoppable).unwrap(), Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn single_pixel_literal_stream() {
    let image = Image::from_rgba(1, 1, vec![10, 20, 30, 40]);
    let encoded = encode(&image, Unstoppable).unwrap();
    assert_eq!(encoded, rgba_stream(1, 1, &[0xff, 10, 20, 30, 40]));

    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &[10, 20, 30, 40]);
}

#[test]
fn solid_row_roundtrip() {
    let pixels = [7u8, 8, 9, 255].repeat(40);
    let image = Image::from_rgba(40, 1, pixels.clone());
    let encoded = encode(&image, Unstoppable).unwrap();
    // header + 4-byte literal + 2-byte run + marker
    assert_eq!(encoded.len(), 14 + 4 + 2 + 4);
    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn index_reuse_decodes_original_color() {
    let a = [10u8, 20, 30, 255];
    let b = [40u8, 50, 60, 255];
    let pixels = [a, b, a].concat();
    let encoded = EncodeRequest::rgba()
        .encode(&pixels, 3, 1, PixelLayout::Rgba8, Unstoppable)
        .unwrap();
    // third pixel is INDEX slot 63
    assert_eq!(encoded[encoded.len() - 5], 63);
    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn hash_collision_re_emits_literal() {
    let a = [10u8, 20, 30, 255];
    let b = [30u8, 20, 10, 255];
    assert_eq!(Color::from(a).hash(), Color::from(b).hash());
    let pixels = [a, b, a].concat();
    let encoded = EncodeRequest::rgba()
        .encode(&pixels, 3, 1, PixelLayout::Rgba8, Unstoppable)
        .unwrap();

    let mut chunks = Vec::new();
    decode_with_events(
        &encoded,
        |event: DecodeEvent| {
            if let DecodeEvent::Chunk(chunk) = event {
                chunks.push(chunk);
            }
        },
        Unstoppable,
    )
    .unwrap();
    assert_eq!(chunks.len(), 3);
    assert!(!matches!(chunks[2], Chunk::Index { .. }));

    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn truncated_stream_repeats_last_color() {
    // COLOR for pixel 1, DIFF_8 (+1, +1, +1) for pixel 2, then nothing
    let data = rgba_stream(4, 1, &[0xfe, 10, 20, 30, 0b1011_1111]);
    let decoded = decode(&data, Unstoppable).unwrap();
    let px = decoded.pixels();
    assert_eq!(&px[0..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..8], &[11, 21, 31, 255]);
    assert_eq!(&px[8..12], &px[4..8]);
    assert_eq!(&px[12..16], &px[4..8]);
}

#[test]
fn header_rejections() {
    assert!(matches!(
        decode(&[0u8; 13], Unstoppable),
        Err(QoiError::ShortInput { len: 13 })
    ));

    let mut data = rgba_stream(1, 1, &[]);
    data[0..4].copy_from_slice(b"qoi ");
    assert!(matches!(
        decode(&data, Unstoppable),
        Err(QoiError::MagicMismatch { .. })
    ));

    for width in [0, 70_000] {
        let image = Image::from_rgba(width, 1, vec![]);
        assert!(matches!(
            encode(&image, Unstoppable),
            Err(QoiError::IllegalWidth(w)) if w == width
        ));
    }

    let image = Image::from_rgba(1, 1, vec![0; 4]).with_color_space(0x10);
    assert!(matches!(
        encode(&image, Unstoppable),
        Err(QoiError::IllegalColorSpace(0x10))
    ));
}

#[test]
fn probe_reads_header_only() {
    let data = rgba_stream(300, 200, &[]);
    let header = probe(&data).unwrap();
    assert_eq!(header.width, 300);
    assert_eq!(header.height, 200);
    assert_eq!(header.channels, Channels::Rgba);
    assert_eq!(header.to_bytes()[..], data[..14]);
}

#[test]
fn event_dump_text() {
    let image = Image::from_rgba(3, 1, vec![10, 20, 30, 255, 10, 20, 30, 255, 9, 21, 30, 255]);
    let encoded = encode(&image, Unstoppable).unwrap();
    let mut lines = Vec::new();
    decode_with_events(&encoded, |event: DecodeEvent| lines.push(event.to_string()), Unstoppable)
        .unwrap();
    assert_eq!(
        lines,
        [
            "HEADER width=3 height=1 channels=4 color_space=0",
            "COLOR r=10 g=20 b=30",
            "RUN_8 len=1",
            "DIFF_8 r=-1 g=1 b=0",
        ]
    );
}

#[test]
fn decode_with_limits() {
    let data = rgba_stream(64, 64, &[]);
    let limits = Limits {
        max_width: Some(32),
        ..Default::default()
    };
    let err = DecodeRequest::new(&data)
        .with_limits(&limits)
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, QoiError::LimitExceeded(_)));
}

struct AlwaysStop;

impl Stop for AlwaysStop {
    fn check(&self) -> Result<(), enough::StopReason> {
        Err(enough::StopReason::Cancelled)
    }
}

#[test]
fn cancellation_stops_encode_and_decode() {
    let image = Image::from_rgba(2, 2, vec![9u8; 16]);
    assert!(matches!(
        encode(&image, AlwaysStop),
        Err(QoiError::Cancelled(enough::StopReason::Cancelled))
    ));

    let encoded = encode(&image, Unstoppable).unwrap();
    assert!(matches!(
        decode(&encoded, AlwaysStop),
        Err(QoiError::Cancelled(enough::StopReason::Cancelled))
    ));
    assert!(matches!(
        decode_with_events(&encoded, NoEvents, AlwaysStop),
        Err(QoiError::Cancelled(_))
    ));
}

#[test]
fn encode_memory_limit_covers_worst_case() {
    let pixels = [1u8, 2, 3, 4, 5, 6, 7, 8];
    // 2 pixels * (4 channels + 1 tag) + header + marker
    let worst_case = 2 * 5 + 14 + 4;
    let tight = Limits {
        max_memory_bytes: Some(worst_case - 1),
        ..Default::default()
    };
    let err = EncodeRequest::rgba()
        .with_limits(&tight)
        .encode(&pixels, 2, 1, PixelLayout::Rgba8, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, QoiError::LimitExceeded(_)));

    let exact = Limits {
        max_memory_bytes: Some(worst_case),
        ..Default::default()
    };
    let encoded = EncodeRequest::rgba()
        .with_limits(&exact)
        .encode(&pixels, 2, 1, PixelLayout::Rgba8, Unstoppable)
        .unwrap();
    assert_eq!(decode(&encoded, Unstoppable).unwrap().pixels(), &pixels[..]);
}

#[test]
fn encode_dimension_limits() {
    let limits = Limits {
        max_pixels: Some(3),
        ..Default::default()
    };
    let err = EncodeRequest::rgba()
        .with_limits(&limits)
        .encode(&[0u8; 16], 2, 2, PixelLayout::Rgba8, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, QoiError::LimitExceeded(_)));
}

#[cfg(feature = "rgb")]
#[test]
fn typed_pixel_view() {
    let image = Image::from_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(
        image.as_pixels(),
        &[rgb::RGBA8::new(1, 2, 3, 4), rgb::RGBA8::new(5, 6, 7, 8)]
    );
}

#[cfg(feature = "imgref")]
#[test]
fn imgref_views_match_pixels() {
    let pixels: Vec<u8> = (1..=24).collect();
    let image = Image::from_rgba(3, 2, pixels);
    let decoded = decode(&encode(&image, Unstoppable).unwrap(), Unstoppable).unwrap();

    let view = decoded.as_imgref();
    assert_eq!(view.width(), 3);
    assert_eq!(view.height(), 2);
    let expected: Vec<rgb::RGBA8> = decoded.as_pixels().to_vec();
    assert_eq!(view.pixels().collect::<Vec<_>>(), expected);
    assert_eq!(view.pixels().nth(4), Some(rgb::RGBA8::new(17, 18, 19, 20)));

    let owned = decoded.to_imgvec();
    assert_eq!(owned.width(), 3);
    assert_eq!(owned.height(), 2);
    assert_eq!(owned.as_ref().pixels().collect::<Vec<_>>(), expected);
}
