#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(width: u32, height: u32, channels: u8) -> Vec<u8> {
    let mut out = b"qoif".to_vec();
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.push(channels);
    out.push(0);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 RGBA literal
    let mut one = header(1, 1, 4);
    one.extend_from_slice(&[0xff, 10, 20, 30, 40, 0, 0, 0, 0]);
    fs::write(format!("{dir}/rgba_1x1.qoi"), one).unwrap();

    // 4x2 RGB: literal, DIFF_8, DIFF_16, DIFF_24, INDEX, RUN_8
    let mut mixed = header(4, 2, 3);
    mixed.extend_from_slice(&[0xfe, 9, 9, 9, 0xbf, 0xd9, 0x7a, 0xe8, 0x42, 0x10, 0x2a, 0x40]);
    mixed.extend_from_slice(&[0, 0, 0, 0]);
    fs::write(format!("{dir}/rgb_4x2_mixed.qoi"), mixed).unwrap();

    // 100x100 solid: one RUN_16 chunk and a truncated tail
    let mut runs = header(100, 100, 4);
    runs.extend_from_slice(&[0x7f, 0xff, 0, 0, 0, 0]);
    fs::write(format!("{dir}/rgba_100x100_runs.qoi"), runs).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"qoif").unwrap();
    fs::write(format!("{dir}/zero_width.bin"), [header(0, 1, 4), vec![0; 4]].concat()).unwrap();
    fs::write(format!("{dir}/bad_colorspace.bin"), {
        let mut h = header(1, 1, 3);
        h[13] = 0x10;
        h.extend_from_slice(&[0; 4]);
        h
    })
    .unwrap();

    println!("Generated seed corpus in {dir}/");
}
