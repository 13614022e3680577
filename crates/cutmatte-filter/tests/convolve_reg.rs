//! Alpha blur and sharpen regression test
//!
//! # Test summary
//! - Blur softens a hard alpha edge into a ramp and keeps RGB
//! - Blur of a uniform alpha is a no-op
//! - Sharpen touches only opaque pixels and alpha stays put
//! - The sharpen kernel has no right-hand tap

use cutmatte_filter::{Kernel, SHARPEN_TAPS, blur_alpha, convolve_opaque_rgb, sharpen};
use cutmatte_test::{RegParams, fixtures};

#[test]
fn convolve_reg() {
    let mut rp = RegParams::new("convolve");

    // --- Test 1: hard alpha edge becomes a ramp ---
    eprintln!("=== Alpha blur ramp ===");
    let half = fixtures::from_fn(20, 5, |x, _| {
        if x < 10 {
            fixtures::INK
        } else {
            fixtures::CLEAR
        }
    });
    let soft = blur_alpha(&half, 2);
    let row: Vec<u8> = (0..20).map(|x| soft.alpha_unchecked(x, 2)).collect();
    rp.compare_values(255.0, row[0] as f64, 0.0);
    rp.compare_values(0.0, row[19] as f64, 0.0);
    rp.compare_values(153.0, row[9] as f64, 0.0);
    rp.compare_values(102.0, row[10] as f64, 0.0);
    rp.compare_values(1.0, row.windows(2).all(|p| p[0] >= p[1]) as u8 as f64, 0.0);
    let rgb_kept = half
        .data()
        .chunks_exact(4)
        .zip(soft.data().chunks_exact(4))
        .all(|(a, b)| a[..3] == b[..3]);
    rp.compare_values(1.0, rgb_kept as u8 as f64, 0.0);
    rp.write_raster(&soft, "blur").expect("write blur output");

    // --- Test 2: uniform alpha is unchanged at any radius ---
    eprintln!("=== Uniform blur ===");
    let opaque = fixtures::color_pattern(12, 9);
    rp.compare_raster(&opaque, &blur_alpha(&opaque, 10));

    // --- Test 3: sharpen leaves transparent pixels alone ---
    eprintln!("=== Sharpen ===");
    let logo = fixtures::from_fn(10, 10, |x, y| {
        if (3..7).contains(&x) && (3..7).contains(&y) {
            [100, 100, 100, 255]
        } else {
            [40, 40, 40, 0]
        }
    });
    let sharp = sharpen(&logo, 2.0);
    rp.compare_values(40.0, sharp.get_rgba_unchecked(0, 0)[0] as f64, 0.0);
    rp.compare_values(0.0, sharp.alpha_unchecked(0, 0) as f64, 0.0);
    rp.compare_values(logo.opaque_count() as f64, sharp.opaque_count() as f64, 0.0);
    // Interior: response = 5*100 - 3*100 = 200, scaled by 0.2
    rp.compare_values(140.0, sharp.get_rgba_unchecked(4, 4)[0] as f64, 0.0);
    // Top-left corner of the square: up and left taps see 40
    rp.compare_values(
        (100.0f64 + (500.0 - 40.0 - 40.0 - 100.0) * 0.2).round(),
        sharp.get_rgba_unchecked(3, 3)[0] as f64,
        0.0,
    );

    // --- Test 4: left and right edges of the square differ ---
    eprintln!("=== Asymmetric sharpen ===");
    // Right edge: the transparent neighbor sits on the zero tap
    rp.compare_values(140.0, sharp.get_rgba_unchecked(6, 4)[0] as f64, 0.0);
    // Left edge: response = 500 - 40 - 100 - 100 = 260, scaled by 0.2
    rp.compare_values(152.0, sharp.get_rgba_unchecked(3, 4)[0] as f64, 0.0);
    let direct = convolve_opaque_rgb(&logo, &Kernel::sharpen(), 0.2);
    rp.compare_raster(&sharp, &direct);
    rp.compare_values(0.0, SHARPEN_TAPS[5] as f64, 0.0);

    assert!(rp.cleanup(), "convolve regression test failed");
}
