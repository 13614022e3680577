//! Matting regression test
//!
//! # Test summary
//! - All-white 4x4 through ColorRange(200) and ColorRange(255) stays opaque
//! - Dark ink on white: ColorRange cuts the ink, keeps the background
//! - BlendIf produces a soft ramp on a gradient
//! - Channels posterizes to opaque black / transparent white
//! - Monotonicity of BlendIf `min` and ColorRange `threshold` (property tests)

use cutmatte_color::{apply_matting, blend_if, channels, color_range};
use cutmatte_core::MattingMethod;
use cutmatte_test::{RegParams, fixtures};

#[test]
fn matte_reg() {
    let mut rp = RegParams::new("matte");

    // --- Test 1: white image, threshold 200 ---
    eprintln!("=== ColorRange on white, threshold 200 ===");
    let white = fixtures::solid(4, 4, fixtures::WHITE);
    let out = apply_matting(&white, &MattingMethod::ColorRange { threshold: 200 });
    rp.compare_values(16.0, out.opaque_count() as f64, 0.0);
    let all_full = out.data().chunks_exact(4).all(|px| px[3] == 255);
    rp.compare_values(1.0, all_full as u8 as f64, 0.0);

    // --- Test 2: white image, threshold 255 (top of range) ---
    eprintln!("=== ColorRange on white, threshold 255 ===");
    let out = apply_matting(&white, &MattingMethod::ColorRange { threshold: 255 });
    rp.compare_raster(&white, &out);

    // --- Test 3: ink on white ---
    eprintln!("=== ColorRange on ink ===");
    let logo = fixtures::ink_on_white(30, 20, &[(5, 5, 10, 6)]);
    let cut = color_range(&logo, 128);
    rp.compare_values((30 * 20 - 60) as f64, cut.opaque_count() as f64, 0.0);
    rp.compare_values(0.0, cut.alpha_unchecked(7, 7) as f64, 0.0);
    rp.write_raster(&cut, "color_range").expect("write color range output");

    // --- Test 4: blend-if ramp on a gradient ---
    eprintln!("=== BlendIf ramp ===");
    let ramp = fixtures::gradient(256, 2);
    let soft = blend_if(&ramp, 64, 192);
    rp.compare_values(0.0, soft.alpha_unchecked(63, 0) as f64, 0.0);
    rp.compare_values(0.0, soft.alpha_unchecked(64, 0) as f64, 0.0);
    rp.compare_values(128.0, soft.alpha_unchecked(128, 0) as f64, 0.0);
    rp.compare_values(255.0, soft.alpha_unchecked(192, 0) as f64, 0.0);
    let alphas: Vec<u8> = (0..256).map(|x| soft.alpha_unchecked(x, 0)).collect();
    rp.compare_values(1.0, alphas.windows(2).all(|p| p[0] <= p[1]) as u8 as f64, 0.0);
    rp.write_raster(&soft, "blend_if").expect("write blend-if output");

    // --- Test 5: channels posterizes ---
    eprintln!("=== Channels ===");
    let poster = channels(&ramp, 0, 255);
    let binary = poster.data().chunks_exact(4).all(|px| {
        px == [0, 0, 0, 255] || px == [255, 255, 255, 0]
    });
    rp.compare_values(1.0, binary as u8 as f64, 0.0);
    rp.compare_values(128.0 * 2.0, poster.opaque_count() as f64, 0.0);

    assert!(rp.cleanup(), "matte regression test failed");
}

mod prop {
    use cutmatte_color::{blend_if, color_range};
    use cutmatte_core::Raster;
    use proptest::prelude::*;

    fn raster_strategy() -> impl Strategy<Value = Raster> {
        (1u32..8, 1u32..8).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>(), (w * h * 4) as usize)
                .prop_map(move |data| Raster::from_rgba(w, h, data).unwrap())
        })
    }

    proptest! {
        #[test]
        fn blend_if_min_never_raises_alpha(
            raster in raster_strategy(),
            lo in any::<u8>(),
            step in any::<u8>(),
            max in any::<u8>(),
        ) {
            let hi = lo.saturating_add(step);
            let a = blend_if(&raster, lo, max);
            let b = blend_if(&raster, hi, max);
            for (pa, pb) in a.data().chunks_exact(4).zip(b.data().chunks_exact(4)) {
                prop_assert!(pb[3] <= pa[3]);
            }
        }

        #[test]
        fn color_range_threshold_never_adds_opaque(
            raster in raster_strategy(),
            lo in any::<u8>(),
            step in any::<u8>(),
        ) {
            let hi = lo.saturating_add(step);
            prop_assert!(
                color_range(&raster, hi).opaque_count() <= color_range(&raster, lo).opaque_count()
            );
        }
    }
}
