//! Alpha morphology regression test
//!
//! # Test summary
//! - Erosion shrinks a rectangle by one ring per pass, symmetrically
//! - Dilation restores a convex rectangle exactly after erosion
//! - Concave shapes lose their inner corner after erode + dilate
//! - erode(N) then dilate(N) never adds opaque pixels (property test)

use cutmatte_morph::{dilate_alpha, erode_alpha};
use cutmatte_test::{RegParams, fixtures};

#[test]
fn alphamorph_reg() {
    let mut rp = RegParams::new("alphamorph");

    // --- Test 1: erosion by ring ---
    eprintln!("=== Erosion ===");
    let block = fixtures::blobs_on_clear(30, 30, &[(5, 5, 20, 12)]);
    for n in 0..4u32 {
        let eroded = erode_alpha(&block, n);
        let expect = (20 - 2 * n) * (12 - 2 * n);
        rp.compare_values(expect as f64, eroded.opaque_count() as f64, 0.0);
    }
    let e2 = erode_alpha(&block, 2);
    // Symmetric shrink: corners of the remaining rectangle
    rp.compare_values(255.0, e2.alpha_unchecked(7, 7) as f64, 0.0);
    rp.compare_values(255.0, e2.alpha_unchecked(22, 14) as f64, 0.0);
    rp.compare_values(0.0, e2.alpha_unchecked(6, 7) as f64, 0.0);
    rp.compare_values(0.0, e2.alpha_unchecked(23, 14) as f64, 0.0);
    rp.write_raster(&e2, "eroded").expect("write eroded output");

    // --- Test 2: dilation of a rectangle ---
    eprintln!("=== Dilation ===");
    let grown = dilate_alpha(&e2, 2);
    rp.compare_raster(&block, &grown);

    // --- Test 3: concave L shape does not fully recover ---
    eprintln!("=== Concave shape ===");
    let l_shape = fixtures::blobs_on_clear(30, 30, &[(5, 5, 6, 20), (5, 19, 20, 6)]);
    let opened = dilate_alpha(&erode_alpha(&l_shape, 2), 2);
    rp.compare_values(
        1.0,
        (opened.opaque_count() <= l_shape.opaque_count()) as u8 as f64,
        0.0,
    );
    rp.write_raster(&opened, "opened_l").expect("write opened output");

    // --- Test 4: thin lines vanish under erosion ---
    eprintln!("=== Thin line removal ===");
    let line = fixtures::blobs_on_clear(20, 9, &[(2, 4, 16, 1)]);
    rp.compare_values(0.0, erode_alpha(&line, 1).opaque_count() as f64, 0.0);
    rp.compare_values(0.0, dilate_alpha(&erode_alpha(&line, 1), 1).opaque_count() as f64, 0.0);

    assert!(rp.cleanup(), "alphamorph regression test failed");
}

mod prop {
    use cutmatte_core::Raster;
    use cutmatte_morph::{dilate_alpha, erode_alpha};
    use proptest::prelude::*;

    fn mask_strategy() -> impl Strategy<Value = Raster> {
        (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<bool>(), (w * h) as usize).prop_map(move |bits| {
                let data = bits
                    .iter()
                    .flat_map(|&on| if on { [0, 0, 0, 255] } else { [255, 255, 255, 0] })
                    .collect();
                Raster::from_rgba(w, h, data).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn erode_then_dilate_never_grows(raster in mask_strategy(), n in 0u32..4) {
            let opened = dilate_alpha(&erode_alpha(&raster, n), n);
            prop_assert!(opened.opaque_count() <= raster.opaque_count());
        }

        #[test]
        fn erosion_never_grows(raster in mask_strategy(), n in 0u32..4) {
            prop_assert!(erode_alpha(&raster, n).opaque_count() <= raster.opaque_count());
        }
    }
}
