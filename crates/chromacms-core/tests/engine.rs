//! End-to-end scenarios: parse, build, execute, cache

use std::sync::Arc;

use chromacms_core::{
    synth, transform, transform_parallel, PixelFormat, Profile, Registry, RenderingIntent,
};

fn srgb_pipeline(
    registry: &Registry,
) -> (Arc<Profile>, Arc<chromacms_core::Pipeline>) {
    let profile = registry.get_or_parse(&synth::srgb()).unwrap();
    let pipeline = registry
        .get_or_build(&profile, &profile, RenderingIntent::RelativeColorimetric)
        .unwrap();
    (profile, pipeline)
}

#[test]
fn srgb_to_itself_is_identity_within_one_step() {
    let registry = Registry::new(4);
    let (_, pipeline) = srgb_pipeline(&registry);

    // 2x2 RGBA image with distinct corner colors
    let src: [u8; 16] = [
        255, 0, 0, 255, // red, opaque
        0, 255, 0, 128, // green, half alpha
        0, 0, 255, 0, // blue, transparent
        64, 128, 192, 200, // mixed
    ];
    let mut dst = [0u8; 16];
    transform(
        &pipeline,
        PixelFormat::RGBA_8,
        &src,
        PixelFormat::RGBA_8,
        &mut dst,
        4,
    )
    .unwrap();

    for (i, (&got, &want)) in dst.iter().zip(&src).enumerate() {
        let delta = (got as i16 - want as i16).abs();
        if (i + 1) % 4 == 0 {
            // Alpha must survive bit-exact
            assert_eq!(got, want, "alpha changed at sample {}", i);
        } else {
            assert!(delta <= 1, "sample {}: {} vs {}", i, got, want);
        }
    }
}

#[test]
fn srgb_to_linear_p3_preserves_neutrals() {
    let registry = Registry::new(4);
    let src = registry.get_or_parse(&synth::srgb()).unwrap();
    let dst = registry.get_or_parse(&synth::linear_display_p3()).unwrap();
    let pipeline = registry
        .get_or_build(&src, &dst, RenderingIntent::RelativeColorimetric)
        .unwrap();

    let pixels: [u8; 12] = [
        255, 255, 255, // white
        0, 0, 0, // black
        255, 0, 0, // red
        0, 0, 255, // blue
    ];
    let mut out = [0u8; 12];
    transform(
        &pipeline,
        PixelFormat::RGB_8,
        &pixels,
        PixelFormat::RGB_8,
        &mut out,
        4,
    )
    .unwrap();

    // White and black map to themselves
    for c in 0..3 {
        assert!(out[c] >= 253, "white drifted: {:?}", &out[..3]);
        assert!(out[3 + c] <= 1, "black drifted: {:?}", &out[3..6]);
    }
    // sRGB red sits inside P3, with red dominant
    assert!(out[6] > out[7] && out[6] > out[8], "red: {:?}", &out[6..9]);
    // sRGB blue maps mostly to P3 blue
    assert!(out[11] > out[9] && out[11] > out[10], "blue: {:?}", &out[9..12]);
}

#[test]
fn float_inputs_saturate_on_integer_repack() {
    let registry = Registry::new(4);
    let (_, pipeline) = srgb_pipeline(&registry);

    let floats = [1.2f32, -0.3, 0.5, 2.0, 1.0, 0.0];
    let src: Vec<u8> = floats.iter().flat_map(|v| v.to_ne_bytes()).collect();
    let mut dst = [0u8; 6];
    transform(
        &pipeline,
        PixelFormat::RGB_F32,
        &src,
        PixelFormat::RGB_8,
        &mut dst,
        2,
    )
    .unwrap();

    assert_eq!(dst[0], 255);
    assert_eq!(dst[1], 0);
    assert_eq!(dst[3], 255);
    assert_eq!(dst[4], 255);
    assert_eq!(dst[5], 0);
}

#[test]
fn gray_image_expands_to_neutral_rgb() {
    let registry = Registry::new(4);
    let gray = registry.get_or_parse(&synth::gray(2.2)).unwrap();
    let srgb = registry.get_or_parse(&synth::srgb()).unwrap();
    let pipeline = registry
        .get_or_build(&gray, &srgb, RenderingIntent::RelativeColorimetric)
        .unwrap();

    let src: [u8; 4] = [0, 85, 170, 255];
    let mut dst = [0u8; 12];
    transform(
        &pipeline,
        PixelFormat::GRAY_8,
        &src,
        PixelFormat::RGB_8,
        &mut dst,
        4,
    )
    .unwrap();

    for px in 0..4 {
        let rgb = &dst[px * 3..px * 3 + 3];
        // Neutral axis: all three channels within a step of each other
        assert!(
            rgb.iter().max().unwrap() - rgb.iter().min().unwrap() <= 1,
            "pixel {} not neutral: {:?}",
            px,
            rgb
        );
    }
    assert_eq!(&dst[0..3], &[0, 0, 0]);
    assert!(dst[9] >= 254, "white drifted: {:?}", &dst[9..12]);
}

#[test]
fn registry_reuses_and_survives_eviction() {
    let registry = Registry::new(1);
    let srgb_bytes = synth::srgb();
    let p3_bytes = synth::linear_display_p3();

    let first = registry.get_or_parse(&srgb_bytes).unwrap();
    let pipeline = registry
        .get_or_build(&first, &first, RenderingIntent::RelativeColorimetric)
        .unwrap();

    // Filling the one-slot cache evicts the sRGB profile
    registry.get_or_parse(&p3_bytes).unwrap();
    assert_eq!(registry.profile_count(), 1);

    // The evicted Arc and its pipeline remain fully usable
    let src = [10u8, 20, 30];
    let mut out = [0u8; 3];
    transform(
        &pipeline,
        PixelFormat::RGB_8,
        &src,
        PixelFormat::RGB_8,
        &mut out,
        1,
    )
    .unwrap();
    assert_eq!(first.color_space(), chromacms_core::ColorSpace::Rgb);

    // Re-requesting the same bytes parses a fresh instance with the
    // same content hash
    let again = registry.get_or_parse(&srgb_bytes).unwrap();
    assert_eq!(again.id(), first.id());
    assert!(!Arc::ptr_eq(&again, &first));
}

#[test]
fn parallel_transform_matches_serial_on_large_buffer() {
    let registry = Registry::new(4);
    let src_profile = registry.get_or_parse(&synth::srgb()).unwrap();
    let dst_profile = registry.get_or_parse(&synth::linear_display_p3()).unwrap();
    let pipeline = registry
        .get_or_build(
            &src_profile,
            &dst_profile,
            RenderingIntent::RelativeColorimetric,
        )
        .unwrap();

    let pixels = 50_000;
    let src: Vec<u8> = (0..pixels * 4)
        .map(|i: usize| (i.wrapping_mul(2654435761usize) >> 13) as u8)
        .collect();

    let mut serial = vec![0u8; pixels * 4];
    let mut parallel = vec![0u8; pixels * 4];
    transform(
        &pipeline,
        PixelFormat::RGBA_8,
        &src,
        PixelFormat::RGBA_8,
        &mut serial,
        pixels,
    )
    .unwrap();
    transform_parallel(
        &pipeline,
        PixelFormat::RGBA_8,
        &src,
        PixelFormat::RGBA_8,
        &mut parallel,
        pixels,
    )
    .unwrap();
    assert_eq!(serial, parallel);
}

/// Assemble a display profile whose A2B0/B2A0 are identity mft2 LUTs,
/// exercising the LUT builder path end to end.
mod lut_profiles {
    use super::*;

    fn identity_mft2(grid: u8) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"mft2");
        data.extend_from_slice(&[0; 4]);
        data.push(3);
        data.push(3);
        data.push(grid);
        data.push(0);
        for r in 0..3 {
            for c in 0..3 {
                let v = if r == c { 0x0001_0000i32 } else { 0 };
                data.extend_from_slice(&v.to_be_bytes());
            }
        }
        data.extend_from_slice(&2u16.to_be_bytes());
        data.extend_from_slice(&2u16.to_be_bytes());
        for _ in 0..3 {
            data.extend_from_slice(&0u16.to_be_bytes());
            data.extend_from_slice(&65535u16.to_be_bytes());
        }
        let g = grid as usize;
        for a in 0..g {
            for b in 0..g {
                for c in 0..g {
                    for node in [a, b, c] {
                        let v = (node as f64 / (g - 1) as f64 * 65535.0).round() as u16;
                        data.extend_from_slice(&v.to_be_bytes());
                    }
                }
            }
        }
        for _ in 0..3 {
            data.extend_from_slice(&0u16.to_be_bytes());
            data.extend_from_slice(&65535u16.to_be_bytes());
        }
        data
    }

    fn lut_profile() -> Vec<u8> {
        let tags: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"wtpt", {
                let mut b = Vec::new();
                b.extend_from_slice(b"XYZ ");
                b.extend_from_slice(&[0; 4]);
                b.extend_from_slice(&0x0000F6D6u32.to_be_bytes());
                b.extend_from_slice(&0x00010000u32.to_be_bytes());
                b.extend_from_slice(&0x0000D32Du32.to_be_bytes());
                b
            }),
            (*b"A2B0", identity_mft2(5)),
            (*b"B2A0", identity_mft2(5)),
        ];

        let table_end = 132 + tags.len() * 12;
        let mut bodies = Vec::new();
        let mut offsets = Vec::new();
        let mut pos = table_end;
        for (_, body) in &tags {
            offsets.push(pos as u32);
            bodies.extend_from_slice(body);
            let padded = body.len().div_ceil(4) * 4;
            bodies.resize(bodies.len() + padded - body.len(), 0);
            pos += padded;
        }

        let total = table_end + bodies.len();
        let mut data = vec![0u8; table_end];
        data[0..4].copy_from_slice(&(total as u32).to_be_bytes());
        data[8..12].copy_from_slice(&0x04300000u32.to_be_bytes());
        data[12..16].copy_from_slice(b"mntr");
        data[16..20].copy_from_slice(b"RGB ");
        data[20..24].copy_from_slice(b"XYZ ");
        data[36..40].copy_from_slice(b"acsp");
        data[64..68].copy_from_slice(&0u32.to_be_bytes());
        data[68..72].copy_from_slice(&0x0000F6D6u32.to_be_bytes());
        data[72..76].copy_from_slice(&0x00010000u32.to_be_bytes());
        data[76..80].copy_from_slice(&0x0000D32Du32.to_be_bytes());
        data[128..132].copy_from_slice(&(tags.len() as u32).to_be_bytes());
        for (i, ((sig, body), offset)) in tags.iter().zip(&offsets).enumerate() {
            let base = 132 + i * 12;
            data[base..base + 4].copy_from_slice(sig);
            data[base + 4..base + 8].copy_from_slice(&offset.to_be_bytes());
            data[base + 8..base + 12].copy_from_slice(&(body.len() as u32).to_be_bytes());
        }
        data.extend_from_slice(&bodies);
        data
    }

    #[test]
    fn lut_profile_roundtrip_is_identity() {
        let registry = Registry::new(4);
        let profile = registry.get_or_parse(&lut_profile()).unwrap();
        assert!(profile.warnings().is_empty());

        let pipeline = registry
            .get_or_build(&profile, &profile, RenderingIntent::Perceptual)
            .unwrap();

        // Grid nodes of a 5-point CLUT land on multiples of 1/4, and
        // 8-bit values 0, 64ish, 128ish fall near them; check a spread
        // of values stays within one 8-bit step.
        let src: [u8; 12] = [0, 64, 128, 255, 32, 96, 160, 224, 10, 200, 5, 250];
        let mut dst = [0u8; 12];
        transform(
            &pipeline,
            PixelFormat::RGB_8,
            &src,
            PixelFormat::RGB_8,
            &mut dst,
            4,
        )
        .unwrap();
        for (i, (&got, &want)) in dst.iter().zip(&src).enumerate() {
            let delta = (got as i16 - want as i16).abs();
            assert!(delta <= 1, "sample {}: {} vs {}", i, got, want);
        }
    }

    #[test]
    fn lut_profile_exact_at_grid_nodes() {
        let registry = Registry::new(4);
        let profile = registry.get_or_parse(&lut_profile()).unwrap();
        let pipeline = registry
            .get_or_build(&profile, &profile, RenderingIntent::Perceptual)
            .unwrap();

        // 0.0, 0.25, 0.5, 0.75, 1.0 are exact nodes of the 5-grid
        let mut out = [0.0f64; 3];
        for v in [0.0, 0.25, 0.5, 0.75, 1.0] {
            pipeline.eval(&[v, v, v], &mut out);
            for c in 0..3 {
                assert!(
                    (out[c] - v).abs() < 1e-4,
                    "node {} drifted to {:?}",
                    v,
                    out
                );
            }
        }
    }
}
