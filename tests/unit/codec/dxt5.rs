use super::*;

// Colour endpoints white/black, alpha endpoints 255/0, all indices zero.
fn solid_white_block() -> [u8; 16] {
    [
        255, 0, 0, 0, 0, 0, 0, 0, // alpha
        0xFF, 0xFF, 0x00, 0x00, 0, 0, 0, 0, // colour
    ]
}

#[test]
fn solid_block_decodes_to_opaque_white() {
    let img = decode(&solid_white_block(), 4, 4).unwrap();
    assert_eq!(img.dimensions(), (4, 4));
    for p in img.pixels() {
        assert_eq!(p.0, [255, 255, 255, 255]);
    }
}

#[test]
fn color_indices_select_interpolated_entries() {
    let mut block = solid_white_block();
    // texel 0 -> c1 (black), texel 1 -> 2/3 white, texel 2 -> 1/3 white
    block[12] = 0b00_11_10_01;
    let img = decode(&block, 4, 4).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [170, 170, 170, 255]);
    assert_eq!(img.get_pixel(2, 0).0, [85, 85, 85, 255]);
    assert_eq!(img.get_pixel(3, 0).0, [255, 255, 255, 255]);
}

#[test]
fn alpha_six_step_mode_has_explicit_extremes() {
    let mut block = solid_white_block();
    block[0] = 10;
    block[1] = 200;
    // texel 0 -> index 6 (0), texel 1 -> index 7 (255)
    let bits: u64 = 6 | (7 << 3);
    block[2..8].copy_from_slice(&bits.to_le_bytes()[..6]);
    let img = decode(&block, 4, 4).unwrap();
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(1, 0).0[3], 255);
    assert_eq!(img.get_pixel(2, 0).0[3], 10);
}

#[test]
fn partial_blocks_are_clipped() {
    let mut data = Vec::new();
    data.extend_from_slice(&solid_white_block());
    data.extend_from_slice(&solid_white_block());
    let img = decode(&data, 5, 3).unwrap();
    assert_eq!(img.dimensions(), (5, 3));
    assert_eq!(img.get_pixel(4, 2).0, [255, 255, 255, 255]);
}

#[test]
fn short_payload_is_codec_error() {
    assert!(matches!(decode(&[0; 15], 4, 4), Err(PsbError::Codec(_))));
    assert!(matches!(decode(&[0; 16], 8, 4), Err(PsbError::Codec(_))));
}

#[test]
fn oversized_or_empty_dimensions_are_codec_errors() {
    assert!(matches!(decode(&[0; 16], u32::MAX, u32::MAX), Err(PsbError::Codec(_))));
    assert!(matches!(decode(&[0; 16], 0, 0), Err(PsbError::Codec(_))));
    assert_eq!(decode(&[], 0, 0).unwrap().dimensions(), (0, 0));
}
