use super::*;

fn px(v: u8) -> [u8; 4] {
    [v, v, v, 255]
}

#[test]
fn runs_and_literals_encode_as_expected() {
    let mut raw = Vec::new();
    for _ in 0..5 {
        raw.extend_from_slice(&px(1));
    }
    raw.extend_from_slice(&px(2));
    raw.extend_from_slice(&px(3));

    let packed = compress(&raw).unwrap();
    assert_eq!(packed[0], 0x80 | 2);
    assert_eq!(&packed[1..5], &px(1));
    assert_eq!(packed[5], 1);
    assert_eq!(&packed[6..10], &px(2));
    assert_eq!(&packed[10..14], &px(3));
    assert_eq!(packed.len(), 14);

    assert_eq!(uncompress(&packed).unwrap(), raw);
}

#[test]
fn long_runs_split_at_130_pixels() {
    let raw: Vec<u8> = (0..300).flat_map(|_| px(9)).collect();
    let packed = compress(&raw).unwrap();
    assert_eq!(packed[0], 0xFF);
    assert_eq!(uncompress(&packed).unwrap(), raw);
}

#[test]
fn long_literal_spans_split_at_128_pixels() {
    let raw: Vec<u8> = (0..200u32).flat_map(|i| (i as u8).to_le_bytes().repeat(4)).collect();
    let packed = compress(&raw).unwrap();
    assert_eq!(packed[0], 127);
    assert_eq!(packed[1 + 128 * 4], 71);
    assert_eq!(uncompress(&packed).unwrap(), raw);
}

#[test]
fn pairs_stay_literal() {
    let mut raw = Vec::new();
    raw.extend_from_slice(&px(4));
    raw.extend_from_slice(&px(4));
    let packed = compress(&raw).unwrap();
    assert_eq!(packed[0], 1);
    assert_eq!(packed.len(), 9);
}

#[test]
fn empty_input_is_empty_stream() {
    assert!(compress(&[]).unwrap().is_empty());
    assert!(uncompress(&[]).unwrap().is_empty());
}

#[test]
fn unaligned_input_is_rejected() {
    assert!(matches!(compress(&[1, 2, 3]), Err(PsbError::Codec(_))));
}

#[test]
fn truncated_stream_is_rejected() {
    assert!(matches!(uncompress(&[0x80, 1, 2]), Err(PsbError::Codec(_))));
    assert!(matches!(uncompress(&[1, 0, 0, 0, 0]), Err(PsbError::Codec(_))));
}
