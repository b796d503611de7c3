//! Raw pixel layouts: RGBA8 and RGBA4444 in both the win and common byte orders.

use image::RgbaImage;

use crate::{
    codec::{dxt5, rl},
    foundation::error::{PsbError, PsbResult},
    foundation::platform::{CompressKind, PixelFormat},
};

/// Decode an uncompressed payload of `format` into straight RGBA8 pixels.
///
/// The payload length must match the dimensions exactly; nothing is dropped or padded.
pub fn decode_pixels(
    data: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> PsbResult<RgbaImage> {
    if format == PixelFormat::Dxt5 {
        return dxt5::decode(data, width, height);
    }

    if format == PixelFormat::None {
        return Err(PsbError::codec(format!("cannot decode pixel format {format:?}")));
    }
    let needed = format.byte_len(width, height).ok_or_else(|| {
        PsbError::codec(format!("{format:?} {width}x{height} exceeds addressable memory"))
    })?;
    if data.len() != needed {
        return Err(PsbError::codec(format!(
            "{format:?} payload has {} bytes, {width}x{height} needs exactly {needed}",
            data.len()
        )));
    }

    let rgba: Vec<u8> = match format {
        PixelFormat::CommonRgba8 => data.to_vec(),
        PixelFormat::WinRgba8 => {
            let mut v = data.to_vec();
            swap_red_blue(&mut v);
            v
        }
        PixelFormat::CommonRgba4444 => data
            .chunks_exact(2)
            .flat_map(|c| {
                let v = u16::from_le_bytes([c[0], c[1]]);
                [nib(v >> 12), nib(v >> 8), nib(v >> 4), nib(v)]
            })
            .collect(),
        PixelFormat::WinRgba4444 => data
            .chunks_exact(2)
            .flat_map(|c| {
                let v = u16::from_le_bytes([c[0], c[1]]);
                [nib(v >> 8), nib(v >> 4), nib(v), nib(v >> 12)]
            })
            .collect(),
        PixelFormat::None | PixelFormat::Dxt5 => {
            return Err(PsbError::codec(format!("cannot decode pixel format {format:?}")));
        }
    };

    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| PsbError::codec("decoded pixel buffer does not match dimensions"))
}

/// Encode straight RGBA8 pixels into `format`.
pub fn encode_pixels(img: &RgbaImage, format: PixelFormat) -> PsbResult<Vec<u8>> {
    let raw = img.as_raw();
    match format {
        PixelFormat::CommonRgba8 => Ok(raw.clone()),
        PixelFormat::WinRgba8 => {
            let mut v = raw.clone();
            swap_red_blue(&mut v);
            Ok(v)
        }
        PixelFormat::CommonRgba4444 => Ok(raw
            .chunks_exact(4)
            .flat_map(|p| pack4(p[0], p[1], p[2], p[3]).to_le_bytes())
            .collect()),
        PixelFormat::WinRgba4444 => Ok(raw
            .chunks_exact(4)
            .flat_map(|p| pack4(p[3], p[0], p[1], p[2]).to_le_bytes())
            .collect()),
        PixelFormat::Dxt5 | PixelFormat::None => Err(PsbError::codec(format!(
            "encoding to {format:?} is not supported"
        ))),
    }
}

/// Encode `img` into `format`, then run-length compress when `compress` asks for it.
pub fn encode_image(
    img: &RgbaImage,
    format: PixelFormat,
    compress: CompressKind,
) -> PsbResult<Vec<u8>> {
    let bytes = encode_pixels(img, format)?;
    match compress {
        CompressKind::None => Ok(bytes),
        CompressKind::RunLength => rl::compress(&bytes),
    }
}

/// Swap the first and third byte of every 4-byte pixel (RGBA <-> BGRA). Applying it twice is a
/// no-op; a trailing partial pixel is left untouched.
pub fn swap_red_blue(bytes: &mut [u8]) {
    for px in bytes.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

fn nib(v: u16) -> u8 {
    let n = (v & 0xF) as u8;
    (n << 4) | n
}

fn pack4(a: u8, b: u8, c: u8, d: u8) -> u16 {
    let hi = |x: u8| u16::from(x >> 4);
    (hi(a) << 12) | (hi(b) << 8) | (hi(c) << 4) | hi(d)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/pixel.rs"]
mod tests;
