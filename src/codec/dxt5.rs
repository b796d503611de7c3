//! BC3 (DXT5) decoding.
//!
//! Each 4x4 block is 16 bytes: 8 bytes of interpolated alpha (two endpoints plus 3-bit indices)
//! followed by 8 bytes of colour (two RGB565 endpoints plus 2-bit indices, always 4-colour mode).

use image::{Rgba, RgbaImage};

use crate::foundation::{
    error::{PsbError, PsbResult},
    platform::PixelFormat,
};

const BLOCK_BYTES: usize = 16;

/// Decode a DXT5 payload into straight RGBA8 pixels.
///
/// Dimensions that are not multiples of 4 are handled by clipping the edge blocks.
pub fn decode(data: &[u8], width: u32, height: u32) -> PsbResult<RgbaImage> {
    if (width == 0 || height == 0) && !data.is_empty() {
        return Err(PsbError::codec(format!(
            "DXT5 payload has {} bytes but the image is {width}x{height}",
            data.len()
        )));
    }
    let blocks_x = width.div_ceil(4) as usize;
    let blocks_y = height.div_ceil(4) as usize;
    let needed = PixelFormat::Dxt5.byte_len(width, height).ok_or_else(|| {
        PsbError::codec(format!("DXT5 {width}x{height} exceeds addressable memory"))
    })?;
    if data.len() < needed {
        return Err(PsbError::codec(format!(
            "DXT5 payload has {} bytes, {width}x{height} needs {needed}",
            data.len()
        )));
    }

    let mut img = RgbaImage::new(width, height);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let offset = (by * blocks_x + bx) * BLOCK_BYTES;
            let block = decode_block(&data[offset..offset + BLOCK_BYTES]);
            for (i, texel) in block.iter().enumerate() {
                let x = (bx * 4 + i % 4) as u32;
                let y = (by * 4 + i / 4) as u32;
                if x < width && y < height {
                    img.put_pixel(x, y, Rgba(*texel));
                }
            }
        }
    }
    Ok(img)
}

fn decode_block(block: &[u8]) -> [[u8; 4]; 16] {
    let alpha = alpha_palette(block[0], block[1]);
    let alpha_bits = u64::from_le_bytes([
        block[2], block[3], block[4], block[5], block[6], block[7], 0, 0,
    ]);

    let c0 = expand_565(u16::from_le_bytes([block[8], block[9]]));
    let c1 = expand_565(u16::from_le_bytes([block[10], block[11]]));
    let colors = [
        c0,
        c1,
        mix_third(c0, c1),
        mix_third(c1, c0),
    ];
    let color_bits = u32::from_le_bytes([block[12], block[13], block[14], block[15]]);

    let mut out = [[0u8; 4]; 16];
    for (i, texel) in out.iter_mut().enumerate() {
        let [r, g, b] = colors[((color_bits >> (2 * i)) & 0b11) as usize];
        let a = alpha[((alpha_bits >> (3 * i)) & 0b111) as usize];
        *texel = [r, g, b, a];
    }
    out
}

fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a0w, a1w) = (a0 as u16, a1 as u16);
    let mut p = [a0, a1, 0, 0, 0, 0, 0, 0];
    if a0 > a1 {
        for k in 1..7u16 {
            p[k as usize + 1] = (((7 - k) * a0w + k * a1w) / 7) as u8;
        }
    } else {
        for k in 1..5u16 {
            p[k as usize + 1] = (((5 - k) * a0w + k * a1w) / 5) as u8;
        }
        p[6] = 0;
        p[7] = 255;
    }
    p
}

fn expand_565(c: u16) -> [u8; 3] {
    let r = ((c >> 11) & 0x1F) as u8;
    let g = ((c >> 5) & 0x3F) as u8;
    let b = (c & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

// (2a + b) / 3
fn mix_third(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    let f = |x: u8, y: u8| ((2 * x as u32 + y as u32) / 3) as u8;
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2])]
}

#[cfg(test)]
#[path = "../../tests/unit/codec/dxt5.rs"]
mod tests;
