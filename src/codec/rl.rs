//! Run-length scheme used by PSB pixel payloads.
//!
//! The stream is a sequence of packets over 4-byte pixels. A control byte with the high bit set
//! repeats the following pixel `(ctrl & 0x7F) + 3` times; otherwise `ctrl + 1` literal pixels
//! follow.

use crate::foundation::error::{PsbError, PsbResult};

const ALIGN: usize = 4;
const RUN_FLAG: u8 = 0x80;
const MIN_RUN: usize = 3;
const MAX_RUN: usize = 0x7F + MIN_RUN;
const MAX_LITERAL: usize = 0x80;

/// Compress `input`, whose length must be a multiple of 4.
pub fn compress(input: &[u8]) -> PsbResult<Vec<u8>> {
    if input.len() % ALIGN != 0 {
        return Err(PsbError::codec(format!(
            "run-length input length {} is not a multiple of {ALIGN}",
            input.len()
        )));
    }

    let pixels: Vec<&[u8]> = input.chunks_exact(ALIGN).collect();
    let mut out = Vec::with_capacity(input.len() / 2);
    let mut literal_start = 0usize;
    let mut i = 0usize;

    while i < pixels.len() {
        let mut run = 1;
        while i + run < pixels.len() && run < MAX_RUN && pixels[i + run] == pixels[i] {
            run += 1;
        }

        if run >= MIN_RUN {
            flush_literals(&mut out, &pixels[literal_start..i]);
            out.push(RUN_FLAG | (run - MIN_RUN) as u8);
            out.extend_from_slice(pixels[i]);
            i += run;
            literal_start = i;
        } else {
            i += 1;
        }
    }
    flush_literals(&mut out, &pixels[literal_start..]);

    Ok(out)
}

fn flush_literals(out: &mut Vec<u8>, pixels: &[&[u8]]) {
    for chunk in pixels.chunks(MAX_LITERAL) {
        out.push((chunk.len() - 1) as u8);
        for px in chunk {
            out.extend_from_slice(px);
        }
    }
}

/// Expand a run-length stream back to raw bytes.
pub fn uncompress(input: &[u8]) -> PsbResult<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len() * 2);
    let mut pos = 0usize;

    while pos < input.len() {
        let ctrl = input[pos];
        pos += 1;

        if ctrl & RUN_FLAG != 0 {
            let count = (ctrl & !RUN_FLAG) as usize + MIN_RUN;
            let px = input
                .get(pos..pos + ALIGN)
                .ok_or_else(|| truncated(pos))?;
            for _ in 0..count {
                out.extend_from_slice(px);
            }
            pos += ALIGN;
        } else {
            let len = (ctrl as usize + 1) * ALIGN;
            let bytes = input.get(pos..pos + len).ok_or_else(|| truncated(pos))?;
            out.extend_from_slice(bytes);
            pos += len;
        }
    }

    Ok(out)
}

fn truncated(pos: usize) -> PsbError {
    PsbError::codec(format!("run-length stream truncated at byte {pos}"))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/rl.rs"]
mod tests;
