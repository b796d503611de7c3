//! Texture atlas decoding and per-icon splitting.

use image::RgbaImage;
use indexmap::IndexMap;

use crate::{
    codec::{pixel, rl},
    document::node::{NodeId, Value},
    document::tree::Document,
    foundation::error::{PsbError, PsbResult},
    foundation::platform::{CompressKind, PixelFormat, Platform},
};

/// Decode the `"texture"` atlas of a texture group.
///
/// The texture mapping carries `pixel` (resource), `width`, `height`, and optionally `type` and
/// `compress`. `platform` decides how the `type` tag is interpreted.
pub fn decode_texture(doc: &Document, group: NodeId, platform: Platform) -> PsbResult<RgbaImage> {
    let texture = doc.child(group, "texture")?;
    let width = dimension(doc, texture, "width")?;
    let height = dimension(doc, texture, "height")?;
    let format = doc
        .text(texture, "type")
        .map(|t| PixelFormat::from_psb(t, platform))
        .unwrap_or_else(|| platform.default_pixel_format());
    let compress = doc
        .text(texture, "compress")
        .map(CompressKind::from_psb)
        .unwrap_or_default();

    let pixel_node = doc.child(texture, "pixel")?;
    let Value::Resource(rid) = doc.value(pixel_node) else {
        return Err(PsbError::malformed(format!(
            "'{}' is not a resource",
            doc.path_of(pixel_node)
        )));
    };
    let data = doc
        .resource(*rid)
        .and_then(|r| r.data.as_deref())
        .ok_or_else(|| PsbError::codec(format!("'{}' has no payload", doc.path_of(pixel_node))))?;

    match compress {
        CompressKind::RunLength => pixel::decode_pixels(&rl::uncompress(data)?, width, height, format),
        CompressKind::None => pixel::decode_pixels(data, width, height, format),
    }
}

/// Split a texture group's atlas into one standalone bitmap per entry of its `"icon"` mapping.
///
/// Each icon's `left`/`top`/`width`/`height` select its sub-rectangle. The result keeps the icon
/// mapping's order.
pub fn split_texture(
    doc: &Document,
    group: NodeId,
    platform: Platform,
) -> PsbResult<IndexMap<String, RgbaImage>> {
    let atlas = decode_texture(doc, group, platform)?;
    let icons = doc.child(group, "icon")?;

    let mut out = IndexMap::new();
    for (name, icon) in doc.entries(icons)? {
        let left = dimension(doc, icon, "left")?;
        let top = dimension(doc, icon, "top")?;
        let width = dimension(doc, icon, "width")?;
        let height = dimension(doc, icon, "height")?;

        let fits = left.checked_add(width).is_some_and(|r| r <= atlas.width())
            && top.checked_add(height).is_some_and(|b| b <= atlas.height());
        if !fits {
            return Err(PsbError::codec(format!(
                "icon '{name}' ({left},{top} {width}x{height}) lies outside the {}x{} atlas",
                atlas.width(),
                atlas.height()
            )));
        }

        let bmp = image::imageops::crop_imm(&atlas, left, top, width, height).to_image();
        out.insert(name, bmp);
    }
    Ok(out)
}

fn dimension(doc: &Document, map: NodeId, key: &str) -> PsbResult<u32> {
    let v = doc.number(map, key)?.as_i64();
    u32::try_from(v).map_err(|_| {
        PsbError::malformed(format!("'{}/{key}' = {v} is not a pixel size", doc.path_of(map)))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/codec/atlas.rs"]
mod tests;
