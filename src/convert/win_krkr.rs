use indexmap::IndexMap;

use crate::{
    codec::{atlas, pixel},
    convert::spec::{ConvertOptions, SpecConverter},
    document::node::{NodeId, Number, Value},
    document::resource::Resource,
    document::tree::Document,
    foundation::error::{PsbError, PsbResult},
    foundation::platform::{ConvertOption, Platform},
};

const SOURCES: [Platform; 1] = [Platform::Win];

// Mask values (after the increment) whose content nodes need a default `src`.
const DEFAULT_SRC_MASKS: [i64; 3] = [1, 3, 19];

/// Texture group name -> icon names, in document order.
pub type IconInfo = IndexMap<String, Vec<String>>;

#[derive(Clone, Debug)]
/// Rewrites a `win` document into the `krkr` schema.
///
/// Atlas textures become one standalone `pixel` resource per icon, composition `content` nodes get
/// krkr-style `src` references and default offsets, and with [`ConvertOption::Minimum`] the
/// precomputed easing and bounds data is dropped.
pub struct WinKrkrConverter {
    /// Converter tunables.
    pub options: ConvertOptions,
}

impl Default for WinKrkrConverter {
    fn default() -> Self {
        Self {
            options: ConvertOptions {
                option: ConvertOption::Default,
                target_pixel_format: Platform::Krkr.default_pixel_format(),
                use_run_length: Platform::Krkr.uses_run_length(),
            },
        }
    }
}

impl WinKrkrConverter {
    /// Converter with krkr defaults: `RGBA8` (Win layout), run-length compressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop `easing` and every `object/*/motion/*/bounds`.
    fn remove_precomputed(doc: &mut Document) -> PsbResult<()> {
        let root = doc.root();
        doc.remove(root, "easing");

        let object = doc.section("object")?;
        for (_, obj) in doc.entries(object)? {
            let motion = doc.child(obj, "motion")?;
            for (_, m) in doc.entries(motion)? {
                if doc.is_map(m) {
                    doc.remove(m, "bounds");
                }
            }
        }
        Ok(())
    }

    /// Replace every texture group's atlas with per-icon resources.
    fn translate_resources(&self, doc: &mut Document) -> PsbResult<IconInfo> {
        let mut icon_info = IconInfo::new();
        let source = doc.section("source")?;
        let compress = self.options.compress_kind();

        for (tex_name, tex) in doc.entries(source)? {
            if !doc.is_map(tex) {
                continue;
            }
            let mut bmps = atlas::split_texture(doc, tex, doc.platform())?;
            let icons = doc.child(tex, "icon")?;
            let mut names = Vec::new();

            for (icon_name, icon) in doc.entries(icons)? {
                let bmp = bmps.swap_remove(&icon_name).ok_or_else(|| {
                    PsbError::codec(format!("no bitmap split for icon '{tex_name}/{icon_name}'"))
                })?;
                let data =
                    pixel::encode_image(&bmp, self.options.target_pixel_format, compress)?;

                let rid = doc.add_resource(Resource::owned_by(icon, data));
                doc.insert(icon, "pixel", Value::Resource(rid))?;
                doc.insert(icon, "compress", Value::Text(compress.label().map(str::to_string)))?;
                doc.remove(icon, "left");
                doc.remove(icon, "top");
                names.push(icon_name);
            }

            doc.remove(tex, "texture");
            doc.insert(tex, "type", Value::int(1))?;
            tracing::debug!(texture = %tex_name, icons = names.len(), "split texture atlas");
            icon_info.insert(tex_name, names);
        }
        Ok(icon_info)
    }

    /// Depth-first rewrite of every `content` node under `id`, parents before children.
    fn travel(doc: &mut Document, id: NodeId, icon_info: &IconInfo) -> PsbResult<usize> {
        let mut rewritten = 0;
        if doc.is_map(id) && doc.contains_key(id, "mask") && doc.name(id) == Some("content") {
            Self::rewrite_content(doc, id, icon_info)?;
            rewritten += 1;
        }

        for child in doc.children(id) {
            if doc.value(child).is_container() {
                rewritten += Self::travel(doc, child, icon_info)?;
            }
        }
        Ok(rewritten)
    }

    fn rewrite_content(doc: &mut Document, content: NodeId, icon_info: &IconInfo) -> PsbResult<()> {
        if let Some(src) = doc.text(content, "src").map(str::to_string) {
            let icon = doc.scalar_string(doc.child(content, "icon")?)?;
            let new_src = if src == "blank" {
                format!("blank/{icon}")
            } else if icon_info.contains_key(&src) {
                format!("src/{src}/{icon}")
            } else {
                format!("motion/{src}/{icon}")
            };
            doc.insert(content, "src", Value::text(new_src))?;
        }

        let mask_node = doc.child(content, "mask")?;
        let mask = doc.number(content, "mask")?.as_i64() + 1;
        doc.set_number(mask_node, Number::Int(mask));

        if DEFAULT_SRC_MASKS.contains(&mask) && !doc.contains_key(content, "src") {
            let src = Self::default_src(doc, content)?;
            doc.insert(content, "src", Value::text(src))?;
        }

        for key in ["ox", "oy"] {
            if !doc.contains_key(content, key) {
                doc.insert(content, key, Value::int(0))?;
            }
        }
        Ok(())
    }

    // content -> {} -> [] -> {shape}
    fn default_src(doc: &Document, content: NodeId) -> PsbResult<String> {
        let Some(holder) = doc.ancestor(content, 3).filter(|h| doc.is_map(*h)) else {
            return Ok("layout".to_string());
        };
        if !doc.contains_key(holder, "shape") {
            return Ok("layout".to_string());
        }
        let code = doc.number(holder, "shape")?.as_i64();
        Ok(format!("shape/{}", shape_name(code)))
    }

    /// Ensure `metadata/attrcomp` exists.
    fn add_required(doc: &mut Document) -> PsbResult<()> {
        let metadata = doc.section("metadata")?;
        if !doc.contains_key(metadata, "attrcomp") {
            doc.insert(metadata, "attrcomp", Value::empty_map())?;
        }
        Ok(())
    }
}

/// Symbolic krkr shape name. Only code 0 (`point`) is known; every other code maps to `point`
/// as well.
pub fn shape_name(code: i64) -> &'static str {
    match code {
        0 => "point",
        _ => "point",
    }
}

impl SpecConverter for WinKrkrConverter {
    fn name(&self) -> &'static str {
        "WinKrkrConverter"
    }

    fn supported_sources(&self) -> &[Platform] {
        &SOURCES
    }

    fn produced_target(&self, _source: Platform) -> Platform {
        Platform::Krkr
    }

    fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.options
    }

    fn apply(&self, doc: &mut Document, _source: Platform, _target: Platform) -> PsbResult<()> {
        let minimum = self.options.option == ConvertOption::Minimum;
        if minimum {
            Self::remove_precomputed(doc)?;
        }

        let icon_info = self.translate_resources(doc)?;
        let object = doc.section("object")?;
        let rewritten = Self::travel(doc, object, &icon_info)?;
        tracing::debug!(rewritten, "rewrote content nodes");

        if minimum {
            Self::add_required(doc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/win_krkr.rs"]
mod tests;
