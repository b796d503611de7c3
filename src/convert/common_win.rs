use crate::{
    codec::{dxt5, pixel, rl},
    convert::spec::{ConvertOptions, SpecConverter},
    document::node::{NodeId, ResourceId, Value},
    document::resource::ResourceMetadata,
    document::tree::Document,
    foundation::error::{PsbError, PsbResult},
    foundation::platform::{CompressKind, PixelFormat, Platform},
};

const SOURCES: [Platform; 3] = [Platform::Win, Platform::Common, Platform::Ems];

#[derive(Clone, Debug, Default)]
/// Interchanges `win` and the common family (`common`, or `ems` when
/// [`CommonWinConverter::ems_as_common`] is set) by transcoding every pixel resource.
///
/// `target_pixel_format` is ignored: the destination platform decides the layout.
pub struct CommonWinConverter {
    /// Converter tunables.
    pub options: ConvertOptions,
    /// Produce (and name) `ems` instead of `common` when converting from `win`.
    pub ems_as_common: bool,
}

// A payload ready to be written back, with the owner fields that must change alongside it.
struct Transcoded {
    id: ResourceId,
    owner: NodeId,
    data: Vec<u8>,
    labels: Vec<(&'static str, Value)>,
}

impl CommonWinConverter {
    /// Converter for the `common` <-> `win` pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter for the `ems` <-> `win` pair.
    pub fn ems() -> Self {
        Self {
            ems_as_common: true,
            ..Self::default()
        }
    }

    fn as_common(&self) -> Platform {
        if self.ems_as_common {
            Platform::Ems
        } else {
            Platform::Common
        }
    }

    fn transcode(
        &self,
        doc: &Document,
        meta: &ResourceMetadata,
        data: &[u8],
        target: Platform,
    ) -> PsbResult<Transcoded> {
        let raw = match meta.compress {
            CompressKind::RunLength => rl::uncompress(data)?,
            CompressKind::None => data.to_vec(),
        };
        let recompress = self.options.compress_kind();

        let (data, format, compress) = match meta.pixel_format {
            PixelFormat::Dxt5 => {
                let to_format = target.default_pixel_format();
                let img = dxt5::decode(&raw, meta.width, meta.height)?;
                let bytes = pixel::encode_pixels(&img, to_format)?;
                (bytes, Some(to_format), CompressKind::None)
            }
            PixelFormat::WinRgba4444 | PixelFormat::CommonRgba4444 => {
                let to_format = meta.pixel_format.for_platform(target);
                let img = pixel::decode_pixels(&raw, meta.width, meta.height, meta.pixel_format)?;
                let bytes = pixel::encode_image(&img, to_format, recompress)?;
                (bytes, Some(to_format), recompress)
            }
            _ => {
                let mut bytes = raw;
                pixel::swap_red_blue(&mut bytes);
                if recompress == CompressKind::RunLength {
                    bytes = rl::compress(&bytes)?;
                }
                (bytes, None, recompress)
            }
        };

        let mut labels = Vec::new();
        if let Some(format) = format {
            labels.push(("type", Value::text(format.psb_name())));
        }
        match compress.label() {
            Some(label) => labels.push(("compress", Value::text(label))),
            None if doc.contains_key(meta.owner, "compress") => {
                labels.push(("compress", Value::Text(None)));
            }
            None => {}
        }
        if !labels.is_empty() && !doc.is_map(meta.owner) {
            return Err(PsbError::malformed(format!(
                "'{}' holds a resource that needs '{}' but is not a map",
                doc.path_of(meta.owner),
                labels[0].0
            )));
        }

        tracing::debug!(
            path = %meta.path,
            from = ?meta.pixel_format,
            to = ?format,
            bytes = data.len(),
            "transcoded resource"
        );
        Ok(Transcoded {
            id: meta.id,
            owner: meta.owner,
            data,
            labels,
        })
    }

    // Owners were checked while staging, so nothing here can fail.
    fn commit(doc: &mut Document, t: Transcoded) {
        if let Some(res) = doc.resource_mut(t.id) {
            res.data = Some(t.data);
        }
        for (key, value) in t.labels {
            doc.put(t.owner, key, value);
        }
    }
}

impl SpecConverter for CommonWinConverter {
    fn name(&self) -> &'static str {
        if self.ems_as_common {
            "EmsWinConverter"
        } else {
            "CommonWinConverter"
        }
    }

    fn supported_sources(&self) -> &[Platform] {
        &SOURCES
    }

    fn produced_target(&self, source: Platform) -> Platform {
        if source == Platform::Win {
            self.as_common()
        } else {
            Platform::Win
        }
    }

    fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.options
    }

    // Every payload is transcoded and every owner checked before any is written back, so a
    // failure leaves the document untouched.
    fn apply(&self, doc: &mut Document, _source: Platform, target: Platform) -> PsbResult<()> {
        let resources = doc.collect_resources(&[]);
        let mut staged = Vec::with_capacity(resources.len());
        for meta in &resources {
            let Some(data) = doc
                .resource(meta.id)
                .filter(|r| r.has_payload())
                .and_then(|r| r.data.as_deref())
            else {
                continue;
            };
            staged.push(self.transcode(doc, meta, data, target)?);
        }

        tracing::debug!(count = staged.len(), "committing transcoded resources");
        for t in staged {
            Self::commit(doc, t);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/common_win.rs"]
mod tests;
