use crate::{
    document::tree::Document,
    foundation::error::{PsbError, PsbResult},
    foundation::platform::{CompressKind, ConvertOption, PixelFormat, Platform},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Tunables shared by every converter.
pub struct ConvertOptions {
    /// Conversion profile.
    pub option: ConvertOption,
    /// Pixel layout of resources the converter creates.
    pub target_pixel_format: PixelFormat,
    /// Whether transcoded resources are run-length compressed.
    pub use_run_length: bool,
}

impl ConvertOptions {
    /// Compression applied to resources written by the converter.
    pub fn compress_kind(&self) -> CompressKind {
        if self.use_run_length {
            CompressKind::RunLength
        } else {
            CompressKind::None
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            option: ConvertOption::Default,
            target_pixel_format: PixelFormat::None,
            use_run_length: false,
        }
    }
}

/// A platform transition over a [`Document`].
///
/// Implementors declare which platforms they accept and which one they produce, and implement
/// [`SpecConverter::apply`]. Callers go through [`SpecConverter::convert`], which rejects documents
/// from unsupported platforms before anything is mutated.
pub trait SpecConverter {
    /// Human-readable converter name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Platforms accepted as input.
    fn supported_sources(&self) -> &[Platform];

    /// Platform the document is tagged with after converting from `source`.
    fn produced_target(&self, source: Platform) -> Platform;

    /// Current tunables.
    fn options(&self) -> &ConvertOptions;

    /// Mutable tunables.
    fn options_mut(&mut self) -> &mut ConvertOptions;

    /// Rewrite `doc` from `source` to `target`. Does not retag the document.
    fn apply(&self, doc: &mut Document, source: Platform, target: Platform) -> PsbResult<()>;

    /// Whether `platform` is an accepted input.
    fn supports(&self, platform: Platform) -> bool {
        self.supported_sources().contains(&platform)
    }

    /// Convert `doc` in place and retag it.
    ///
    /// Not idempotent: converting an already converted document either fails the platform check
    /// or, for converters whose output is also an accepted input, rewrites it again.
    #[tracing::instrument(skip(self, doc), fields(converter = self.name()))]
    fn convert(&self, doc: &mut Document) -> PsbResult<()> {
        let source = doc.platform();
        if !self.supports(source) {
            return Err(PsbError::unsupported_platform(self.name(), source));
        }
        let target = self.produced_target(source);
        self.apply(doc, source, target)?;
        doc.set_platform(target);
        tracing::info!(%source, %target, "converted document platform");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/spec.rs"]
mod tests;
