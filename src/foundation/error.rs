use crate::foundation::platform::Platform;

/// Convenience result type used across psbuild.
pub type PsbResult<T> = Result<T, PsbError>;

/// Top-level error taxonomy used by document, codec and converter APIs.
#[derive(thiserror::Error, Debug)]
pub enum PsbError {
    /// The document's platform is not an accepted source of the converter.
    #[error("unsupported platform: {converter} cannot convert from '{platform}'")]
    UnsupportedPlatform {
        /// Converter (or conversion request) that rejected the document.
        converter: String,
        /// Platform the document was tagged with.
        platform: Platform,
    },

    /// An expected section or field is absent from the tree.
    #[error("missing section: {0}")]
    MissingSection(String),

    /// A field holds a different node variant than the one required.
    #[error("malformed field: {0}")]
    MalformedField(String),

    /// Pixel, run-length or atlas processing failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// Errors when serializing or deserializing JSON documents and manifests.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PsbError {
    /// Build a [`PsbError::UnsupportedPlatform`] value.
    pub fn unsupported_platform(converter: impl Into<String>, platform: Platform) -> Self {
        Self::UnsupportedPlatform {
            converter: converter.into(),
            platform,
        }
    }

    /// Build a [`PsbError::MissingSection`] value.
    pub fn missing_section(path: impl Into<String>) -> Self {
        Self::MissingSection(path.into())
    }

    /// Build a [`PsbError::MalformedField`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedField(msg.into())
    }

    /// Build a [`PsbError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`PsbError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
