use std::{fmt, str::FromStr};

use crate::foundation::error::{PsbError, PsbResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Engine variant a PSB document is encoded for.
pub enum Platform {
    /// KiriKiri (krkr) runtime.
    Krkr,
    /// Windows runtime.
    Win,
    /// Common (console/mobile) runtime.
    Common,
    /// Emscripten runtime; shares the common pixel conventions.
    Ems,
}

impl Platform {
    /// All platforms, in declaration order.
    pub const ALL: [Platform; 4] = [
        Platform::Krkr,
        Platform::Win,
        Platform::Common,
        Platform::Ems,
    ];

    /// Lowercase tag used in manifests and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Krkr => "krkr",
            Platform::Win => "win",
            Platform::Common => "common",
            Platform::Ems => "ems",
        }
    }

    /// Raw pixel layout resources conventionally use on this platform.
    pub fn default_pixel_format(self) -> PixelFormat {
        match self {
            Platform::Krkr | Platform::Win => PixelFormat::WinRgba8,
            Platform::Common | Platform::Ems => PixelFormat::CommonRgba8,
        }
    }

    /// Whether resources on this platform are conventionally run-length compressed.
    pub fn uses_run_length(self) -> bool {
        matches!(self, Platform::Krkr)
    }

    /// `common` and `ems` share byte layouts.
    pub fn is_common_family(self) -> bool {
        matches!(self, Platform::Common | Platform::Ems)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PsbError;

    fn from_str(s: &str) -> PsbResult<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| PsbError::serde(format!("unknown platform '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Byte layout of a pixel resource.
///
/// The tree stores a platform-neutral tag (`"RGBA8"`); the concrete layout depends on the
/// platform the document is encoded for, see [`PixelFormat::from_psb`].
pub enum PixelFormat {
    /// Unknown or absent format tag.
    #[default]
    None,
    /// 8-bit channels stored B, G, R, A.
    WinRgba8,
    /// 8-bit channels stored R, G, B, A.
    CommonRgba8,
    /// 4-bit channels, little-endian `a<<12 | r<<8 | g<<4 | b`.
    WinRgba4444,
    /// 4-bit channels, little-endian `r<<12 | g<<8 | b<<4 | a`.
    CommonRgba4444,
    /// BC3 block compression (decode only).
    Dxt5,
}

impl PixelFormat {
    /// Resolve a tree `"type"` tag for a document encoded for `platform`.
    pub fn from_psb(tag: &str, platform: Platform) -> Self {
        let common = platform.is_common_family();
        match tag.trim().to_ascii_uppercase().as_str() {
            "RGBA8" if common => PixelFormat::CommonRgba8,
            "RGBA8" => PixelFormat::WinRgba8,
            "RGBA4444" if common => PixelFormat::CommonRgba4444,
            "RGBA4444" => PixelFormat::WinRgba4444,
            "DXT5" => PixelFormat::Dxt5,
            _ => PixelFormat::None,
        }
    }

    /// Canonical tree tag for this format.
    pub fn psb_name(self) -> &'static str {
        match self {
            PixelFormat::None => "",
            PixelFormat::WinRgba8 | PixelFormat::CommonRgba8 => "RGBA8",
            PixelFormat::WinRgba4444 | PixelFormat::CommonRgba4444 => "RGBA4444",
            PixelFormat::Dxt5 => "DXT5",
        }
    }

    /// Same-depth format using `platform`'s layout. Block formats are returned unchanged.
    pub fn for_platform(self, platform: Platform) -> Self {
        match self {
            PixelFormat::WinRgba8 | PixelFormat::CommonRgba8 => platform.default_pixel_format(),
            PixelFormat::WinRgba4444 | PixelFormat::CommonRgba4444 => {
                if platform.is_common_family() {
                    PixelFormat::CommonRgba4444
                } else {
                    PixelFormat::WinRgba4444
                }
            }
            other => other,
        }
    }

    /// Expected uncompressed payload length for a `width` x `height` image.
    ///
    /// `None` for [`PixelFormat::None`] and when the size does not fit in `usize`.
    pub fn byte_len(self, width: u32, height: u32) -> Option<usize> {
        let (w, h) = (width as usize, height as usize);
        let (units, unit_bytes) = match self {
            PixelFormat::None => return None,
            PixelFormat::WinRgba8 | PixelFormat::CommonRgba8 => (w.checked_mul(h)?, 4),
            PixelFormat::WinRgba4444 | PixelFormat::CommonRgba4444 => (w.checked_mul(h)?, 2),
            PixelFormat::Dxt5 => (w.div_ceil(4).checked_mul(h.div_ceil(4))?, 16),
        };
        units.checked_mul(unit_bytes)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Compression state of a resource payload.
pub enum CompressKind {
    /// Payload stored as-is.
    #[default]
    None,
    /// Payload run-length compressed, see [`crate::rl`].
    RunLength,
}

impl CompressKind {
    /// Parse a tree `"compress"` label.
    pub fn from_psb(label: &str) -> Self {
        if label.eq_ignore_ascii_case("RL") {
            CompressKind::RunLength
        } else {
            CompressKind::None
        }
    }

    /// Label stored in the tree; `None` is the unset string.
    pub fn label(self) -> Option<&'static str> {
        match self {
            CompressKind::None => None,
            CompressKind::RunLength => Some("RL"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Conversion profile.
pub enum ConvertOption {
    /// Convert only what the destination requires.
    #[default]
    Default,
    /// Also strip precomputed metadata the destination recomputes and add its required markers.
    Minimum,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/platform.rs"]
mod tests;
