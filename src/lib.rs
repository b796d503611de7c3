//! psbuild converts PSB scene documents between engine platforms (`krkr`, `win`, `common`, `ems`).
//!
//! # Pipeline overview
//!
//! 1. **Load**: a decompiled `<name>.json` tree plus its `<name>.resx.json` manifest become a
//!    [`Document`] (arena of nodes with parent links, plus a resource table).
//! 2. **Convert**: a [`SpecConverter`] checks the document's platform, rewrites the tree in place
//!    and retags it. [`CommonWinConverter`] transcodes pixel payloads between `win` and the common
//!    family; [`WinKrkrConverter`] splits texture atlases into per-icon resources and rewrites
//!    composition nodes for `krkr`. [`convert_document`] chains them for any supported pair.
//! 3. **Save**: the tree is written back as JSON with renumbered raw resources.
//!
//! Conversions are synchronous and single-threaded; a failing conversion may leave the tree
//! partially rewritten (except [`CommonWinConverter`], which stages all payloads first). Clone the
//! document first when atomicity matters.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod codec;
mod convert;
mod document;
mod foundation;

pub use codec::{atlas, dxt5, pixel, rl};
pub use convert::common_win::CommonWinConverter;
pub use convert::plan::{ConversionSettings, convert_document, plan_conversion};
pub use convert::spec::{ConvertOptions, SpecConverter};
pub use convert::win_krkr::{IconInfo, WinKrkrConverter, shape_name};
pub use document::json::{ResxManifest, load_document, resx_path_for, save_document};
pub use document::node::{Edge, NodeId, Number, ResourceId, Value};
pub use document::resource::{Resource, ResourceMetadata};
pub use document::tree::Document;
pub use foundation::error::{PsbError, PsbResult};
pub use foundation::platform::{CompressKind, ConvertOption, PixelFormat, Platform};
