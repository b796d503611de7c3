use std::cell::Cell;

use super::*;
use crate::document::node::Value;

struct Marker {
    options: ConvertOptions,
    applied: Cell<usize>,
}

impl SpecConverter for Marker {
    fn name(&self) -> &'static str {
        "Marker"
    }

    fn supported_sources(&self) -> &[Platform] {
        &[Platform::Win, Platform::Common]
    }

    fn produced_target(&self, source: Platform) -> Platform {
        if source == Platform::Win {
            Platform::Common
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

    fn apply(&self, doc: &mut Document, _source: Platform, target: Platform) -> PsbResult<()> {
        self.applied.set(self.applied.get() + 1);
        let root = doc.root();
        doc.insert(root, "seen", Value::text(target.as_str()))?;
        Ok(())
    }
}

fn marker() -> Marker {
    Marker {
        options: ConvertOptions::default(),
        applied: Cell::new(0),
    }
}

#[test]
fn convert_applies_then_retags() {
    let conv = marker();
    let mut doc = Document::new(Platform::Win);
    conv.convert(&mut doc).unwrap();
    assert_eq!(doc.platform(), Platform::Common);
    assert_eq!(doc.text(doc.root(), "seen"), Some("common"));

    conv.convert(&mut doc).unwrap();
    assert_eq!(doc.platform(), Platform::Win);
    assert_eq!(conv.applied.get(), 2);
}

#[test]
fn unsupported_source_is_rejected_before_apply() {
    let conv = marker();
    let mut doc = Document::new(Platform::Krkr);
    let err = conv.convert(&mut doc).unwrap_err();
    assert!(matches!(
        err,
        PsbError::UnsupportedPlatform {
            platform: Platform::Krkr,
            ..
        }
    ));
    assert_eq!(conv.applied.get(), 0);
    assert_eq!(doc.platform(), Platform::Krkr);
    assert!(!doc.contains_key(doc.root(), "seen"));
}

#[test]
fn options_are_tunable() {
    let mut conv = marker();
    conv.options_mut().use_run_length = true;
    conv.options_mut().option = ConvertOption::Minimum;
    assert_eq!(conv.options().compress_kind(), CompressKind::RunLength);
    assert_eq!(conv.options().option, ConvertOption::Minimum);
}
