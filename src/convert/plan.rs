use crate::{
    convert::common_win::CommonWinConverter,
    convert::spec::SpecConverter,
    convert::win_krkr::WinKrkrConverter,
    document::tree::Document,
    foundation::error::{PsbError, PsbResult},
    foundation::platform::{ConvertOption, PixelFormat, Platform},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Caller-facing knobs for a conversion request.
pub struct ConversionSettings {
    /// Profile applied to every step.
    pub option: ConvertOption,
    /// Overrides run-length use of the final step; `None` keeps the converter default.
    pub use_run_length: Option<bool>,
    /// Overrides the pixel layout of resources the final step creates.
    pub target_pixel_format: Option<PixelFormat>,
}

/// Converters that take a `from` document to `to`, in order. Same platform yields no steps.
pub fn plan_conversion(
    from: Platform,
    to: Platform,
    settings: &ConversionSettings,
) -> PsbResult<Vec<Box<dyn SpecConverter>>> {
    let mut steps: Vec<Box<dyn SpecConverter>> = match (from, to) {
        (f, t) if f == t => Vec::new(),
        (Platform::Win, Platform::Common) => vec![Box::new(CommonWinConverter::new())],
        (Platform::Win, Platform::Ems) => vec![Box::new(CommonWinConverter::ems())],
        (Platform::Common | Platform::Ems, Platform::Win) => {
            vec![Box::new(common_family_converter(from))]
        }
        (Platform::Win, Platform::Krkr) => vec![Box::new(WinKrkrConverter::new())],
        (Platform::Common | Platform::Ems, Platform::Krkr) => vec![
            Box::new(common_family_converter(from)),
            Box::new(WinKrkrConverter::new()),
        ],
        _ => {
            return Err(PsbError::unsupported_platform(
                format!("conversion to {to}"),
                from,
            ));
        }
    };

    for step in &mut steps {
        step.options_mut().option = settings.option;
    }
    if let Some(last) = steps.last_mut() {
        if let Some(rl) = settings.use_run_length {
            last.options_mut().use_run_length = rl;
        }
        if let Some(format) = settings.target_pixel_format {
            last.options_mut().target_pixel_format = format;
        }
    }
    Ok(steps)
}

fn common_family_converter(from: Platform) -> CommonWinConverter {
    if from == Platform::Ems {
        CommonWinConverter::ems()
    } else {
        CommonWinConverter::new()
    }
}

/// Convert `doc` to `to`, running every planned step in order.
///
/// A failing step aborts the chain; earlier steps stay applied.
pub fn convert_document(
    doc: &mut Document,
    to: Platform,
    settings: &ConversionSettings,
) -> PsbResult<()> {
    let steps = plan_conversion(doc.platform(), to, settings)?;
    for step in &steps {
        step.convert(doc)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/convert/plan.rs"]
mod tests;
