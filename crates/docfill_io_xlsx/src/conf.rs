//! Row-extraction constants and default presets.

use crate::spec::SpecExtractOptions;

/// Default header label for the business-name column.
pub const C_LABEL_BUSINESS_NAME: &str = "Business Name";
/// Default header label for the year column.
pub const C_LABEL_YEAR: &str = "Year";
/// Default header label for the third field column.
pub const C_LABEL_FIELD3: &str = "Field 3";
/// Default header label for the fourth field column.
pub const C_LABEL_FIELD4: &str = "Field 4";

/// Number of record fields, in fixed substitution order.
pub const N_RECORD_FIELDS: usize = 4;

/// Largest magnitude below which zero-fraction floats are rendered via `i64`.
pub const F_INTEGER_RENDER_MAX: f64 = 9_007_199_254_740_992.0;

/// Build default extraction options.
pub fn derive_default_extract_options() -> SpecExtractOptions {
    SpecExtractOptions::default()
}
