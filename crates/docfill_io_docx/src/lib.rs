//! `docfill_io_docx` v1:
//! Word template filler.
//!
//! Module layout:
//! - `conf`   : package constants and default presets
//! - `spec`   : options/reports/errors
//! - `util`   : placeholder scanning and value formatting helpers
//! - `filler` : template load, fill and save
pub mod conf;
pub mod filler;
pub mod spec;
pub mod util;

pub use conf::{C_EXT_DOCX, C_MARKER_DEFAULT, N_LEN_PLACEHOLDER_MIN, derive_default_fill_options};
pub use filler::DocxTemplate;
pub use spec::{
    DocxError, EnumPlaceholderMismatch, SpecFillOptions, SpecFillReport, SpecPlaceholderRule,
};
pub use util::format_value;
