//! `docfill_io_xlsx` v1:
//! Spreadsheet row extractor.
//!
//! Module layout:
//! - `conf`   : constants and default presets
//! - `spec`   : records/options/errors
//! - `util`   : pure helper functions
//! - `reader` : workbook reader and row-to-record mapping
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;

pub use conf::{
    C_LABEL_BUSINESS_NAME, C_LABEL_FIELD3, C_LABEL_FIELD4, C_LABEL_YEAR, N_RECORD_FIELDS,
    derive_default_extract_options,
};
pub use reader::{extract_records, read_records};
pub use spec::{
    EnumCellValue, ReportExtract, SpecExtractOptions, SpecHeaderLabels, SpecRecord, SpecRowSkip,
    XlsxReadError,
};
pub use util::{normalize_header_label, render_cell_text, render_number_text};
