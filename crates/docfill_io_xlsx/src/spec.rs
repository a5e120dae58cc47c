//! Row-extraction models, options and top-level error types.

use std::path::PathBuf;

use crate::conf::{C_LABEL_BUSINESS_NAME, C_LABEL_FIELD3, C_LABEL_FIELD4, C_LABEL_YEAR};
use crate::util::render_cell_text;

////////////////////////////////////////////////////////////////////////////////
// #region CellValues

/// Normalized cell value read from a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// `true` for missing cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Expected header labels, one per record field.
///
/// Matching ignores case and all whitespace, so `"  business   NAME"` matches
/// `"Business Name"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecHeaderLabels {
    /// Label of the business-name column.
    pub business_name: String,
    /// Label of the year column.
    pub year: String,
    /// Label of the third field column.
    pub field3: String,
    /// Label of the fourth field column.
    pub field4: String,
}

impl Default for SpecHeaderLabels {
    fn default() -> Self {
        Self {
            business_name: C_LABEL_BUSINESS_NAME.to_string(),
            year: C_LABEL_YEAR.to_string(),
            field3: C_LABEL_FIELD3.to_string(),
            field4: C_LABEL_FIELD4.to_string(),
        }
    }
}

impl SpecHeaderLabels {
    /// Labels in record field order.
    pub fn as_array(&self) -> [&str; 4] {
        [
            self.business_name.as_str(),
            self.year.as_str(),
            self.field3.as_str(),
            self.field4.as_str(),
        ]
    }
}

/// Input options for [`crate::reader::read_records`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecExtractOptions {
    /// Expected header labels.
    pub header_labels: SpecHeaderLabels,
    /// Worksheet to read; first worksheet when `None`.
    pub sheet_name: Option<String>,
    /// Only scan this many leading rows for the header; whole sheet when `None`.
    pub height_header_scan_max: Option<usize>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Records

/// One data row mapped onto the fixed record fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRecord {
    /// 1-based worksheet row number.
    pub row_idx: usize,
    /// Trimmed, non-empty business name.
    pub business_name: String,
    /// Year cell, kept as read (number or text).
    pub year: EnumCellValue,
    /// Third field rendered as text.
    pub field3: String,
    /// Fourth field rendered as text.
    pub field4: String,
}

impl SpecRecord {
    /// Substitution values in fixed field order.
    pub fn to_values(&self) -> Vec<String> {
        vec![
            self.business_name.clone(),
            render_cell_text(&self.year),
            self.field3.clone(),
            self.field4.clone(),
        ]
    }
}

/// A data row dropped because its business name is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRowSkip {
    /// 1-based worksheet row number.
    pub row_idx: usize,
    /// User-facing reason.
    pub reason: String,
}

/// Extraction outcome for one worksheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportExtract {
    /// Records in worksheet order.
    pub records: Vec<SpecRecord>,
    /// Rows skipped for a missing business name.
    pub skipped: Vec<SpecRowSkip>,
    /// 1-based row number of the detected header.
    pub n_row_header: usize,
    /// Data rows inspected below the header.
    pub cnt_rows_scanned: u64,
    /// Data rows ignored because every mapped cell was blank.
    pub cnt_rows_blank: u64,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Errors that abort extraction for the whole workbook.
#[derive(Debug, thiserror::Error)]
pub enum XlsxReadError {
    /// Workbook could not be opened or parsed.
    #[error("Failed to open workbook {}: {message}", .path.display())]
    Open {
        /// Workbook path.
        path: PathBuf,
        /// Underlying reader error text.
        message: String,
    },
    /// Workbook has no worksheet.
    #[error("Workbook has no worksheet: {}", .0.display())]
    NoWorksheet(PathBuf),
    /// Requested worksheet does not exist.
    #[error("Worksheet not found: {0:?}")]
    SheetNotFound(String),
    /// Worksheet range could not be read.
    #[error("Failed to read worksheet {sheet_name:?}: {message}")]
    SheetRead {
        /// Worksheet name.
        sheet_name: String,
        /// Underlying reader error text.
        message: String,
    },
    /// Expected labels are blank or collide after normalization.
    #[error("Invalid header labels: {0}")]
    InvalidHeaderLabels(String),
    /// No row contains every expected label.
    #[error("Header row not found; expected labels: {}", .labels.join(", "))]
    HeaderNotFound {
        /// Labels that were searched for.
        labels: Vec<String>,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
