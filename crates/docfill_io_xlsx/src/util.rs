//! Stateless helpers for cell rendering and header detection.

use std::collections::BTreeSet;

use crate::conf::{F_INTEGER_RENDER_MAX, N_RECORD_FIELDS};
use crate::spec::{EnumCellValue, SpecHeaderLabels, XlsxReadError};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueRendering

/// Render a number as plain text, dropping a zero fractional part.
///
/// `2024.0` renders as `"2024"`, `2024.5` keeps full precision.
pub fn render_number_text(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < F_INTEGER_RENDER_MAX {
        return (x as i64).to_string();
    }
    x.to_string()
}

/// Render a cell as substitution text. Text is trimmed, blanks become `""`.
pub fn render_cell_text(value: &EnumCellValue) -> String {
    match value {
        EnumCellValue::None => String::new(),
        EnumCellValue::String(s) => s.trim().to_string(),
        EnumCellValue::Number(n) => render_number_text(*n),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderDetection

/// Lowercase and drop every whitespace char.
pub fn normalize_header_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize expected labels, rejecting blank or colliding ones.
pub fn validate_header_labels(
    header_labels: &SpecHeaderLabels,
) -> Result<[String; N_RECORD_FIELDS], XlsxReadError> {
    let l_labels_norm = header_labels.as_array().map(normalize_header_label);

    if let Some(n_idx) = l_labels_norm.iter().position(String::is_empty) {
        return Err(XlsxReadError::InvalidHeaderLabels(format!(
            "label #{} is blank",
            n_idx + 1
        )));
    }
    let set_labels: BTreeSet<&String> = l_labels_norm.iter().collect();
    if set_labels.len() != l_labels_norm.len() {
        return Err(XlsxReadError::InvalidHeaderLabels(format!(
            "labels must be distinct, got {:?}",
            header_labels.as_array()
        )));
    }
    Ok(l_labels_norm)
}

/// Map each normalized label to the first column in `row` carrying it.
///
/// Returns `None` unless every label is present.
pub fn match_header_columns(
    row: &[EnumCellValue],
    labels_norm: &[String; N_RECORD_FIELDS],
) -> Option<[usize; N_RECORD_FIELDS]> {
    let l_cells_norm: Vec<Option<String>> = row
        .iter()
        .map(|cell| match cell {
            EnumCellValue::String(s) => Some(normalize_header_label(s)),
            _ => None,
        })
        .collect();

    let mut l_cols_idx = [0usize; N_RECORD_FIELDS];
    for (n_field, c_label) in labels_norm.iter().enumerate() {
        l_cols_idx[n_field] = l_cells_norm
            .iter()
            .position(|c| c.as_deref() == Some(c_label.as_str()))?;
    }
    Some(l_cols_idx)
}

/// Find the first row holding all labels; returns `(row_offset, columns)`.
pub fn locate_header_row(
    rows: &[Vec<EnumCellValue>],
    labels_norm: &[String; N_RECORD_FIELDS],
    height_scan_max: Option<usize>,
) -> Option<(usize, [usize; N_RECORD_FIELDS])> {
    let n_rows_scan = height_scan_max.map_or(rows.len(), |n| n.min(rows.len()));
    rows.iter()
        .take(n_rows_scan)
        .enumerate()
        .find_map(|(n_offset, row)| {
            match_header_columns(row, labels_norm).map(|cols| (n_offset, cols))
        })
}

/// Pick the cells at `cols_idx`; short rows yield [`EnumCellValue::None`].
pub fn select_cells(
    row: &[EnumCellValue],
    cols_idx: &[usize; N_RECORD_FIELDS],
) -> [EnumCellValue; N_RECORD_FIELDS] {
    cols_idx.map(|n_col| row.get(n_col).cloned().unwrap_or(EnumCellValue::None))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
