//! Workbook reader that maps worksheet rows onto [`SpecRecord`]s.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::spec::{
    EnumCellValue, ReportExtract, SpecExtractOptions, SpecRecord, SpecRowSkip, XlsxReadError,
};
use crate::util::{locate_header_row, render_cell_text, select_cells, validate_header_labels};

/// Read one worksheet and extract its records.
///
/// The worksheet is `options.sheet_name` or the first one in the workbook.
/// Header detection and row mapping follow [`extract_records`]. Rows are
/// numbered as in the worksheet (1-based), even when the used range does not
/// start at `A1`.
pub fn read_records<P: AsRef<Path>>(
    path_file_xlsx: P,
    options: &SpecExtractOptions,
) -> Result<ReportExtract, XlsxReadError> {
    let path_file_xlsx = path_file_xlsx.as_ref();
    let mut workbook = open_workbook_auto(path_file_xlsx).map_err(|e| XlsxReadError::Open {
        path: path_file_xlsx.to_path_buf(),
        message: e.to_string(),
    })?;

    let l_sheet_names = workbook.sheet_names();
    let c_sheet_name = match &options.sheet_name {
        Some(name) => {
            if !l_sheet_names.iter().any(|c| c == name) {
                return Err(XlsxReadError::SheetNotFound(name.clone()));
            }
            name.clone()
        }
        None => l_sheet_names
            .first()
            .cloned()
            .ok_or_else(|| XlsxReadError::NoWorksheet(path_file_xlsx.to_path_buf()))?,
    };

    let range = workbook
        .worksheet_range(&c_sheet_name)
        .map_err(|e| XlsxReadError::SheetRead {
            sheet_name: c_sheet_name.clone(),
            message: e.to_string(),
        })?;
    tracing::debug!(
        sheet = %c_sheet_name,
        height = range.height(),
        width = range.width(),
        "worksheet loaded"
    );

    let (l_rows, n_row_offset) = convert_range_rows(&range);
    _extract_records(&l_rows, n_row_offset, options)
}

/// Extract records from in-memory rows, where `rows[0]` is worksheet row 1.
///
/// - The header is the first row containing every expected label
///   (case/whitespace-insensitive, any column order).
/// - Each later row becomes one record; rows whose mapped cells are all blank
///   are ignored, rows with a blank business name are skipped and reported.
///
/// Fails with [`XlsxReadError::HeaderNotFound`] when no header row exists.
pub fn extract_records(
    rows: &[Vec<EnumCellValue>],
    options: &SpecExtractOptions,
) -> Result<ReportExtract, XlsxReadError> {
    _extract_records(rows, 0, options)
}

fn _extract_records(
    rows: &[Vec<EnumCellValue>],
    n_row_offset: usize,
    options: &SpecExtractOptions,
) -> Result<ReportExtract, XlsxReadError> {
    let l_labels_norm = validate_header_labels(&options.header_labels)?;
    let Some((n_offset_header, l_cols_idx)) =
        locate_header_row(rows, &l_labels_norm, options.height_header_scan_max)
    else {
        return Err(XlsxReadError::HeaderNotFound {
            labels: options
                .header_labels
                .as_array()
                .iter()
                .map(ToString::to_string)
                .collect(),
        });
    };

    let mut report = ReportExtract {
        n_row_header: n_row_offset + n_offset_header + 1,
        ..ReportExtract::default()
    };
    tracing::info!(
        row = report.n_row_header,
        columns = ?l_cols_idx,
        "header row located"
    );

    for (n_offset, row) in rows.iter().enumerate().skip(n_offset_header + 1) {
        let n_row_idx = n_row_offset + n_offset + 1;
        report.cnt_rows_scanned += 1;

        let [cell_name, cell_year, cell_field3, cell_field4] = select_cells(row, &l_cols_idx);
        if [&cell_name, &cell_year, &cell_field3, &cell_field4]
            .iter()
            .all(|c| c.is_blank())
        {
            report.cnt_rows_blank += 1;
            continue;
        }

        let c_business_name = render_cell_text(&cell_name);
        if c_business_name.is_empty() {
            tracing::warn!(row = n_row_idx, "row skipped: business name is blank");
            report.skipped.push(SpecRowSkip {
                row_idx: n_row_idx,
                reason: "business name is blank".to_string(),
            });
            continue;
        }

        let year = match cell_year {
            EnumCellValue::String(s) => EnumCellValue::String(s.trim().to_string()),
            other => other,
        };
        report.records.push(SpecRecord {
            row_idx: n_row_idx,
            business_name: c_business_name,
            year,
            field3: render_cell_text(&cell_field3),
            field4: render_cell_text(&cell_field4),
        });
    }

    Ok(report)
}

/// Convert a calamine range into owned rows plus the 0-based row offset of
/// its first row within the worksheet.
fn convert_range_rows(range: &Range<Data>) -> (Vec<Vec<EnumCellValue>>, usize) {
    let n_row_offset = range.start().map_or(0, |(n_row, _)| n_row as usize);
    let l_rows = range
        .rows()
        .map(|row| row.iter().map(convert_cell_value).collect())
        .collect();
    (l_rows, n_row_offset)
}

/// Normalize a calamine cell. Error cells count as blank.
fn convert_cell_value(cell: &Data) -> EnumCellValue {
    match cell {
        Data::Empty | Data::Error(_) => EnumCellValue::None,
        Data::String(s) => EnumCellValue::String(s.clone()),
        Data::Float(f) => EnumCellValue::Number(*f),
        Data::Int(n) => EnumCellValue::Number(*n as f64),
        Data::Bool(b) => EnumCellValue::String(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => EnumCellValue::String(other.to_string()),
    }
}
