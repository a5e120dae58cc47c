//! Render report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use docfill_io_xlsx::SpecRowSkip;

use crate::spec::SpecRenderError;

/// Aggregate counters and diagnostics for one render run.
#[derive(Debug, Default, Clone)]
pub struct ReportRender {
    /// Records extracted from the spreadsheet.
    pub cnt_records: u64,
    /// Output documents planned (after collision handling).
    pub cnt_planned: u64,
    /// Output documents written.
    pub cnt_rendered: u64,
    /// Spreadsheet rows skipped for a blank business name.
    pub cnt_skipped: u64,
    /// Written paths, in record order.
    pub paths_rendered: Vec<PathBuf>,
    /// Skipped spreadsheet rows.
    pub rows_skipped: Vec<SpecRowSkip>,
    /// Non-fatal warnings (collisions, unfilled placeholders, pool fallback).
    pub warnings: Vec<String>,
    /// Per-record failures.
    pub errors: Vec<SpecRenderError>,
}

impl ReportRender {
    /// Number of collected per-record errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_records".to_string(), self.cnt_records);
        dict_counts.insert("cnt_planned".to_string(), self.cnt_planned);
        dict_counts.insert("cnt_rendered".to_string(), self.cnt_rendered);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} records={} planned={} rendered={} skipped={} errors={} warnings={}",
            dict_counts["cnt_records"],
            dict_counts["cnt_planned"],
            dict_counts["cnt_rendered"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[RENDER]"))
    }
}

/// Mutable accumulator for render statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportRenderBuilder {
    /// See [`ReportRender::cnt_records`].
    pub cnt_records: u64,
    /// See [`ReportRender::cnt_planned`].
    pub cnt_planned: u64,
    /// See [`ReportRender::paths_rendered`].
    pub paths_rendered: Vec<PathBuf>,
    /// See [`ReportRender::rows_skipped`].
    pub rows_skipped: Vec<SpecRowSkip>,
    /// See [`ReportRender::warnings`].
    pub warnings: Vec<String>,
    /// See [`ReportRender::errors`].
    pub errors: Vec<SpecRenderError>,
}

impl ReportRenderBuilder {
    /// Increment planned count by one.
    pub fn add_planned(&mut self) {
        self.cnt_planned += 1;
    }

    /// Record one written document.
    pub fn add_rendered(&mut self, path: PathBuf) {
        self.paths_rendered.push(path);
    }

    /// Record one skipped spreadsheet row.
    pub fn add_skipped(&mut self, row_skip: SpecRowSkip) {
        self.rows_skipped.push(row_skip);
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one record-scoped error.
    pub fn add_error(&mut self, row_idx: usize, path: PathBuf, exception: String) {
        self.errors.push(SpecRenderError {
            row_idx,
            path,
            exception,
        });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportRender {
        ReportRender {
            cnt_records: self.cnt_records,
            cnt_planned: self.cnt_planned,
            cnt_rendered: self.paths_rendered.len() as u64,
            cnt_skipped: self.rows_skipped.len() as u64,
            paths_rendered: self.paths_rendered,
            rows_skipped: self.rows_skipped,
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use docfill_io_xlsx::SpecRowSkip;

    use super::{ReportRender, ReportRenderBuilder};

    #[test]
    fn report_render_to_dict_and_format() {
        let report = ReportRender {
            cnt_records: 5,
            cnt_planned: 4,
            cnt_rendered: 3,
            cnt_skipped: 1,
            warnings: vec!["w".to_string()],
            ..ReportRender::default()
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_records"], 5);
        assert_eq!(dict_counts["cnt_planned"], 4);
        assert_eq!(dict_counts["cnt_rendered"], 3);
        assert_eq!(dict_counts["cnt_skipped"], 1);
        assert_eq!(dict_counts["cnt_errors"], 0);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[RENDER]");
        assert_eq!(
            txt,
            "[RENDER] records=5 planned=4 rendered=3 skipped=1 errors=0 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn report_builder_derives_counts_from_collected_items() {
        let mut builder = ReportRenderBuilder {
            cnt_records: 2,
            ..ReportRenderBuilder::default()
        };
        builder.add_planned();
        builder.add_planned();
        builder.add_rendered(PathBuf::from("out/Acme.docx"));
        builder.add_error(4, PathBuf::from("out/Beta.docx"), "disk full".to_string());
        builder.add_skipped(SpecRowSkip {
            row_idx: 3,
            reason: "business name is blank".to_string(),
        });

        let report = builder.build();
        assert_eq!(report.cnt_planned, 2);
        assert_eq!(report.cnt_rendered, 1);
        assert_eq!(report.cnt_skipped, 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors[0].row_idx, 4);
    }
}
