//! Render specification models and top-level error types.

use std::path::PathBuf;

use docfill_io_docx::{C_EXT_DOCX, DocxError, SpecFillOptions};
use docfill_io_xlsx::{SpecExtractOptions, XlsxReadError};

use crate::conf::C_DIR_OUTPUT_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Policy for records whose sanitized file names collide.
///
/// Names are compared case-insensitively, matching common desktop filesystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumFilenameCollisionStrategy {
    /// Write every record; whichever write finishes last wins. A warning is
    /// recorded per collision.
    #[default]
    Overwrite,
    /// Append ` (2)`, ` (3)`, ... until the name is unused in this run and on disk.
    Suffix,
    /// Record an error for every later duplicate and do not write it.
    Error,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for [`crate::render::render_documents`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRenderOptions {
    /// Directory receiving generated documents; created if absent.
    pub dir_output: PathBuf,
    /// Output extension, with or without a leading dot.
    pub ext_output: String,
    /// Worker threads; host parallelism when `None`.
    pub num_workers_max: Option<usize>,
    /// Collision behavior for sanitized file names.
    pub rule_collision: EnumFilenameCollisionStrategy,
    /// Plan outputs and report them, but write nothing.
    pub if_dry_run: bool,
    /// Spreadsheet extraction options.
    pub extract_options: SpecExtractOptions,
    /// Template fill options.
    pub fill_options: SpecFillOptions,
}

impl Default for SpecRenderOptions {
    fn default() -> Self {
        Self {
            dir_output: PathBuf::from(C_DIR_OUTPUT_DEFAULT),
            ext_output: C_EXT_DOCX.to_string(),
            num_workers_max: None,
            rule_collision: EnumFilenameCollisionStrategy::Overwrite,
            if_dry_run: false,
            extract_options: SpecExtractOptions::default(),
            fill_options: SpecFillOptions::default(),
        }
    }
}

/// One per-record failure with row, path and error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRenderError {
    /// 1-based worksheet row of the record.
    pub row_idx: usize,
    /// Planned output path.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// "Whole run failed" errors, raised before any worker is dispatched.
#[derive(Debug, thiserror::Error)]
pub enum RenderRunError {
    /// Spreadsheet unreadable or header row missing.
    #[error(transparent)]
    Extract(#[from] XlsxReadError),
    /// Template unreadable or invalid.
    #[error(transparent)]
    Template(#[from] DocxError),
    /// Output extension is empty or contains illegal characters.
    #[error("Invalid output extension: {0:?}")]
    InvalidExtension(String),
    /// Output directory initialization failed.
    #[error("Failed to initialize output directory {}: {message}", .path.display())]
    OutputInitFailed {
        /// Output directory path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
