//! Template-fill options, reports and top-level error types.

use std::fmt;
use std::path::PathBuf;

use crate::conf::{C_MARKER_DEFAULT, N_LEN_PLACEHOLDER_MIN};

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Placeholder recognition rule: a maximal run of `marker` at least
/// `len_min` chars long, inside one text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecPlaceholderRule {
    /// Marker character.
    pub marker: char,
    /// Minimum run length (must be >= 1).
    pub len_min: usize,
}

impl Default for SpecPlaceholderRule {
    fn default() -> Self {
        Self {
            marker: C_MARKER_DEFAULT,
            len_min: N_LEN_PLACEHOLDER_MIN,
        }
    }
}

/// Input options for [`crate::filler::DocxTemplate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecFillOptions {
    /// Placeholder recognition rule.
    pub rule_placeholder: SpecPlaceholderRule,
    /// Also scan header and footer parts, after the body.
    pub if_scan_headers_footers: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reports

/// Placeholder/value count disagreement for one fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPlaceholderMismatch {
    /// More placeholders than values; the rest stay literal.
    UnfilledPlaceholders(usize),
    /// More values than placeholders; the rest are dropped.
    UnusedValues(usize),
}

impl fmt::Display for EnumPlaceholderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnfilledPlaceholders(n) => {
                write!(f, "{n} placeholder(s) left unfilled (not enough values)")
            }
            Self::UnusedValues(n) => write!(f, "{n} value(s) unused (not enough placeholders)"),
        }
    }
}

/// Per-fill counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecFillReport {
    /// Placeholders found across scanned parts.
    pub cnt_placeholders: usize,
    /// Placeholders replaced by a value.
    pub cnt_replaced: usize,
    /// Values supplied by the caller.
    pub cnt_values: usize,
}

impl SpecFillReport {
    /// Count disagreement, if any.
    pub fn mismatch(&self) -> Option<EnumPlaceholderMismatch> {
        if self.cnt_placeholders > self.cnt_replaced {
            return Some(EnumPlaceholderMismatch::UnfilledPlaceholders(
                self.cnt_placeholders - self.cnt_replaced,
            ));
        }
        if self.cnt_values > self.cnt_replaced {
            return Some(EnumPlaceholderMismatch::UnusedValues(
                self.cnt_values - self.cnt_replaced,
            ));
        }
        None
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Template load/fill/save failures.
#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    /// Template file could not be read.
    #[error("Failed to read template {}: {source}", .path.display())]
    TemplateRead {
        /// Template path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Placeholder rule is unusable.
    #[error("Invalid placeholder rule: {0}")]
    InvalidRule(String),
    /// Package lacks a required part.
    #[error("Template is missing part {0:?}")]
    MissingPart(String),
    /// Zip container error.
    #[error("Invalid document package: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// XML part could not be parsed or rewritten.
    #[error("Failed to process XML part {part:?}: {message}")]
    Xml {
        /// Part name inside the package.
        part: String,
        /// Underlying parser/writer error text.
        message: String,
    },
    /// In-memory package IO error.
    #[error("Package IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Filled document could not be written.
    #[error("Failed to save {}: {source}", .path.display())]
    Save {
        /// Output path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
