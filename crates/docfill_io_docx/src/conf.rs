//! Word package constants and default presets.

use crate::spec::SpecFillOptions;

/// Main document part inside a `.docx` package.
pub const C_PART_DOCUMENT: &str = "word/document.xml";
/// Name prefix of header parts.
pub const C_PART_HEADER_PREFIX: &str = "word/header";
/// Name prefix of footer parts.
pub const C_PART_FOOTER_PREFIX: &str = "word/footer";
/// Extension of every scanned XML part.
pub const C_PART_XML_SUFFIX: &str = ".xml";

/// Qualified name of a WordprocessingML text node.
pub const TAG_TEXT: &[u8] = b"w:t";

/// Default placeholder marker character.
pub const C_MARKER_DEFAULT: char = '_';
/// Shortest marker run treated as a placeholder.
pub const N_LEN_PLACEHOLDER_MIN: usize = 4;

/// Default output document extension (without dot).
pub const C_EXT_DOCX: &str = "docx";

/// Build default fill options.
pub fn derive_default_fill_options() -> SpecFillOptions {
    SpecFillOptions::default()
}
