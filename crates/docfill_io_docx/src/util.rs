//! Stateless helpers for placeholder scanning and value formatting.

use regex::Regex;

use crate::conf::{C_PART_FOOTER_PREFIX, C_PART_HEADER_PREFIX, C_PART_XML_SUFFIX};
use crate::spec::{DocxError, SpecPlaceholderRule};

////////////////////////////////////////////////////////////////////////////////
// #region PlaceholderScanning

/// Compile the regex matching maximal marker runs of at least `len_min` chars.
pub fn compile_placeholder_regex(rule: &SpecPlaceholderRule) -> Result<Regex, DocxError> {
    if rule.len_min == 0 {
        return Err(DocxError::InvalidRule(
            "`len_min` must be >= 1.".to_string(),
        ));
    }
    let c_pattern = format!(
        "{}{{{},}}",
        regex::escape(&rule.marker.to_string()),
        rule.len_min
    );
    Regex::new(&c_pattern).map_err(|e| DocxError::InvalidRule(e.to_string()))
}

/// Strip a trailing `.0` from integral numeric text (`"2024.0"` -> `"2024"`).
///
/// Anything else is returned unchanged.
pub fn format_value(value: &str) -> String {
    if let Some(c_head) = value.strip_suffix(".0") {
        if c_head.parse::<i64>().is_ok() {
            return c_head.to_string();
        }
    }
    value.to_string()
}

/// Replace placeholder runs in `text` with `values[*n_cursor..]`, in order.
///
/// Advances `n_cursor` for every replacement. Placeholders found after the
/// values run out are kept literally.
///
/// Returns `(new_text, n_found, n_replaced)`.
pub fn replace_placeholder_runs(
    text: &str,
    regex_placeholder: &Regex,
    values: &[String],
    n_cursor: &mut usize,
) -> (String, usize, usize) {
    let mut c_out = String::with_capacity(text.len());
    let mut n_pos_last = 0;
    let mut n_found = 0;
    let mut n_replaced = 0;

    for match_run in regex_placeholder.find_iter(text) {
        n_found += 1;
        let Some(c_value) = values.get(*n_cursor) else {
            continue;
        };
        c_out.push_str(&text[n_pos_last..match_run.start()]);
        c_out.push_str(c_value);
        n_pos_last = match_run.end();
        *n_cursor += 1;
        n_replaced += 1;
    }
    c_out.push_str(&text[n_pos_last..]);

    (c_out, n_found, n_replaced)
}

/// `true` when XML would drop leading/trailing whitespace without
/// `xml:space="preserve"`.
pub fn needs_space_preserve(text: &str) -> bool {
    text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PackageParts

fn _is_part_with_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(C_PART_XML_SUFFIX))
        .is_some_and(|stem| !stem.contains('/'))
}

/// Select header and footer parts, headers first, each in numeric order.
pub fn select_header_footer_parts<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut l_headers = Vec::new();
    let mut l_footers = Vec::new();
    for c_name in names {
        if _is_part_with_prefix(c_name, C_PART_HEADER_PREFIX) {
            l_headers.push(c_name.to_string());
        } else if _is_part_with_prefix(c_name, C_PART_FOOTER_PREFIX) {
            l_footers.push(c_name.to_string());
        }
    }
    // `header2.xml` before `header10.xml`
    l_headers.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    l_footers.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    l_headers.extend(l_footers);
    l_headers
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
