use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::conf::{C_FILE_STEM_FALLBACK, N_SUFFIX_COLLISION_START, TUP_FILENAME_ILLEGAL};
use crate::report::ReportRenderBuilder;
use crate::spec::{EnumFilenameCollisionStrategy, RenderRunError};

////////////////////////////////////////////////////////////////////////////////
// #region FilenameSanitizing

/// Strip illegal/control chars and trailing whitespace from a business name.
///
/// Falls back to `unnamed` when nothing is left.
pub fn sanitize_file_stem(name: &str) -> String {
    let c_stem: String = name
        .chars()
        .filter(|c| !TUP_FILENAME_ILLEGAL.contains(c) && !c.is_control())
        .collect();
    let c_stem = c_stem.trim_end();
    if c_stem.is_empty() {
        return C_FILE_STEM_FALLBACK.to_string();
    }
    c_stem.to_string()
}

/// Normalize an output extension to its bare form (`".docx"` -> `"docx"`).
pub fn normalize_extension(ext: &str) -> Result<String, RenderRunError> {
    let c_ext = ext.trim().trim_start_matches('.');
    if c_ext.is_empty()
        || c_ext
            .chars()
            .any(|c| TUP_FILENAME_ILLEGAL.contains(&c) || c.is_control() || c.is_whitespace())
    {
        return Err(RenderRunError::InvalidExtension(ext.to_string()));
    }
    Ok(c_ext.to_string())
}

/// Filesystem-safe file name `<sanitized-name>.<ext>`.
///
/// `ext` is taken as given; see [`normalize_extension`].
pub fn sanitize_filename(name: &str, ext: &str) -> String {
    format!("{}.{ext}", sanitize_file_stem(name))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OutputPlanning

/// Tracks names claimed within one run and applies the collision strategy.
#[derive(Debug)]
pub(crate) struct SpecFilenamePlanner<'a> {
    path_dir_output: &'a Path,
    c_ext: &'a str,
    rule_collision: EnumFilenameCollisionStrategy,
    dict_claimed: HashMap<String, usize>,
}

impl<'a> SpecFilenamePlanner<'a> {
    pub(crate) fn new(
        path_dir_output: &'a Path,
        c_ext: &'a str,
        rule_collision: EnumFilenameCollisionStrategy,
    ) -> Self {
        Self {
            path_dir_output,
            c_ext,
            rule_collision,
            dict_claimed: HashMap::new(),
        }
    }

    /// Claim an output path for `business_name` at `row_idx`.
    ///
    /// Returns `None` when the record must not be written; the reason is
    /// recorded in `builder_render_report`.
    pub(crate) fn claim(
        &mut self,
        business_name: &str,
        row_idx: usize,
        builder_render_report: &mut ReportRenderBuilder,
    ) -> Option<PathBuf> {
        let c_stem = sanitize_file_stem(business_name);
        let c_file_name = format!("{c_stem}.{}", self.c_ext);
        let path_file_out = self.path_dir_output.join(&c_file_name);
        let c_key = c_file_name.to_lowercase();

        let Some(&n_row_prev) = self.dict_claimed.get(&c_key) else {
            if self.rule_collision == EnumFilenameCollisionStrategy::Suffix
                && path_file_out.exists()
            {
                return Some(self.claim_with_suffix(&c_stem, row_idx));
            }
            self.dict_claimed.insert(c_key, row_idx);
            return Some(path_file_out);
        };

        match self.rule_collision {
            EnumFilenameCollisionStrategy::Overwrite => {
                builder_render_report.add_warning(format!(
                    "Rows {n_row_prev} and {row_idx} both write {}; last write wins.",
                    path_file_out.display()
                ));
                self.dict_claimed.insert(c_key, row_idx);
                Some(path_file_out)
            }
            EnumFilenameCollisionStrategy::Suffix => Some(self.claim_with_suffix(&c_stem, row_idx)),
            EnumFilenameCollisionStrategy::Error => {
                builder_render_report.add_error(
                    row_idx,
                    path_file_out,
                    format!("File name collides with row {n_row_prev}: {c_file_name}"),
                );
                None
            }
        }
    }

    fn claim_with_suffix(&mut self, c_stem: &str, row_idx: usize) -> PathBuf {
        let mut n_suffix = N_SUFFIX_COLLISION_START;
        loop {
            let c_file_name = format!("{c_stem} ({n_suffix}).{}", self.c_ext);
            let c_key = c_file_name.to_lowercase();
            let path_file_out = self.path_dir_output.join(&c_file_name);
            if !self.dict_claimed.contains_key(&c_key) && !path_file_out.exists() {
                self.dict_claimed.insert(c_key, row_idx);
                return path_file_out;
            }
            n_suffix += 1;
        }
    }
}

/// Create the output directory; an already existing directory is fine.
pub(crate) fn create_output_dir(path_dir_output: &Path) -> Result<(), RenderRunError> {
    fs::create_dir_all(path_dir_output).map_err(|e| RenderRunError::OutputInitFailed {
        path: path_dir_output.to_path_buf(),
        message: e.to_string(),
    })?;
    if !path_dir_output.is_dir() {
        return Err(RenderRunError::OutputInitFailed {
            path: path_dir_output.to_path_buf(),
            message: "Output path is not a directory.".to_string(),
        });
    }
    Ok(())
}

/// Resolve worker count once: explicit values clamp to >= 1, `None` uses host
/// parallelism.
pub fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    match num_workers_max {
        Some(n) => n.max(1),
        None => std::thread::available_parallelism()
            .map(|v| v.get())
            .unwrap_or(1),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_strips_illegal_chars_and_trailing_space() {
        assert_eq!(sanitize_filename("Beta/Inc", "docx"), "BetaInc.docx");
        assert_eq!(sanitize_filename("Acme Co", "docx"), "Acme Co.docx");
        assert_eq!(
            sanitize_filename(r#"A:B\C*D?E"F<G>H|I  "#, "docx"),
            "ABCDEFGHI.docx"
        );
        assert_eq!(sanitize_filename("Tab\tName \t", "docx"), "TabName.docx");
        assert_eq!(sanitize_filename("???", "docx"), "unnamed.docx");
    }

    #[test]
    fn sanitize_file_stem_never_yields_illegal_output() {
        let l_inputs = [
            "  lead",
            "x/ ",
            "<>|",
            "a\u{0}b",
            "Caf\u{e9} \"Le Nord\" ",
            "dots.",
        ];
        for c_input in l_inputs {
            let c_stem = sanitize_file_stem(c_input);
            assert!(!c_stem.is_empty());
            assert!(!c_stem.chars().any(|c| TUP_FILENAME_ILLEGAL.contains(&c)));
            assert_eq!(c_stem.trim_end(), c_stem);
        }
    }

    #[test]
    fn normalize_extension_accepts_dot_and_rejects_garbage() {
        assert_eq!(normalize_extension(".docx").expect("ext"), "docx");
        assert_eq!(normalize_extension("docm").expect("ext"), "docm");
        assert!(normalize_extension("").is_err());
        assert!(normalize_extension("...").is_err());
        assert!(normalize_extension("do/cx").is_err());
    }

    #[test]
    fn calculate_worker_limit_clamps_explicit_values() {
        assert_eq!(calculate_worker_limit(Some(0)), 1);
        assert_eq!(calculate_worker_limit(Some(3)), 3);
        assert!(calculate_worker_limit(None) >= 1);
    }

    #[test]
    fn planner_overwrite_warns_and_keeps_name() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut builder = ReportRenderBuilder::default();
        let mut planner =
            SpecFilenamePlanner::new(tmp.path(), "docx", EnumFilenameCollisionStrategy::Overwrite);

        let path_a = planner.claim("Acme", 2, &mut builder).expect("claim");
        let path_b = planner.claim("ACME", 3, &mut builder).expect("claim");
        assert_eq!(path_a, tmp.path().join("Acme.docx"));
        assert_eq!(path_b, tmp.path().join("ACME.docx"));
        assert_eq!(builder.warnings.len(), 1);
        assert!(builder.errors.is_empty());
    }

    #[test]
    fn planner_suffix_avoids_run_and_disk_collisions() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("Beta.docx"), b"old").expect("write");
        let mut builder = ReportRenderBuilder::default();
        let mut planner =
            SpecFilenamePlanner::new(tmp.path(), "docx", EnumFilenameCollisionStrategy::Suffix);

        let path_a = planner.claim("Acme", 2, &mut builder).expect("claim");
        let path_b = planner.claim("Acme/", 3, &mut builder).expect("claim");
        let path_c = planner.claim("acme", 4, &mut builder).expect("claim");
        let path_d = planner.claim("Beta", 5, &mut builder).expect("claim");
        assert_eq!(path_a, tmp.path().join("Acme.docx"));
        assert_eq!(path_b, tmp.path().join("Acme (2).docx"));
        assert_eq!(path_c, tmp.path().join("acme (3).docx"));
        assert_eq!(path_d, tmp.path().join("Beta (2).docx"));
        assert!(builder.warnings.is_empty());
    }

    #[test]
    fn planner_error_rejects_later_duplicates() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut builder = ReportRenderBuilder::default();
        let mut planner =
            SpecFilenamePlanner::new(tmp.path(), "docx", EnumFilenameCollisionStrategy::Error);

        assert!(planner.claim("Acme", 2, &mut builder).is_some());
        assert!(planner.claim("Acme ", 3, &mut builder).is_none());
        assert_eq!(builder.errors.len(), 1);
        assert_eq!(builder.errors[0].row_idx, 3);
        assert!(builder.errors[0].exception.contains("row 2"));
    }

    #[test]
    fn create_output_dir_tolerates_existing_and_rejects_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_dir = tmp.path().join("out");
        create_output_dir(&path_dir).expect("create");
        create_output_dir(&path_dir).expect("create again");

        let path_file = tmp.path().join("file");
        std::fs::write(&path_file, b"x").expect("write");
        assert!(matches!(
            create_output_dir(&path_file),
            Err(RenderRunError::OutputInitFailed { .. })
        ));
    }
}
