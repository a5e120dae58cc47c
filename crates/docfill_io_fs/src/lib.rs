//! `docfill_io_fs` v1:
//! Row-to-document render engine.
//!
//! Module layout:
//! - `render` : extraction, planning and worker-pool orchestration
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : file-name sanitizing and output planning helpers

pub mod conf;
pub mod render;
pub mod report;
pub mod spec;
mod util;

pub use conf::{C_DIR_OUTPUT_DEFAULT, derive_default_render_options};
pub use render::{render_documents, render_records};
pub use report::{ReportRender, ReportRenderBuilder};
pub use spec::{EnumFilenameCollisionStrategy, RenderRunError, SpecRenderError, SpecRenderOptions};
pub use util::{calculate_worker_limit, normalize_extension, sanitize_file_stem, sanitize_filename};
