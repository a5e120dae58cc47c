//! `docfill`: fill one Word document per spreadsheet row.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use docfill_io_docx::{C_EXT_DOCX, C_MARKER_DEFAULT, N_LEN_PLACEHOLDER_MIN, SpecFillOptions};
use docfill_io_fs::{
    C_DIR_OUTPUT_DEFAULT, EnumFilenameCollisionStrategy, ReportRender, SpecRenderOptions,
    render_documents,
};
use docfill_io_xlsx::{
    C_LABEL_BUSINESS_NAME, C_LABEL_FIELD3, C_LABEL_FIELD4, C_LABEL_YEAR, SpecExtractOptions,
    SpecHeaderLabels,
};

const N_EXIT_FATAL: u8 = 1;
const N_EXIT_ROW_FAILURES: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "docfill")]
#[command(version)]
#[command(about = "Generate one filled Word document per spreadsheet row")]
#[command(long_about = None)]
struct Cli {
    /// Spreadsheet with a header row and one record per data row
    excel_path: PathBuf,

    /// Word template containing placeholder runs (`____`)
    template_path: PathBuf,

    /// Worker threads (defaults to available parallelism)
    #[arg(long, short = 'w')]
    workers: Option<usize>,

    /// Directory receiving generated documents
    #[arg(long, short = 'o', default_value = C_DIR_OUTPUT_DEFAULT)]
    output_dir: PathBuf,

    /// Worksheet name (defaults to the first worksheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Header label of the business-name column
    #[arg(long, default_value = C_LABEL_BUSINESS_NAME)]
    header_business_name: String,

    /// Header label of the year column
    #[arg(long, default_value = C_LABEL_YEAR)]
    header_year: String,

    /// Header label of the third field column
    #[arg(long, default_value = C_LABEL_FIELD3)]
    header_field3: String,

    /// Header label of the fourth field column
    #[arg(long, default_value = C_LABEL_FIELD4)]
    header_field4: String,

    /// Placeholder marker character
    #[arg(long, default_value_t = C_MARKER_DEFAULT)]
    marker: char,

    /// What to do when two rows map to the same file name
    #[arg(long, value_enum, default_value_t = CollisionArg::Overwrite)]
    on_collision: CollisionArg,

    /// Also fill placeholders in page headers and footers
    #[arg(long)]
    include_headers_footers: bool,

    /// Report planned outputs without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CollisionArg {
    Overwrite,
    Suffix,
    Error,
}

impl From<CollisionArg> for EnumFilenameCollisionStrategy {
    fn from(value: CollisionArg) -> Self {
        match value {
            CollisionArg::Overwrite => Self::Overwrite,
            CollisionArg::Suffix => Self::Suffix,
            CollisionArg::Error => Self::Error,
        }
    }
}

impl Cli {
    fn to_render_options(&self) -> SpecRenderOptions {
        let mut fill_options = SpecFillOptions {
            if_scan_headers_footers: self.include_headers_footers,
            ..SpecFillOptions::default()
        };
        fill_options.rule_placeholder.marker = self.marker;
        fill_options.rule_placeholder.len_min = N_LEN_PLACEHOLDER_MIN;

        SpecRenderOptions {
            dir_output: self.output_dir.clone(),
            ext_output: C_EXT_DOCX.to_string(),
            num_workers_max: self.workers,
            rule_collision: self.on_collision.into(),
            if_dry_run: self.dry_run,
            extract_options: SpecExtractOptions {
                header_labels: SpecHeaderLabels {
                    business_name: self.header_business_name.clone(),
                    year: self.header_year.clone(),
                    field3: self.header_field3.clone(),
                    field4: self.header_field4.clone(),
                },
                sheet_name: self.sheet.clone(),
                height_header_scan_max: None,
            },
            fill_options,
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ReportRender> {
    let spec_render_options = cli.to_render_options();
    tracing::debug!(?spec_render_options, "resolved options");

    render_documents(&cli.excel_path, &cli.template_path, &spec_render_options).with_context(
        || {
            format!(
                "Failed to render {} with template {}",
                cli.excel_path.display(),
                cli.template_path.display()
            )
        },
    )
}

fn print_report(report: &ReportRender, if_dry_run: bool) {
    let prefix = if if_dry_run { "[DRY-RUN]" } else { "[RENDER]" };
    println!("{}", report.format(prefix));
    for row_skip in &report.rows_skipped {
        println!("  skipped row {}: {}", row_skip.row_idx, row_skip.reason);
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    for spec_error in &report.errors {
        println!(
            "  failed row {} ({}): {}",
            spec_error.row_idx,
            spec_error.path.display(),
            spec_error.exception
        );
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = docfill_log::init_logging(cli.verbose) {
        eprintln!("warning: logging not initialized: {e}");
    }

    match run(&cli) {
        Ok(report) => {
            print_report(&report, cli.dry_run);
            if report.error_count() > 0 {
                ExitCode::from(N_EXIT_ROW_FAILURES)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(N_EXIT_FATAL)
        }
    }
}
