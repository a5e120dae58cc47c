//! Row-to-document orchestration over a fixed-size worker pool.

use std::path::{Path, PathBuf};

use docfill_io_docx::{DocxTemplate, EnumPlaceholderMismatch, SpecFillReport};
use docfill_io_xlsx::{ReportExtract, read_records};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::report::{ReportRender, ReportRenderBuilder};
use crate::spec::{RenderRunError, SpecRenderOptions};
use crate::util::{
    SpecFilenamePlanner, calculate_worker_limit, create_output_dir, normalize_extension,
};

#[derive(Debug, Clone)]
struct SpecRenderTask {
    row_idx: usize,
    values: Vec<String>,
    path_file_out: PathBuf,
}

type TypeRenderResult = (usize, PathBuf, Result<SpecFillReport, String>);

/// Generate one document per spreadsheet row.
///
/// This function performs:
/// 1. Template load and validation.
/// 2. Row extraction (header detection, record mapping).
/// 3. Output directory creation and file-name planning.
/// 4. Per-record fill/save on a pool of `num_workers_max` threads.
/// 5. Report aggregation.
///
/// Returns [`ReportRender`] when the run completes (with possible per-record
/// errors stored in the report). Returns [`RenderRunError`] only for failures
/// that concern the whole input, before any worker starts.
pub fn render_documents<P, Q>(
    path_file_xlsx: P,
    path_file_template: Q,
    spec_render_options: &SpecRenderOptions,
) -> Result<ReportRender, RenderRunError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template =
        DocxTemplate::from_path(path_file_template, &spec_render_options.fill_options)?;
    let report_extract = read_records(path_file_xlsx, &spec_render_options.extract_options)?;
    let n_workers = calculate_worker_limit(spec_render_options.num_workers_max);

    render_records(&report_extract, &template, spec_render_options, n_workers)
}

/// Render already extracted records with an explicit worker count.
///
/// Skipped rows from `report_extract` are carried into the report. Workers
/// share `template` read-only; each fill works on its own in-memory copy.
pub fn render_records(
    report_extract: &ReportExtract,
    template: &DocxTemplate,
    spec_render_options: &SpecRenderOptions,
    n_workers: usize,
) -> Result<ReportRender, RenderRunError> {
    let c_ext = normalize_extension(&spec_render_options.ext_output)?;
    let path_dir_output = spec_render_options.dir_output.as_path();
    if !spec_render_options.if_dry_run {
        create_output_dir(path_dir_output)?;
    }

    let mut builder_render_report = ReportRenderBuilder {
        cnt_records: report_extract.records.len() as u64,
        ..ReportRenderBuilder::default()
    };
    for row_skip in &report_extract.skipped {
        builder_render_report.add_skipped(row_skip.clone());
    }

    let mut planner = SpecFilenamePlanner::new(
        path_dir_output,
        &c_ext,
        spec_render_options.rule_collision,
    );
    let mut l_tasks_render = Vec::with_capacity(report_extract.records.len());
    for record in &report_extract.records {
        let Some(path_file_out) =
            planner.claim(&record.business_name, record.row_idx, &mut builder_render_report)
        else {
            continue;
        };
        builder_render_report.add_planned();
        l_tasks_render.push(SpecRenderTask {
            row_idx: record.row_idx,
            values: record.to_values(),
            path_file_out,
        });
    }

    if spec_render_options.if_dry_run {
        for spec_task in &l_tasks_render {
            tracing::info!(
                row = spec_task.row_idx,
                "Would create: {}",
                spec_task.path_file_out.display()
            );
        }
        return Ok(builder_render_report.build());
    }

    tracing::debug!(
        tasks = l_tasks_render.len(),
        workers = n_workers,
        "dispatching render tasks"
    );
    let l_results = dispatch_render_tasks(
        l_tasks_render,
        template,
        n_workers,
        &mut builder_render_report,
    );
    apply_results(l_results, &mut builder_render_report);

    Ok(builder_render_report.build())
}

fn run_render_task(spec_task: SpecRenderTask, template: &DocxTemplate) -> TypeRenderResult {
    let res_fill = template
        .fill_to_path(&spec_task.values, &spec_task.path_file_out)
        .map_err(|e| e.to_string());
    match &res_fill {
        Ok(_) => tracing::info!("Created: {}", spec_task.path_file_out.display()),
        Err(msg) => tracing::error!(row = spec_task.row_idx, "{msg}"),
    }
    (spec_task.row_idx, spec_task.path_file_out, res_fill)
}

fn dispatch_render_tasks(
    l_tasks_render: Vec<SpecRenderTask>,
    template: &DocxTemplate,
    n_workers: usize,
    builder_render_report: &mut ReportRenderBuilder,
) -> Vec<TypeRenderResult> {
    if l_tasks_render.is_empty() {
        return Vec::new();
    }

    let run_serial = |l_tasks: Vec<SpecRenderTask>| {
        l_tasks
            .into_iter()
            .map(|spec_task| run_render_task(spec_task, template))
            .collect::<Vec<_>>()
    };

    if n_workers <= 1 {
        return run_serial(l_tasks_render);
    }

    let thread_pool = ThreadPoolBuilder::new().num_threads(n_workers).build();
    let Ok(thread_pool) = thread_pool else {
        builder_render_report.add_warning(format!(
            "Failed to initialize thread pool (workers={n_workers}); fallback to serial render."
        ));
        return run_serial(l_tasks_render);
    };

    thread_pool.install(|| {
        l_tasks_render
            .into_par_iter()
            .map(|spec_task| run_render_task(spec_task, template))
            .collect::<Vec<_>>()
    })
}

fn apply_results(l_results: Vec<TypeRenderResult>, builder_render_report: &mut ReportRenderBuilder) {
    for (row_idx, path_file_out, res_fill) in l_results {
        match res_fill {
            Ok(spec_fill_report) => {
                match spec_fill_report.mismatch() {
                    Some(mismatch @ EnumPlaceholderMismatch::UnfilledPlaceholders(_)) => {
                        tracing::warn!(row = row_idx, "{mismatch}");
                        builder_render_report.add_warning(format!(
                            "Row {row_idx} ({}): {mismatch}",
                            path_file_out.display()
                        ));
                    }
                    Some(mismatch @ EnumPlaceholderMismatch::UnusedValues(_)) => {
                        tracing::debug!(row = row_idx, "{mismatch}");
                    }
                    None => {}
                }
                builder_render_report.add_rendered(path_file_out);
            }
            Err(msg) => builder_render_report.add_error(row_idx, path_file_out, msg),
        }
    }
}
