//! `logsift view` command handler

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use logsift_core::config::LogsiftConfig;
use logsift_core::event::ValidationDiagnostic;
use logsift_core::types::LogRecord;
use logsift_pipeline::annotate;
use logsift_pipeline::{
    BatchReport, CollectingSink, DateRange, FilterState, LogPipelineBuilder, PipelineConfig,
    PipelineState, SearchMode,
};

use crate::cli::ViewArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, format_instant, severity_colored};

/// Execute the `view` command.
///
/// Loads the batch, publishes it into a fresh session state, applies the
/// filters from the command line and prints the visible records.
pub async fn execute(
    args: ViewArgs,
    config: &LogsiftConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut pipeline_config = PipelineConfig::from_core(config);
    if args.only_matching {
        pipeline_config.search_mode = SearchMode::OnlyMatching;
    }
    let mode = pipeline_config.search_mode;

    let sink = Arc::new(CollectingSink::new());
    let mut builder = LogPipelineBuilder::new().config(pipeline_config);
    if args.show_errors {
        builder = builder.diagnostic_sink(sink.clone());
    }
    let pipeline = builder.build()?;

    let batch = pipeline.load_paths(&args.paths).await;
    let loaded = batch.report.clone();

    let mut state = PipelineState::new(mode);
    if !state.publish(batch) {
        return Err(nothing_loaded(&loaded));
    }
    state.set_filter(filter_state(&args, mode));

    info!(
        visible = state.visible_len(),
        records = state.records().len(),
        "view ready"
    );

    let diagnostics = if args.show_errors {
        sink.take()
    } else {
        Vec::new()
    };
    writer.render(&build_report(&state, diagnostics))
}

/// Filter state described by the command line flags.
fn filter_state(args: &ViewArgs, mode: SearchMode) -> FilterState {
    FilterState {
        date_range: DateRange::new(args.from, args.to),
        sources: args.sources.iter().copied().collect(),
        severities: args.severities.iter().copied().collect(),
        query: args.query.clone().unwrap_or_default(),
        mode,
    }
}

/// Error for a batch in which no file was read.
///
/// Read failures map to the IO exit code; a batch of only unrecognised
/// names is a command error.
fn nothing_loaded(report: &BatchReport) -> CliError {
    let summary = format!(
        "no log files were read ({} failed, {} skipped)",
        report.files_failed, report.files_skipped
    );
    if report.files_failed > 0 {
        CliError::Io(std::io::Error::other(summary))
    } else {
        CliError::Command(summary)
    }
}

fn build_report(state: &PipelineState, diagnostics: Vec<ValidationDiagnostic>) -> ViewReport {
    let view = state.view();
    let current = state.current_match();

    let rows = view
        .visible
        .iter()
        .enumerate()
        .map(|(position, record)| ViewRow {
            position,
            matched: view.match_indexes.binary_search(&position).is_ok(),
            current: current == Some(position),
            tags: annotate::tags(record),
            record: (*record).clone(),
        })
        .collect();

    ViewReport {
        batch_id: state.batch_id().map(|id| id.to_string()),
        files: state.report().clone(),
        mode: state.filter().mode,
        query: state.filter().query.clone(),
        match_count: view.match_count,
        current_match: current,
        rows,
        diagnostics,
    }
}

/// Rendered view of one batch.
#[derive(Serialize)]
pub struct ViewReport {
    pub batch_id: Option<String>,
    pub files: BatchReport,
    pub mode: SearchMode,
    pub query: String,
    pub match_count: usize,
    /// Visible position of the current match
    pub current_match: Option<usize>,
    pub rows: Vec<ViewRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ValidationDiagnostic>,
}

#[derive(Serialize)]
pub struct ViewRow {
    pub position: usize,
    /// Highlight mode only
    pub matched: bool,
    pub current: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub record: LogRecord,
}

impl Render for ViewReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Batch {}: {} read, {} failed, {} skipped, {} records ({} invalid)",
            self.batch_id.as_deref().unwrap_or("-").bold(),
            self.files.files_read,
            self.files.files_failed,
            self.files.files_skipped,
            self.files.records,
            self.files.invalid_records,
        )?;

        if !self.query.trim().is_empty() {
            let current = match self.current_match {
                Some(position) => format!(", current: row {}", position + 1),
                None => String::new(),
            };
            writeln!(
                w,
                "Query {:?} ({}): {} match(es){}",
                self.query,
                self.mode,
                self.match_count.to_string().bold(),
                current
            )?;
        }
        writeln!(w)?;

        if self.rows.is_empty() {
            writeln!(w, "{}", "No records match the current filters.".yellow())?;
        }
        for row in &self.rows {
            row.render_text(w)?;
        }

        if !self.diagnostics.is_empty() {
            writeln!(w)?;
            writeln!(
                w,
                "{}",
                format!("Validation diagnostics ({}):", self.diagnostics.len()).bold()
            )?;
            for diagnostic in &self.diagnostics {
                writeln!(
                    w,
                    "  [{}] {}: {}",
                    diagnostic.stage,
                    diagnostic.source,
                    diagnostic.raw_line.dimmed()
                )?;
                for line in diagnostic.issues.to_pretty_json().lines() {
                    writeln!(w, "    {}", line)?;
                }
            }
        }

        Ok(())
    }
}

impl Render for ViewRow {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let marker = if self.current {
            ">".green().bold()
        } else if self.matched {
            "*".green()
        } else {
            " ".normal()
        };
        let time = format_instant(self.record.instant());

        let Some(entry) = self.record.parsed() else {
            return writeln!(
                w,
                "{} {:<23} {} {} ({})",
                marker,
                time,
                "[UNSUPPORTED FORMAT]".red(),
                self.record.raw_line(),
                self.record.error().unwrap_or_default().dimmed()
            );
        };

        let level = entry.level();
        let label = format!("{:<7}", level.label());
        write!(
            w,
            "{} {:<23} {} {:<6} {}: {}",
            marker,
            time,
            severity_colored(Some(level.severity()), &label),
            self.record.source().to_string(),
            entry.name().bold(),
            entry.message()
        )?;
        if !self.tags.is_empty() {
            write!(w, " {}", format!("[{}]", self.tags.join(", ")).cyan())?;
        }
        writeln!(w)?;

        if let Some(crash) = annotate::crash(&self.record) {
            writeln!(
                w,
                "    {} {}: {}",
                "crash".red().bold(),
                crash.code.as_deref().unwrap_or("-"),
                crash.message
            )?;
            for line in crash.stack.lines() {
                writeln!(w, "      {}", line.dimmed())?;
            }
        }

        Ok(())
    }
}
