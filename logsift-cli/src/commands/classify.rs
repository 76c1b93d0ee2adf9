//! `logsift classify` command handler

use std::io::Write;

use serde::Serialize;

use logsift_core::config::LogsiftConfig;
use logsift_core::types::LogSource;
use logsift_pipeline::collector::expand_paths;
use logsift_pipeline::collector::file::file_name;
use logsift_pipeline::{PipelineConfig, SourceClassifier};

use crate::cli::ClassifyArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `classify` command.
///
/// Directories are expanded one level deep, same as `view`. Nothing is read.
pub async fn execute(
    args: ClassifyArgs,
    config: &LogsiftConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let classifier = SourceClassifier::from_config(&PipelineConfig::from_core(config));
    let paths = expand_paths(&args.paths).await;

    let report = ClassifyReport {
        files: paths
            .iter()
            .map(|path| {
                let name = file_name(path);
                let classification = classifier.classify(&name);
                ClassifiedFile {
                    path: path.display().to_string(),
                    classification: classification.to_string(),
                    source: classification.source(),
                }
            })
            .collect(),
    };

    writer.render(&report)
}

#[derive(Serialize)]
pub struct ClassifyReport {
    pub files: Vec<ClassifiedFile>,
}

#[derive(Serialize)]
pub struct ClassifiedFile {
    pub path: String,
    pub classification: String,
    /// `None` when no parser owns the file
    pub source: Option<LogSource>,
}

impl Render for ClassifyReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if self.files.is_empty() {
            writeln!(w, "{}", "No files found.".yellow())?;
            return Ok(());
        }

        writeln!(w, "{:<14} Path", "Source")?;
        writeln!(w, "{}", "-".repeat(60))?;
        for file in &self.files {
            let label = format!("{:<14}", file.classification);
            let label = if file.source.is_some() {
                label.green()
            } else {
                label.dimmed()
            };
            writeln!(w, "{} {}", label, file.path)?;
        }

        Ok(())
    }
}
