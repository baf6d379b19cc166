//! `apiscan scan` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use apiscan_core::config::{ApiScanConfig, ScannerConfig};
use apiscan_scanner::{
    ApiScanner, ApiScannerConfig, ApiScannerConfigBuilder, ArtifactOutcome, BatchSummary,
};

use crate::cli::ScanArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = ApiScanConfig::load_or_default(config_path).await?;
    let scanner_config = build_scanner_config(&args, &config.scanner)?;

    if scanner_config.artifacts.is_empty() {
        return Err(CliError::Command(
            "no artifacts to scan (pass ARTIFACT or set scanner.artifacts)".to_owned(),
        ));
    }

    info!(
        artifacts = scanner_config.artifacts.len(),
        output_dir = %scanner_config.output_dir,
        "starting API scan"
    );

    let output_dir = scanner_config.output_dir.clone();
    let scanner = ApiScanner::new(scanner_config)?;
    let summary = scanner.run().await?;

    let report = ScanReport::new(output_dir, &summary);
    writer.render(&report)?;

    if args.fail_on_skip && report.skipped > 0 {
        return Err(CliError::Skipped(report.skipped));
    }

    Ok(())
}

/// Merge CLI arguments over the `[scanner]` config section.
///
/// Non-empty lists replace the configured lists; flags only ever turn
/// their behavior on.
fn build_scanner_config(
    args: &ScanArgs,
    core: &ScannerConfig,
) -> Result<ApiScannerConfig, CliError> {
    let base = ApiScannerConfig::from_core(core);

    let artifacts = if args.artifacts.is_empty() {
        base.artifacts
    } else {
        args.artifacts.iter().map(|p| p.display().to_string()).collect()
    };
    let classpath = if args.classpath.is_empty() {
        base.classpath
    } else {
        args.classpath.iter().map(|p| p.display().to_string()).collect()
    };
    let output_dir = args
        .output_dir
        .as_ref()
        .map_or(base.output_dir, |d| d.display().to_string());

    let config = ApiScannerConfigBuilder::new()
        .artifacts(artifacts)
        .classpath(classpath)
        .output_dir(output_dir)
        .internal_marker(base.internal_marker)
        .include_synthetic(base.include_synthetic && !args.exclude_synthetic)
        .strict_resolution(base.strict_resolution || args.strict)
        .max_parallel_scans(args.jobs.unwrap_or(base.max_parallel_scans))
        .max_class_file_size(base.max_class_file_size)
        .build()?;
    Ok(config)
}

/// Batch scan result for display.
#[derive(Serialize)]
pub struct ScanReport {
    pub output_dir: String,
    pub written: usize,
    pub skipped: usize,
    pub artifacts: Vec<ArtifactOutcome>,
}

impl ScanReport {
    fn new(output_dir: String, summary: &BatchSummary) -> Self {
        Self {
            output_dir,
            written: summary.written(),
            skipped: summary.skipped(),
            artifacts: summary.outcomes.clone(),
        }
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "API Scan: {}", self.output_dir.bold())?;
        writeln!(w)?;

        for outcome in &self.artifacts {
            match outcome {
                ArtifactOutcome::Written {
                    artifact,
                    report,
                    types,
                    members,
                } => writeln!(
                    w,
                    "  {} {} -> {} ({} types, {} members)",
                    "WRITTEN".green().bold(),
                    artifact.display(),
                    report.display(),
                    types,
                    members
                )?,
                ArtifactOutcome::Skipped {
                    artifact,
                    kind,
                    reason,
                } => writeln!(
                    w,
                    "  {} {} [{}] {}",
                    "SKIPPED".yellow().bold(),
                    artifact.display(),
                    kind,
                    reason
                )?,
            }
        }

        writeln!(w)?;
        let summary = format!("{} written, {} skipped", self.written, self.skipped);
        if self.skipped > 0 {
            writeln!(w, "Summary: {}", summary.yellow().bold())?;
        } else {
            writeln!(w, "Summary: {}", summary.green().bold())?;
        }

        Ok(())
    }
}
