//! `apiscan config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use apiscan_core::config::ApiScanConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if the file is missing, malformed or holds invalid values.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match ApiScanConfig::load(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration. A missing file shows the defaults.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = ApiScanConfig::load_or_default(config_path).await?;
    let report = build_config_report(config_path, &config, section)?;
    writer.render(&report)?;

    Ok(())
}

fn build_config_report(
    config_path: &Path,
    config: &ApiScanConfig,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("scanner") => toml::to_string_pretty(&config.scanner),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: general, scanner)",
                other
            )));
        }
    }
    .unwrap_or_else(|e| format!("(serialization error: {})", e));

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    })
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_scanner_section() {
        let report = build_config_report(
            Path::new("apiscan.toml"),
            &ApiScanConfig::default(),
            Some("scanner".to_owned()),
        )
        .expect("scanner section should render");
        assert!(report.config_toml.contains("output_dir = \"build/api\""));
        assert!(!report.config_toml.contains("log_level"));
    }

    #[test]
    fn test_show_full_config() {
        let report =
            build_config_report(Path::new("apiscan.toml"), &ApiScanConfig::default(), None)
                .expect("full config should render");
        assert!(report.config_toml.contains("[general]"));
        assert!(report.config_toml.contains("[scanner]"));
    }

    #[test]
    fn test_show_unknown_section() {
        let err = build_config_report(
            Path::new("apiscan.toml"),
            &ApiScanConfig::default(),
            Some("ebpf".to_owned()),
        )
        .err()
        .expect("unknown section should fail");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("unknown section"));
    }

    #[test]
    fn test_validation_report_text() {
        colored::control::set_override(false);
        let report = ConfigValidationReport {
            source: "apiscan.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'max_parallel_scans'".to_owned()],
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let text = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(text.contains("Result: INVALID"));
        assert!(text.contains("max_parallel_scans"));
    }

    #[test]
    fn test_config_report_json_skips_toml() {
        let report = ConfigReport {
            source: "apiscan.toml".to_owned(),
            section: None,
            config_toml: "[general]".to_owned(),
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["source"], "apiscan.toml");
        assert!(json.get("config_toml").is_none());
        assert!(json.get("section").is_none());
    }
}
