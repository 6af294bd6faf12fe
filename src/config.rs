use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    /// Number of work steps per run.
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Simulated per-step work duration in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// Human-readable run title, shown in progress output and notifications.
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    /// Show the one-time notification line when a run completes successfully.
    /// Failure and cancellation notices are always shown.
    #[serde(default = "default_notify")]
    pub notify_on_completion: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable log lines.
    Text,
    /// One JSON record per progress update / outcome on stdout.
    Json,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            step_delay_ms: default_step_delay_ms(),
            title: default_title(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            notify_on_completion: default_notify(),
        }
    }
}

fn default_steps() -> u32 {
    3
}

fn default_step_delay_ms() -> u64 {
    1000
}

fn default_title() -> String {
    "Task".to_string()
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_notify() -> bool {
    true
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            // Try default paths
            builder = builder.add_source(config::File::with_name("taskcenter").required(false));
        }

        // Environment variable overrides with TASKCENTER_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("TASKCENTER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.run.steps, 3);
        assert_eq!(config.run.step_delay_ms, 1000);
        assert_eq!(config.run.title, "Task");
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.notify_on_completion);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("taskcenter.toml");
        fs::write(
            &path,
            r#"
[run]
steps = 10
step_delay_ms = 50
title = "Nightly import"

[output]
format = "json"
notify_on_completion = false
"#,
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.run.steps, 10);
        assert_eq!(config.run.step_delay_ms, 50);
        assert_eq!(config.run.title, "Nightly import");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.notify_on_completion);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("taskcenter.toml");
        fs::write(&path, "[run]\nsteps = 7\n").unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.run.steps, 7);
        assert_eq!(config.run.step_delay_ms, 1000);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_rejects_unknown_format() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("taskcenter.toml");
        fs::write(&path, "[output]\nformat = \"xml\"\n").unwrap();

        let result = AppConfig::load(path.to_str());
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
