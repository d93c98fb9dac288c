//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use pasqal_device::{DeviceConfig, PasqalDevice};
use pasqal_ir::Operation;

/// Lattice shapes the `layout` command can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    Cube,
    Square,
    Rect,
    Parallelepiped,
    Triangular,
}

/// Serialization format for generated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Serialize `value` in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => {
                serde_json::to_string_pretty(value).context("Failed to serialize JSON")
            }
            OutputFormat::Yaml => serde_yaml_ng::to_string(value).context("Failed to serialize YAML"),
        }
    }
}

/// Load a device configuration file and apply environment overrides.
pub fn load_config(path: &str) -> Result<DeviceConfig> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let config = DeviceConfig::from_file(path)
        .with_context(|| format!("Failed to load device file: {path}"))?
        .merge_env();
    config.validate()?;
    Ok(config)
}

/// Load a device from a configuration file.
pub fn load_device(path: &str) -> Result<PasqalDevice> {
    let device = load_config(path)?.build()?;
    Ok(device)
}

/// Load a JSON array of operations.
pub fn load_operations(path: &str) -> Result<Vec<Operation>> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    serde_json::from_str(&source).with_context(|| format!("Invalid operations file: {path}"))
}

/// Write `contents` to `output`, or stdout when absent.
pub fn write_output(contents: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("Failed to write file: {path}"))
        }
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}
