//! Layout command implementation.

use anyhow::Result;
use console::style;

use pasqal_device::{DeviceConfig, LayoutConfig};

use super::common::{OutputFormat, Shape, write_output};

/// Resolved lattice parameters.
#[derive(Debug, Clone, Copy)]
pub struct LayoutArgs {
    pub shape: Shape,
    pub size: u32,
    pub rows: u32,
    pub cols: u32,
    pub lays: u32,
    pub top: i64,
    pub left: i64,
    pub upper: i64,
}

impl LayoutArgs {
    /// The layout these parameters describe.
    pub fn to_layout(&self) -> LayoutConfig {
        let Self {
            shape,
            size,
            rows,
            cols,
            lays,
            top,
            left,
            upper,
        } = *self;
        match shape {
            Shape::Cube => LayoutConfig::Cube {
                diameter: size,
                top,
                left,
                upper,
            },
            Shape::Square => LayoutConfig::Square {
                diameter: size,
                top,
                left,
            },
            Shape::Rect => LayoutConfig::Rect {
                rows,
                cols,
                top,
                left,
            },
            Shape::Parallelepiped => LayoutConfig::Parallelepiped {
                rows,
                cols,
                lays,
                top,
                left,
                upper,
            },
            Shape::Triangular => LayoutConfig::TriangularLattice {
                size,
                top: top as f64,
                left: left as f64,
            },
        }
    }
}

/// Execute the layout command.
pub fn execute(
    args: &LayoutArgs,
    radius: f64,
    expand: bool,
    format: OutputFormat,
    output: Option<&str>,
) -> Result<()> {
    let mut config = DeviceConfig::new(args.to_layout());
    config.control_radius = radius;
    config.validate()?;
    let site_count = config.layout.site_count()?;

    if expand {
        config.layout = LayoutConfig::Explicit {
            qubits: config.layout.sites(),
        };
    }

    let rendered = format.render(&config)?;
    write_output(&rendered, output)?;

    if let Some(path) = output {
        eprintln!(
            "{} Wrote {} sites to {}",
            style("✓").green().bold(),
            site_count,
            style(path).green()
        );
    }

    Ok(())
}
