//! Device configuration.
//!
//! A device is described by a control radius, a site layout and optional
//! duration overrides. Configurations load from YAML or JSON files:
//!
//! ```yaml
//! control_radius: 1.5
//! layout:
//!   kind: cube
//!   diameter: 3
//! durations:
//!   identity_ns: 2000
//!   measurement_ns: 2000000
//! ```
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`PASQAL_CONTROL_RADIUS`)
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use pasqal_ir::ThreeDGridQubit;

use crate::device::{DurationTable, PasqalDevice};
use crate::error::DeviceResult;

/// Environment variable overriding the control radius.
pub const CONTROL_RADIUS_ENV: &str = "PASQAL_CONTROL_RADIUS";

/// Largest number of sites a generated layout may expand to.
pub const MAX_LAYOUT_SITES: usize = 1 << 20;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The file could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configuration is well-formed but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete device configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Maximum distance for a two-qubit interaction.
    #[serde(default = "default_control_radius")]
    pub control_radius: f64,

    /// Site layout.
    pub layout: LayoutConfig,

    /// Operation durations.
    #[serde(default)]
    pub durations: DurationConfig,
}

/// Site layout, either generated from a lattice shape or listed explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutConfig {
    /// Dense box.
    Parallelepiped {
        /// Extent along x.
        rows: u32,
        /// Extent along y.
        cols: u32,
        /// Extent along z.
        lays: u32,
        /// Offset along x.
        #[serde(default)]
        top: i64,
        /// Offset along y.
        #[serde(default)]
        left: i64,
        /// Offset along z.
        #[serde(default)]
        upper: i64,
    },
    /// Dense cube.
    Cube {
        /// Side length.
        diameter: u32,
        /// Offset along x.
        #[serde(default)]
        top: i64,
        /// Offset along y.
        #[serde(default)]
        left: i64,
        /// Offset along z.
        #[serde(default)]
        upper: i64,
    },
    /// Dense rectangle on layer 0.
    Rect {
        /// Extent along x.
        rows: u32,
        /// Extent along y.
        cols: u32,
        /// Offset along x.
        #[serde(default)]
        top: i64,
        /// Offset along y.
        #[serde(default)]
        left: i64,
    },
    /// Dense square on layer 0.
    Square {
        /// Side length.
        diameter: u32,
        /// Offset along x.
        #[serde(default)]
        top: i64,
        /// Offset along y.
        #[serde(default)]
        left: i64,
    },
    /// Triangular packing on layer 0.
    TriangularLattice {
        /// Sites per side, minus one.
        size: u32,
        /// Offset along x.
        #[serde(default)]
        top: f64,
        /// Offset along y.
        #[serde(default)]
        left: f64,
    },
    /// Explicit site list.
    Explicit {
        /// The sites.
        qubits: Vec<ThreeDGridQubit>,
    },
}

impl LayoutConfig {
    /// Number of sites this layout expands to, without generating them.
    ///
    /// Fails when an axis runs past the integer range or the count exceeds
    /// [`MAX_LAYOUT_SITES`].
    pub fn site_count(&self) -> Result<usize, ConfigError> {
        match self {
            LayoutConfig::Parallelepiped {
                rows,
                cols,
                lays,
                top,
                left,
                upper,
            } => grid_count(&[("x", *rows, *top), ("y", *cols, *left), ("z", *lays, *upper)]),
            LayoutConfig::Cube {
                diameter,
                top,
                left,
                upper,
            } => grid_count(&[
                ("x", *diameter, *top),
                ("y", *diameter, *left),
                ("z", *diameter, *upper),
            ]),
            LayoutConfig::Rect {
                rows,
                cols,
                top,
                left,
            } => grid_count(&[("x", *rows, *top), ("y", *cols, *left)]),
            LayoutConfig::Square {
                diameter,
                top,
                left,
            } => grid_count(&[("x", *diameter, *top), ("y", *diameter, *left)]),
            LayoutConfig::TriangularLattice { size, top, left } => {
                if !top.is_finite() || !left.is_finite() {
                    return Err(ConfigError::Invalid(
                        "triangular lattice offsets must be finite".into(),
                    ));
                }
                let side = u64::from(*size) + 1;
                let count = side
                    .checked_mul(side)
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| too_many_sites(None))?;
                check_site_limit(count)
            }
            LayoutConfig::Explicit { qubits } => Ok(qubits.len()),
        }
    }

    /// Generate the sites of this layout.
    pub fn sites(&self) -> Vec<ThreeDGridQubit> {
        match self {
            LayoutConfig::Parallelepiped {
                rows,
                cols,
                lays,
                top,
                left,
                upper,
            } => ThreeDGridQubit::parallelepiped(*rows, *cols, *lays, *top, *left, *upper),
            LayoutConfig::Cube {
                diameter,
                top,
                left,
                upper,
            } => ThreeDGridQubit::cube(*diameter, *top, *left, *upper),
            LayoutConfig::Rect {
                rows,
                cols,
                top,
                left,
            } => ThreeDGridQubit::rect(*rows, *cols, *top, *left),
            LayoutConfig::Square {
                diameter,
                top,
                left,
            } => ThreeDGridQubit::square(*diameter, *top, *left),
            LayoutConfig::TriangularLattice { size, top, left } => {
                ThreeDGridQubit::triangular_lattice(*size, *top, *left)
            }
            LayoutConfig::Explicit { qubits } => qubits.clone(),
        }
    }
}

/// Operation durations in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConfig {
    /// Duration of an identity gate.
    #[serde(default = "default_identity_ns")]
    pub identity_ns: u64,

    /// Duration of a measurement.
    #[serde(default = "default_measurement_ns")]
    pub measurement_ns: u64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            identity_ns: default_identity_ns(),
            measurement_ns: default_measurement_ns(),
        }
    }
}

impl DurationConfig {
    /// Whether both durations are the defaults.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Reject zero durations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity_ns == 0 {
            return Err(ConfigError::Invalid("identity_ns must be non-zero".into()));
        }
        if self.measurement_ns == 0 {
            return Err(ConfigError::Invalid("measurement_ns must be non-zero".into()));
        }
        Ok(())
    }
}

/// Durations beyond `u64::MAX` nanoseconds saturate.
impl From<DurationTable> for DurationConfig {
    fn from(table: DurationTable) -> Self {
        let nanos = |d: Duration| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        DurationConfig {
            identity_ns: nanos(table.identity),
            measurement_ns: nanos(table.measurement),
        }
    }
}

impl From<DurationConfig> for DurationTable {
    fn from(config: DurationConfig) -> Self {
        DurationTable {
            identity: Duration::from_nanos(config.identity_ns),
            measurement: Duration::from_nanos(config.measurement_ns),
        }
    }
}

fn grid_count(axes: &[(&str, u32, i64)]) -> Result<usize, ConfigError> {
    let mut count = 1usize;
    for &(axis, extent, offset) in axes {
        if offset.checked_add(i64::from(extent)).is_none() {
            return Err(ConfigError::Invalid(format!(
                "layout extent along {axis} overflows: offset {offset} + {extent}"
            )));
        }
        count = count
            .checked_mul(extent as usize)
            .ok_or_else(|| too_many_sites(None))?;
    }
    check_site_limit(count)
}

fn check_site_limit(count: usize) -> Result<usize, ConfigError> {
    if count > MAX_LAYOUT_SITES {
        return Err(too_many_sites(Some(count)));
    }
    Ok(count)
}

fn too_many_sites(count: Option<usize>) -> ConfigError {
    match count {
        Some(count) => ConfigError::Invalid(format!(
            "layout has {count} sites, more than the limit of {MAX_LAYOUT_SITES}"
        )),
        None => ConfigError::Invalid(format!(
            "layout exceeds the limit of {MAX_LAYOUT_SITES} sites"
        )),
    }
}

fn default_control_radius() -> f64 {
    1.5
}

fn default_identity_ns() -> u64 {
    2_000
}

fn default_measurement_ns() -> u64 {
    2_000_000
}

impl DeviceConfig {
    /// A configuration for `layout` with default radius and durations.
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            control_radius: default_control_radius(),
            layout,
            durations: DurationConfig::default(),
        }
    }

    /// Load configuration from a YAML or JSON file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: DeviceConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: DeviceConfig =
            serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, then apply environment overrides.
    pub fn load(path: Option<&Path>, default_layout: LayoutConfig) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::new(default_layout),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn merge_env(self) -> Self {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn merge_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(radius) = lookup(CONTROL_RADIUS_ENV) {
            match radius.parse() {
                Ok(val) => self.control_radius = val,
                Err(_) => {
                    tracing::warn!("Ignoring unparseable {CONTROL_RADIUS_ENV}={radius}");
                }
            }
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.control_radius.is_finite() || self.control_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "control_radius must be positive, got {}",
                self.control_radius
            )));
        }
        if self.layout.site_count()? == 0 {
            return Err(ConfigError::Invalid("layout has no sites".into()));
        }
        self.durations.validate()
    }

    /// Build the device this configuration describes.
    pub fn build(&self) -> DeviceResult<PasqalDevice> {
        self.validate()?;
        Ok(PasqalDevice::new(self.control_radius, self.layout.sites())?
            .with_durations(self.durations.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_config() {
        let config = DeviceConfig::from_yaml_str(
            "control_radius: 1.5\nlayout:\n  kind: cube\n  diameter: 3\n",
        )
        .unwrap();
        assert_eq!(config.control_radius, 1.5);
        assert_eq!(config.layout.sites().len(), 27);
        assert_eq!(config.durations, DurationConfig::default());
    }

    #[test]
    fn test_json_config_with_explicit_sites() {
        let config = DeviceConfig::from_json_str(
            r#"{"control_radius": 5, "layout": {"kind": "explicit", "qubits": [{"x": 1, "y": 1, "z": 1}]}}"#,
        )
        .unwrap();
        let device = config.build().unwrap();
        assert_eq!(device.qubit_list(), vec![ThreeDGridQubit::new(1.0, 1.0, 1.0)]);
        assert_eq!(device.control_radius(), 5.0);
    }

    #[test]
    fn test_invalid_radius() {
        let err = DeviceConfig::from_yaml_str(
            "control_radius: -1\nlayout:\n  kind: square\n  diameter: 2\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_empty_layout() {
        let err =
            DeviceConfig::from_yaml_str("layout:\n  kind: rect\n  rows: 0\n  cols: 4\n").unwrap_err();
        assert!(err.to_string().contains("no sites"));
    }

    #[test]
    fn test_layout_extent_overflow() {
        let err = DeviceConfig::new(LayoutConfig::Cube {
            diameter: 2,
            top: i64::MAX,
            left: 0,
            upper: 0,
        })
        .validate()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("along x overflows"));

        let err = DeviceConfig::from_yaml_str(&format!(
            "layout:\n  kind: rect\n  rows: 2\n  cols: 2\n  left: {}\n",
            i64::MAX - 1
        ))
        .unwrap_err();
        assert!(err.to_string().contains("along y overflows"));
    }

    #[test]
    fn test_layout_site_limit() {
        let huge = LayoutConfig::TriangularLattice {
            size: u32::MAX,
            top: 0.0,
            left: 0.0,
        };
        assert!(huge.site_count().is_err());
        let err = DeviceConfig::new(huge).build().unwrap_err();
        assert!(err.to_string().contains("limit of 1048576 sites"));

        let cube = LayoutConfig::Cube {
            diameter: u32::MAX,
            top: 0,
            left: 0,
            upper: 0,
        };
        assert!(cube.site_count().unwrap_err().to_string().contains("limit"));

        let at_limit = LayoutConfig::Square {
            diameter: 1 << 10,
            top: 0,
            left: 0,
        };
        assert_eq!(at_limit.site_count().unwrap(), MAX_LAYOUT_SITES);

        let over = LayoutConfig::Rect {
            rows: (1 << 10) + 1,
            cols: 1 << 10,
            top: 0,
            left: 0,
        };
        assert!(over.site_count().unwrap_err().to_string().contains("1049600 sites"));

        let nan = LayoutConfig::TriangularLattice {
            size: 1,
            top: f64::NAN,
            left: 0.0,
        };
        assert!(nan.site_count().is_err());
    }

    #[test]
    fn test_site_count_matches_sites() {
        let layouts = [
            LayoutConfig::Parallelepiped {
                rows: 2,
                cols: 3,
                lays: 4,
                top: -1,
                left: 0,
                upper: 5,
            },
            LayoutConfig::Cube {
                diameter: 3,
                top: 0,
                left: 0,
                upper: 0,
            },
            LayoutConfig::Rect {
                rows: 0,
                cols: 7,
                top: 0,
                left: 0,
            },
            LayoutConfig::TriangularLattice {
                size: 3,
                top: 0.5,
                left: 0.0,
            },
            LayoutConfig::Explicit {
                qubits: vec![ThreeDGridQubit::new(0.0, 0.0, 0.0)],
            },
        ];
        for layout in &layouts {
            assert_eq!(layout.site_count().unwrap(), layout.sites().len());
        }
    }

    #[test]
    fn test_zero_durations_rejected() {
        let err = DeviceConfig::from_yaml_str(
            "layout:\n  kind: cube\n  diameter: 2\ndurations:\n  measurement_ns: 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("measurement_ns must be non-zero"));

        let err = DeviceConfig::from_yaml_str(
            "layout:\n  kind: cube\n  diameter: 2\ndurations:\n  identity_ns: 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("identity_ns must be non-zero"));
    }

    #[test]
    fn test_parse_error() {
        let err = DeviceConfig::from_yaml_str("layout: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_override() {
        let config = DeviceConfig::new(LayoutConfig::Square {
            diameter: 2,
            top: 0,
            left: 0,
        })
        .merge_env_with(|key| (key == CONTROL_RADIUS_ENV).then(|| "2.5".to_string()));
        assert_eq!(config.control_radius, 2.5);

        let untouched = DeviceConfig::new(LayoutConfig::Square {
            diameter: 2,
            top: 0,
            left: 0,
        })
        .merge_env_with(|_| Some("wide".to_string()));
        assert_eq!(untouched.control_radius, 1.5);
    }

    #[test]
    fn test_duration_overrides() {
        let config = DeviceConfig::from_yaml_str(
            "layout:\n  kind: triangular_lattice\n  size: 2\ndurations:\n  identity_ns: 1000\n",
        )
        .unwrap();
        let device = config.build().unwrap();
        assert_eq!(device.len(), 9);
        assert_eq!(device.durations().identity, Duration::from_micros(1));
        assert_eq!(device.durations().measurement, Duration::from_millis(2));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device.yaml");
        std::fs::write(&path, "layout:\n  kind: cube\n  diameter: 2\n").unwrap();
        let config = DeviceConfig::from_file(&path).unwrap();
        assert_eq!(config.layout.sites().len(), 8);

        let missing = DeviceConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
