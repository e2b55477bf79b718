//! TOML-based analysis configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::energy::RotorGeometry;
use crate::opportunity::WindowPolicy;

/// Top-level analysis configuration parsed from TOML.
///
/// All fields have defaults matching the baseline analysis. Load from TOML
/// with [`AnalysisConfig::from_toml_file`] or use
/// [`AnalysisConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Base directory for every relative data path.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Velocity tables and sampling for the yield analysis.
    #[serde(default)]
    pub energy: EnergyConfig,
    /// Rotor models to evaluate against the velocity tables.
    #[serde(default = "default_rotors")]
    pub rotors: Vec<RotorConfig>,
    /// Opportunity-window analysis.
    #[serde(default)]
    pub opportunity: OpportunityConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_rotors() -> Vec<RotorConfig> {
    vec![RotorConfig::twenty_metre(), RotorConfig::sixteen_metre()]
}

/// Velocity tables and sampling for the yield analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnergyConfig {
    /// East velocity component table (rows = samples, cols = 1 m cells).
    pub east_path: PathBuf,
    /// North velocity component table, same shape as east.
    pub north_path: PathBuf,
    /// Sample interval in hours (must be > 0).
    pub sample_rate_hours: f64,
    /// Samples per day for daily flow statistics (must be > 0).
    pub samples_per_day: usize,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            east_path: PathBuf::from("EastDataCleaned.csv"),
            north_path: PathBuf::from("NorthDataCleaned.csv"),
            sample_rate_hours: 1.0 / 6.0,
            samples_per_day: 144,
        }
    }
}

/// One rotor model and its placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotorConfig {
    /// Label for reports and CSV columns (must be unique).
    pub name: String,
    /// Reference powercurve CSV with a header row.
    pub powercurve_path: PathBuf,
    /// Hub height above the seabed (m).
    pub hub_height_m: f64,
    /// Rotor diameter (m).
    pub diameter_m: u32,
}

impl RotorConfig {
    pub fn twenty_metre() -> Self {
        Self {
            name: "rotor_20m".to_string(),
            powercurve_path: PathBuf::from("20M_Powercurve.csv"),
            hub_height_m: 15.0,
            diameter_m: 20,
        }
    }

    pub fn sixteen_metre() -> Self {
        Self {
            name: "rotor_16m".to_string(),
            powercurve_path: PathBuf::from("16M_Powercurve.csv"),
            hub_height_m: 20.0,
            diameter_m: 16,
        }
    }

    pub fn geometry(&self) -> RotorGeometry {
        RotorGeometry::new(self.hub_height_m, self.diameter_m)
    }
}

/// Opportunity-window analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpportunityConfig {
    /// Headerless `time,reference,power,wave` CSV.
    pub series_path: PathBuf,
    /// Sample interval in hours (must be > 0).
    pub sample_rate_hours: f64,
    /// Short sensor-check policy.
    pub sensor_check: WindowPolicy,
    /// Long-duration repair policy.
    pub repair: WindowPolicy,
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            series_path: PathBuf::from("Threasholding.csv"),
            sample_rate_hours: 0.5,
            sensor_check: WindowPolicy::SENSOR_CHECK,
            repair: WindowPolicy::LONG_DURATION_REPAIR,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"energy.sample_rate_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AnalysisConfig {
    /// Both rotors and both analyses, with the survey's file names.
    pub fn baseline() -> Self {
        Self {
            data_dir: default_data_dir(),
            energy: EnergyConfig::default(),
            rotors: default_rotors(),
            opportunity: OpportunityConfig::default(),
        }
    }

    /// Only the 20 m rotor at a 15 m hub.
    pub fn rotor_20m() -> Self {
        Self {
            rotors: vec![RotorConfig::twenty_metre()],
            ..Self::baseline()
        }
    }

    /// Only the 16 m rotor at a 20 m hub.
    pub fn rotor_16m() -> Self {
        Self {
            rotors: vec![RotorConfig::sixteen_metre()],
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "rotor_20m", "rotor_16m"];

    /// Loads a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "rotor_20m" => Ok(Self::rotor_20m()),
            "rotor_16m" => Ok(Self::rotor_16m()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// A relative `data_dir` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if cfg.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                cfg.data_dir = parent.join(&cfg.data_dir);
            }
        }
        Ok(cfg)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Joins a configured path onto `data_dir` unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let e = &self.energy;

        if e.sample_rate_hours <= 0.0 {
            errors.push(ConfigError {
                field: "energy.sample_rate_hours".into(),
                message: "must be > 0".into(),
            });
        }
        if e.samples_per_day == 0 {
            errors.push(ConfigError {
                field: "energy.samples_per_day".into(),
                message: "must be > 0".into(),
            });
        }

        let mut names = HashSet::new();
        for (i, r) in self.rotors.iter().enumerate() {
            let field = |name: &str| format!("rotors[{i}].{name}");
            if r.name.trim().is_empty() {
                errors.push(ConfigError {
                    field: field("name"),
                    message: "must not be empty".into(),
                });
            } else if !names.insert(r.name.as_str()) {
                errors.push(ConfigError {
                    field: field("name"),
                    message: format!("duplicate rotor name \"{}\"", r.name),
                });
            }
            if r.diameter_m == 0 {
                errors.push(ConfigError {
                    field: field("diameter_m"),
                    message: "must be > 0".into(),
                });
            }
            if r.geometry().bottom_height_m() < 0.0 {
                errors.push(ConfigError {
                    field: field("hub_height_m"),
                    message: format!("must be >= half the diameter ({} m)", r.geometry().radius_m()),
                });
            }
        }

        let o = &self.opportunity;
        if o.sample_rate_hours <= 0.0 {
            errors.push(ConfigError {
                field: "opportunity.sample_rate_hours".into(),
                message: "must be > 0".into(),
            });
        }
        for (name, policy) in [("sensor_check", &o.sensor_check), ("repair", &o.repair)] {
            if policy.reference_limit <= 0.0 {
                errors.push(ConfigError {
                    field: format!("opportunity.{name}.reference_limit"),
                    message: "must be > 0".into(),
                });
            }
            if policy.max_wave_height_m <= 0.0 {
                errors.push(ConfigError {
                    field: format!("opportunity.{name}.max_wave_height_m"),
                    message: "must be > 0".into(),
                });
            }
            if policy.min_consecutive == 0 {
                errors.push(ConfigError {
                    field: format!("opportunity.{name}.min_consecutive"),
                    message: "must be >= 1".into(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = AnalysisConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
        assert_eq!(cfg.rotors.len(), 2);
    }

    #[test]
    fn from_preset_unknown() {
        let err = AnalysisConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in AnalysisConfig::PRESETS {
            let cfg = AnalysisConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn single_rotor_presets() {
        assert_eq!(AnalysisConfig::rotor_20m().rotors[0].diameter_m, 20);
        assert_eq!(AnalysisConfig::rotor_16m().rotors[0].hub_height_m, 20.0);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
data_dir = "survey"

[energy]
east_path = "east.csv"
north_path = "north.csv"
sample_rate_hours = 0.25
samples_per_day = 96

[[rotors]]
name = "small"
powercurve_path = "small.csv"
hub_height_m = 10.5
diameter_m = 9

[opportunity]
series_path = "ops.csv"
sample_rate_hours = 1.0

[opportunity.repair]
reference_limit = 2.0
max_wave_height_m = 1.0
min_consecutive = 12
"#;
        let cfg = AnalysisConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.energy.samples_per_day), Some(96));
        assert_eq!(cfg.as_ref().map(|c| c.rotors.len()), Some(1));
        assert_eq!(cfg.as_ref().map(|c| c.rotors[0].diameter_m), Some(9));
        assert_eq!(
            cfg.as_ref().map(|c| c.opportunity.repair.min_consecutive),
            Some(12)
        );
        // unspecified policy keeps its default
        assert_eq!(
            cfg.as_ref().map(|c| c.opportunity.sensor_check),
            Some(WindowPolicy::SENSOR_CHECK)
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.resolve(Path::new("east.csv"))),
            Some(PathBuf::from("survey/east.csv"))
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[energy]
sample_rate_hours = 0.5
bogus_field = true
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[energy]
sample_rate_hours = 0.5
"#;
        let cfg = AnalysisConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.energy.sample_rate_hours), Some(0.5));
        assert_eq!(cfg.as_ref().map(|c| c.energy.samples_per_day), Some(144));
        assert_eq!(cfg.as_ref().map(|c| c.rotors.len()), Some(2));
        assert_eq!(
            cfg.as_ref().map(|c| c.opportunity.repair),
            Some(WindowPolicy::LONG_DURATION_REPAIR)
        );
    }

    #[test]
    fn validation_catches_zero_sample_rate() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.energy.sample_rate_hours = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "energy.sample_rate_hours"));
    }

    #[test]
    fn validation_catches_rotor_below_seabed() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.rotors[0].hub_height_m = 5.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "rotors[0].hub_height_m"));
    }

    #[test]
    fn validation_catches_duplicate_rotor_names() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.rotors[1].name = cfg.rotors[0].name.clone();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "rotors[1].name"));
    }

    #[test]
    fn validation_catches_zero_minimum_run() {
        let mut cfg = AnalysisConfig::baseline();
        cfg.opportunity.repair.min_consecutive = 0;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "opportunity.repair.min_consecutive")
        );
    }
}
