use crate::domain::ports::{ConfigProvider, DryMatterFloor};
use crate::utils::error::{FarmError, Result};
use crate::utils::validation::{validate_non_negative, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// kg DM/ha/day
pub const DEFAULT_GROWTH_RATE: f64 = 65.0;
/// kg DM/animal/day
pub const DEFAULT_CONSUMPTION_RATE: f64 = 14.0;

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 29).unwrap_or_default()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_growth_rate")]
    pub pasture_growth_rate: f64,
    #[serde(default = "default_consumption_rate")]
    pub stock_consumption_rate: f64,
    #[serde(default)]
    pub dm_floor: DryMatterFloor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_seed_dir")]
    pub seed_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_growth_rate() -> f64 {
    DEFAULT_GROWTH_RATE
}

fn default_consumption_rate() -> f64 {
    DEFAULT_CONSUMPTION_RATE
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./farm-data")
}

fn default_seed_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            pasture_growth_rate: DEFAULT_GROWTH_RATE,
            stock_consumption_rate: DEFAULT_CONSUMPTION_RATE,
            dm_floor: DryMatterFloor::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed_dir: default_seed_dir(),
        }
    }
}

impl TomlConfig {
    /// Loads a config file; dates must be quoted strings (`"2024-10-29"`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| FarmError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FarmError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FarmError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn growth_rate(&self) -> f64 {
        self.simulation.pasture_growth_rate
    }

    fn consumption_rate(&self) -> f64 {
        self.simulation.stock_consumption_rate
    }

    fn start_date(&self) -> NaiveDate {
        self.simulation.start_date
    }

    fn dm_floor(&self) -> DryMatterFloor {
        self.simulation.dm_floor
    }

    fn data_dir(&self) -> &Path {
        &self.storage.data_dir
    }

    fn seed_dir(&self) -> &Path {
        &self.storage.seed_dir
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_negative("simulation.pasture_growth_rate", self.simulation.pasture_growth_rate)?;
        validate_non_negative(
            "simulation.stock_consumption_rate",
            self.simulation.stock_consumption_rate,
        )?;
        crate::utils::validation::validate_path(
            "storage.data_dir",
            &self.storage.data_dir.to_string_lossy(),
        )?;
        crate::utils::validation::validate_path(
            "storage.seed_dir",
            &self.storage.seed_dir.to_string_lossy(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[simulation]
start_date = "2025-03-01"
pasture_growth_rate = 40.0
stock_consumption_rate = 12.5
dm_floor = "unclamped"

[storage]
data_dir = "/var/lib/farm"
seed_dir = "/etc/farm/seed"

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.start_date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(config.growth_rate(), 40.0);
        assert_eq!(config.consumption_rate(), 12.5);
        assert_eq!(config.dm_floor(), DryMatterFloor::Unclamped);
        assert_eq!(config.data_dir(), Path::new("/var/lib/farm"));
        assert!(config.verbose());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.growth_rate(), DEFAULT_GROWTH_RATE);
        assert_eq!(config.consumption_rate(), DEFAULT_CONSUMPTION_RATE);
        assert_eq!(config.start_date(), default_start_date());
        assert_eq!(config.dm_floor(), DryMatterFloor::Clamp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FARM_SIM_TEST_DATA_DIR", "/tmp/farm-test");

        let toml_content = r#"
[storage]
data_dir = "${FARM_SIM_TEST_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), Path::new("/tmp/farm-test"));

        std::env::remove_var("FARM_SIM_TEST_DATA_DIR");
    }

    #[test]
    fn test_negative_rate_fails_validation() {
        let toml_content = r#"
[simulation]
pasture_growth_rate = -5.0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(config.validate(), Err(FarmError::ConfigError { .. })));
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[simulation\nstart_date = ").unwrap_err();
        assert!(matches!(err, FarmError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[simulation]\npasture_growth_rate = 70.0\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.growth_rate(), 70.0);
    }
}
