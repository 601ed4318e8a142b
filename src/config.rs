use crate::error::Result;
use crate::models::Thresholds;
use crate::utils::constants::{
    DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_THRESHOLDS, ENV_PREFIX, MAX_IMAGE_DIMENSION,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Mapping settings, layered as defaults < config file < `OZONE_MAPPER__*` env vars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MapperConfig {
    #[validate(length(equal = 5))]
    pub thresholds: Vec<f64>,

    /// Derive thresholds from this safe level and the day's maximum instead.
    #[validate(range(exclusive_min = 0.0))]
    pub reference_level: Option<f64>,

    pub patch_holes: bool,

    #[validate(range(min = 1, max = MAX_IMAGE_DIMENSION))]
    pub image_width: u32,

    #[validate(range(min = 1, max = MAX_IMAGE_DIMENSION))]
    pub image_height: u32,

    pub use_mmap: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            reference_level: None,
            patch_holes: true,
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
            use_mmap: false,
        }
    }
}

impl MapperConfig {
    /// Load settings from an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("thresholds"),
            )
            .build()?;

        let settings: MapperConfig = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Thresholds for a day whose highest reading is `observed_max`
    pub fn resolve_thresholds(&self, observed_max: i32) -> Result<Thresholds> {
        match self.reference_level {
            Some(level) => Thresholds::from_reference(level, observed_max as f64),
            None => Thresholds::from_slice(&self.thresholds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::Builder;

    // Tests that read the environment through `load` share this lock
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.patch_holes);
        assert_eq!(config.image_width, 500);

        let t = config.resolve_thresholds(420).unwrap();
        assert_eq!(t.as_array(), [100.0, 225.0, 350.0, 476.0, 600.0]);
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let _guard = env_lock();
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "thresholds = [50.0, 150.0, 300.0, 400.0, 500.0]")?;
        writeln!(file, "patch_holes = false")?;
        writeln!(file, "image_width = 800")?;

        let config = MapperConfig::load(Some(file.path()))?;
        assert_eq!(config.thresholds, vec![50.0, 150.0, 300.0, 400.0, 500.0]);
        assert!(!config.patch_holes);
        assert_eq!(config.image_width, 800);
        assert_eq!(config.image_height, 500);
        Ok(())
    }

    #[test]
    fn test_wrong_threshold_count_fails_validation() -> Result<()> {
        let _guard = env_lock();
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "thresholds = [50.0, 150.0]")?;

        assert!(MapperConfig::load(Some(file.path())).is_err());
        Ok(())
    }

    #[test]
    fn test_reference_level() {
        let config = MapperConfig {
            reference_level: Some(300.0),
            ..MapperConfig::default()
        };
        let t = config.resolve_thresholds(500).unwrap();
        assert_eq!(t.as_array(), [0.0, 150.0, 300.0, 400.0, 500.0]);
    }

    #[test]
    fn test_environment_overrides_file() -> Result<()> {
        let _guard = env_lock();
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "thresholds = [50.0, 150.0, 300.0, 400.0, 500.0]")?;
        writeln!(file, "patch_holes = true")?;
        writeln!(file, "image_width = 800")?;

        std::env::set_var("OZONE_MAPPER__THRESHOLDS", "1,2,3,4,5");
        std::env::set_var("OZONE_MAPPER__PATCH_HOLES", "false");
        let loaded = MapperConfig::load(Some(file.path()));
        std::env::remove_var("OZONE_MAPPER__THRESHOLDS");
        std::env::remove_var("OZONE_MAPPER__PATCH_HOLES");

        let config = loaded?;
        assert_eq!(config.thresholds, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(!config.patch_holes);
        assert_eq!(config.image_width, 800);
        Ok(())
    }
}
