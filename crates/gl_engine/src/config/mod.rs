//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// Implemented by config types that can be persisted to disk. The file
/// format is chosen by extension: `.toml` or `.ron`. An unsupported
/// extension is rejected before the filesystem is touched.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        if !path.ends_with(".toml") && !path.ends_with(".ron") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        if !path.ends_with(".toml") && !path.ends_with(".ron") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }

        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Default, PartialEq, Debug)]
    struct Sample {
        name: String,
        scale: f32,
    }

    impl Config for Sample {}

    #[test]
    fn test_load_rejects_unknown_extension() {
        let result = Sample::load_from_file("settings.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let result = Sample::default().save_to_file("settings.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
        assert!(!std::path::Path::new("settings.yaml").exists());
    }

    #[test]
    fn test_load_missing_file_reports_io() {
        let path = std::env::temp_dir().join("gl_engine_missing_config.toml");
        let path = path.to_string_lossy().into_owned();
        let result = Sample::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let path = std::env::temp_dir().join("gl_engine_config_round_trip.toml");
        let path = path.to_string_lossy().into_owned();

        let original = Sample {
            name: "quad".to_string(),
            scale: 2.5,
        };
        original.save_to_file(&path).unwrap();
        let loaded = Sample::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(original, loaded);
    }
}
