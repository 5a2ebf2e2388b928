use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning constants fixed when a controller is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Fraction of angular velocity removed on each coasting frame.
    pub friction: f32,
    /// Scales the pointer-delta to angle conversion.
    pub pointer_sensitivity: f32,
    /// Angular velocity added per motion-key press.
    pub key_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            friction: 0.05,
            pointer_sensitivity: 0.3,
            key_speed: 0.05,
        }
    }
}

/// Errors from loading or validating an [`OrbitConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field}: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl OrbitConfig {
    /// Same defaults, different friction. Used for damped scene cameras.
    pub fn with_friction(friction: f32) -> Self {
        Self {
            friction,
            ..Self::default()
        }
    }

    /// Check the ranges the controller relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid {
                field: "friction",
                value: self.friction,
                reason: "must be within [0, 1]",
            });
        }
        for (field, value) in [
            ("pointer_sensitivity", self.pointer_sensitivity),
            ("key_speed", self.key_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }
        Ok(())
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&data)?;
        tracing::debug!(?config, path = %path.as_ref().display(), "loaded orbit config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_demo_constants() {
        let c = OrbitConfig::default();
        assert_eq!(c.friction, 0.05);
        assert_eq!(c.pointer_sensitivity, 0.3);
        assert_eq!(c.key_speed, 0.05);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c = OrbitConfig::from_json(r#"{ "friction": 0.06 }"#).unwrap();
        assert_eq!(c.friction, 0.06);
        assert_eq!(c.pointer_sensitivity, 0.3);
        assert_eq!(c.key_speed, 0.05);
    }

    #[test]
    fn friction_out_of_range_is_rejected() {
        let err = OrbitConfig::from_json(r#"{ "friction": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "friction", .. }));
        assert!(OrbitConfig::with_friction(-0.1).validate().is_err());
    }

    #[test]
    fn negative_speed_is_rejected() {
        let err = OrbitConfig::from_json(r#"{ "key_speed": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "key_speed", .. }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            OrbitConfig::from_json("{ friction"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "pointer_sensitivity": 0.5 }}"#).unwrap();
        let c = OrbitConfig::load(tmp.path()).unwrap();
        assert_eq!(c.pointer_sensitivity, 0.5);
        assert_eq!(c.friction, 0.05);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = OrbitConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
