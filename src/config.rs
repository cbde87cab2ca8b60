use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "CATALOG_EXPLORER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Tunables for aggregation, preview and export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Earliest year shown in the releases-by-year chart.
    pub year_floor: i32,
    pub top_genres: usize,
    pub top_directors: usize,
    pub top_actors: usize,
    /// Maximum rows rendered in the table preview. Export is never capped.
    pub preview_rows: usize,
    /// Field delimiter for `.csv` input and for export.
    pub delimiter: char,
    pub export_file_name: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            year_floor: 2000,
            top_genres: 10,
            top_directors: 10,
            top_actors: 15,
            preview_rows: 500,
            delimiter: ',',
            export_file_name: "catalog_filtered.csv".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the optional JSON file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_ENV).ok();
        let path = path.or(env_path.as_deref().map(Path::new));

        let mut config = match path {
            Some(p) => {
                log::info!("Reading config from {}", p.display());
                Self::from_json(&std::fs::read_to_string(p)?)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `CATALOG_*` overrides looked up through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        fn parse<T: std::str::FromStr>(
            key: &'static str,
            raw: Option<String>,
        ) -> Result<Option<T>, ConfigError> {
            raw.map(|v| {
                v.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
                    key,
                    reason: format!("'{v}' is not a valid number"),
                })
            })
            .transpose()
        }

        if let Some(v) = parse::<i32>("CATALOG_YEAR_FLOOR", lookup("CATALOG_YEAR_FLOOR"))? {
            self.year_floor = v;
        }
        if let Some(v) = parse::<usize>("CATALOG_TOP_GENRES", lookup("CATALOG_TOP_GENRES"))? {
            self.top_genres = v;
        }
        if let Some(v) = parse::<usize>("CATALOG_TOP_DIRECTORS", lookup("CATALOG_TOP_DIRECTORS"))? {
            self.top_directors = v;
        }
        if let Some(v) = parse::<usize>("CATALOG_TOP_ACTORS", lookup("CATALOG_TOP_ACTORS"))? {
            self.top_actors = v;
        }
        if let Some(v) = parse::<usize>("CATALOG_PREVIEW_ROWS", lookup("CATALOG_PREVIEW_ROWS"))? {
            self.preview_rows = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, n) in [
            ("top_genres", self.top_genres),
            ("top_directors", self.top_directors),
            ("top_actors", self.top_actors),
        ] {
            if n == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::Invalid {
                key: "delimiter",
                reason: format!("'{}' is not a single-byte character", self.delimiter),
            });
        }
        Ok(())
    }

    /// The delimiter as the byte the `csv` crate expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        u8::try_from(self.delimiter).unwrap_or(b',')
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_dashboard_layout() {
        let config = DashboardConfig::default();
        assert_eq!(config.year_floor, 2000);
        assert_eq!(config.top_genres, 10);
        assert_eq!(config.top_directors, 10);
        assert_eq!(config.top_actors, 15);
        assert_eq!(config.delimiter_byte(), b',');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_overrides_only_given_fields() {
        let config = DashboardConfig::from_json(r#"{ "year_floor": 1990, "delimiter": ";" }"#).unwrap();
        assert_eq!(config.year_floor, 1990);
        assert_eq!(config.delimiter_byte(), b';');
        assert_eq!(config.top_actors, 15);
    }

    #[test]
    fn json_rejects_unknown_keys() {
        let err = DashboardConfig::from_json(r#"{ "year_flor": 1990 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> =
            [("CATALOG_TOP_ACTORS", "5"), ("CATALOG_YEAR_FLOOR", " 2010 ")].into();
        let mut config = DashboardConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.top_actors, 5);
        assert_eq!(config.year_floor, 2010);
        assert_eq!(config.top_genres, 10);
    }

    #[test]
    fn bad_env_value_is_reported() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_env(|k| (k == "CATALOG_TOP_GENRES").then(|| "ten".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CATALOG_TOP_GENRES", .. }));
    }

    #[test]
    fn validation_rejects_zero_limits_and_wide_delimiters() {
        let config = DashboardConfig {
            top_directors: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "top_directors", .. })
        ));

        let config = DashboardConfig {
            delimiter: '§',
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, r#"{ "preview_rows": 20 }"#).unwrap();
        let config = DashboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.preview_rows, 20);
    }
}
