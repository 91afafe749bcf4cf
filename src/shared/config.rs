//! Application configuration. Year range, week start, cache backend, paths.

use crate::domain::{DomainError, StartOfWeek};
use serde::Deserialize;
use std::str::FromStr;

/// Default range of "business active" years materialized by a rebuild.
pub const EPOCH_START_YEAR: i32 = 2020;
pub const EPOCH_END_YEAR: i32 = 2050;

/// Hard bounds for any materialized range.
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2201;

pub const DEFAULT_DATA_DIR: &str = "./data";

/// Validated inputs of the calendar builder. Constructed only through [`BuilderConfig::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    epoch_year: i32,
    end_year: i32,
    start_of_week: StartOfWeek,
}

impl BuilderConfig {
    /// Fails fast on a malformed start-of-week token, Monday-start weeks,
    /// an inverted range, or years outside `MIN_YEAR..=MAX_YEAR`.
    pub fn new(epoch_year: i32, end_year: i32, start_of_week: &str) -> Result<Self, DomainError> {
        let start_of_week: StartOfWeek = start_of_week.parse()?;
        if start_of_week != StartOfWeek::Sunday {
            return Err(DomainError::Unsupported(
                "weeks that begin on Monday are not supported".to_string(),
            ));
        }
        if end_year < epoch_year {
            return Err(DomainError::Config(format!(
                "ending year {} cannot be smaller than starting year {}",
                end_year, epoch_year
            )));
        }
        if epoch_year < MIN_YEAR || end_year > MAX_YEAR {
            return Err(DomainError::Config(format!(
                "years must fall within {}..={} (got {}..={})",
                MIN_YEAR, MAX_YEAR, epoch_year, end_year
            )));
        }
        Ok(Self {
            epoch_year,
            end_year,
            start_of_week,
        })
    }

    pub fn epoch_year(&self) -> i32 {
        self.epoch_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    pub fn start_of_week(&self) -> StartOfWeek {
        self.start_of_week
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.epoch_year..=self.end_year
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            epoch_year: EPOCH_START_YEAR,
            end_year: EPOCH_END_YEAR,
            start_of_week: StartOfWeek::Sunday,
        }
    }
}

/// What a lookup returns when the cache has nothing, even after a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Return `None` / an empty collection.
    #[default]
    Lenient,
    /// Return `DomainError::NotFound`.
    Strict,
}

/// Which CachePort implementation the binary wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    Memory,
    #[default]
    Json,
    Sqlite,
}

impl FromStr for CacheBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "json" => Ok(CacheBackend::Json),
            "sqlite" => Ok(CacheBackend::Sqlite),
            other => Err(DomainError::Config(format!(
                "unknown cache backend '{}' (expected memory, json or sqlite)",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Key prefix for every cache entry. Read from TEMPORAL_NAMESPACE.
    #[serde(default)]
    pub namespace: Option<String>,

    /// First materialized year. Read from TEMPORAL_EPOCH_YEAR.
    #[serde(default)]
    pub epoch_year: Option<i32>,

    /// Last materialized year (inclusive). Read from TEMPORAL_END_YEAR.
    #[serde(default)]
    pub end_year: Option<i32>,

    /// `SUN` (only supported value) or `MON`. Read from TEMPORAL_START_OF_WEEK.
    #[serde(default)]
    pub start_of_week: Option<String>,

    /// Raise not-found errors instead of returning empty results. Read from TEMPORAL_STRICT_LOOKUPS.
    #[serde(default)]
    pub strict_lookups: Option<bool>,

    /// `memory`, `json` or `sqlite`. Read from TEMPORAL_CACHE_BACKEND.
    #[serde(default)]
    pub cache_backend: Option<String>,

    /// Directory for the JSON / SQLite cache files. Read from TEMPORAL_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TEMPORAL").try_parsing(true));
        if let Ok(path) = std::env::var("TEMPORAL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn namespace_or_default(&self) -> String {
        self.namespace
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| crate::domain::keys::DEFAULT_NAMESPACE.to_string())
    }

    pub fn epoch_year_or_default(&self) -> i32 {
        self.epoch_year.unwrap_or(EPOCH_START_YEAR)
    }

    pub fn end_year_or_default(&self) -> i32 {
        self.end_year.unwrap_or(EPOCH_END_YEAR)
    }

    pub fn start_of_week_or_default(&self) -> String {
        self.start_of_week
            .clone()
            .unwrap_or_else(|| StartOfWeek::Sunday.to_string())
    }

    pub fn lookup_mode(&self) -> LookupMode {
        if self.strict_lookups.unwrap_or(false) {
            LookupMode::Strict
        } else {
            LookupMode::Lenient
        }
    }

    pub fn cache_backend(&self) -> Result<CacheBackend, DomainError> {
        match &self.cache_backend {
            Some(s) => s.parse(),
            None => Ok(CacheBackend::default()),
        }
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    /// Builder configuration from the configured (or default) years and week start.
    pub fn builder_config(&self) -> Result<BuilderConfig, DomainError> {
        BuilderConfig::new(
            self.epoch_year_or_default(),
            self.end_year_or_default(),
            &self.start_of_week_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_config_accepts_sunday_range() {
        let cfg = BuilderConfig::new(2020, 2021, "SUN").unwrap();
        assert_eq!(cfg.epoch_year(), 2020);
        assert_eq!(cfg.end_year(), 2021);
        assert_eq!(cfg.years().count(), 2);
        assert_eq!(cfg.start_of_week(), StartOfWeek::Sunday);
        assert!(BuilderConfig::new(2021, 2021, "SUN").is_ok());
    }

    #[test]
    fn test_builder_config_rejects_bad_input() {
        assert!(matches!(
            BuilderConfig::new(2020, 2021, "MON"),
            Err(DomainError::Unsupported(_))
        ));
        assert!(matches!(
            BuilderConfig::new(2020, 2021, "Sunday"),
            Err(DomainError::Config(_))
        ));
        assert!(matches!(
            BuilderConfig::new(2022, 2021, "SUN"),
            Err(DomainError::Config(_))
        ));
        assert!(matches!(
            BuilderConfig::new(1999, 2021, "SUN"),
            Err(DomainError::Config(_))
        ));
        assert!(matches!(
            BuilderConfig::new(2020, 2202, "SUN"),
            Err(DomainError::Config(_))
        ));
    }

    #[test]
    fn test_app_config_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.namespace_or_default(), "temporal");
        assert_eq!(cfg.lookup_mode(), LookupMode::Lenient);
        assert_eq!(cfg.cache_backend().unwrap(), CacheBackend::Json);
        assert_eq!(cfg.data_dir_or_default(), "./data");
        assert_eq!(cfg.builder_config().unwrap(), BuilderConfig::default());
    }

    #[test]
    fn test_app_config_overrides() {
        let cfg = AppConfig {
            namespace: Some("cal".into()),
            epoch_year: Some(2021),
            end_year: Some(2023),
            strict_lookups: Some(true),
            cache_backend: Some("SQLite".into()),
            ..Default::default()
        };
        assert_eq!(cfg.namespace_or_default(), "cal");
        assert_eq!(cfg.lookup_mode(), LookupMode::Strict);
        assert_eq!(cfg.cache_backend().unwrap(), CacheBackend::Sqlite);
        let builder = cfg.builder_config().unwrap();
        assert_eq!((builder.epoch_year(), builder.end_year()), (2021, 2023));

        let bad = AppConfig {
            cache_backend: Some("redis".into()),
            ..Default::default()
        };
        assert!(bad.cache_backend().is_err());
    }
}
