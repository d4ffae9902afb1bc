use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};
use tracing::warn;

use crate::{error::ConfigError, model::UnitSystem, provider::landverk, station::Station};

/// Fetches are throttled to one per station per five minutes.
pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Longest accepted scan interval; stations are only exported per day.
pub const MAX_SCAN_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// stations = ["lv_krambatangi", "lv_hvalba"]
/// unit_system = "metric"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Station identifiers from the catalog, e.g. "lv_hvalba".
    #[serde(default)]
    pub stations: Vec<String>,

    #[serde(default)]
    pub unit_system: UnitSystem,

    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_scan_interval() -> u64 {
    MIN_SCAN_INTERVAL.as_secs()
}

const fn default_timeout() -> u64 {
    10
}

fn default_base_url() -> String {
    landverk::DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations: Vec::new(),
            unit_system: UnitSystem::default(),
            scan_interval_secs: default_scan_interval(),
            timeout_secs: default_timeout(),
            base_url: default_base_url(),
        }
    }
}

impl Config {
    pub fn with_stations<I, S>(stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stations: stations.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Resolve every configured identifier against the catalog.
    ///
    /// Duplicates are dropped, keeping the first occurrence. Fails on the first
    /// unknown identifier without touching the network.
    pub fn resolve_stations(&self) -> Result<Vec<&'static Station>, ConfigError> {
        if self.stations.is_empty() {
            return Err(ConfigError::NoStations);
        }

        let mut resolved: Vec<&'static Station> = Vec::with_capacity(self.stations.len());
        for key in &self.stations {
            let station = Station::lookup(key.trim())?;
            if resolved.contains(&station) {
                warn!(station = station.key, "station configured more than once, ignoring duplicate");
                continue;
            }
            resolved.push(station);
        }

        Ok(resolved)
    }

    /// Configured scan interval, kept between the upstream throttle and one day.
    pub fn scan_interval(&self) -> Duration {
        let configured = Duration::from_secs(self.scan_interval_secs);
        if configured < MIN_SCAN_INTERVAL {
            warn!(
                configured_secs = self.scan_interval_secs,
                min_secs = MIN_SCAN_INTERVAL.as_secs(),
                "scan interval below the upstream throttle, using the minimum"
            );
            return MIN_SCAN_INTERVAL;
        }
        if configured > MAX_SCAN_INTERVAL {
            warn!(
                configured_secs = self.scan_interval_secs,
                max_secs = MAX_SCAN_INTERVAL.as_secs(),
                "scan interval above one day, using the maximum"
            );
            return MAX_SCAN_INTERVAL;
        }
        configured
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("fo", "foweather", "foweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_station_list_is_rejected() {
        let err = Config::default().resolve_stations().unwrap_err();

        assert_eq!(err, ConfigError::NoStations);
        assert!(err.to_string().contains("foweather configure"));
    }

    #[test]
    fn unknown_station_is_rejected() {
        let cfg = Config::with_stations(["lv_hvalba", "lv_doesnotexist"]);
        let err = cfg.resolve_stations().unwrap_err();

        assert_eq!(err, ConfigError::UnknownStation("lv_doesnotexist".into()));
    }

    #[test]
    fn stations_resolve_in_order_without_duplicates() {
        let cfg = Config::with_stations(["lv_krambatangi", "lv_hvalba", "lv_krambatangi"]);
        let keys: Vec<_> = cfg.resolve_stations().unwrap().iter().map(|s| s.key).collect();

        assert_eq!(keys, ["lv_krambatangi", "lv_hvalba"]);
    }

    #[test]
    fn parse_minimal_toml_uses_defaults() {
        let cfg: Config = toml::from_str(r#"stations = ["lv_sund"]"#).unwrap();

        assert_eq!(cfg.stations, ["lv_sund"]);
        assert_eq!(cfg.unit_system, UnitSystem::Metric);
        assert_eq!(cfg.scan_interval(), MIN_SCAN_INTERVAL);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.base_url, "https://lv.fo");
    }

    #[test]
    fn scan_interval_is_clamped_to_throttle() {
        let mut cfg = Config::with_stations(["lv_sund"]);

        cfg.scan_interval_secs = 30;
        assert_eq!(cfg.scan_interval(), MIN_SCAN_INTERVAL);

        cfg.scan_interval_secs = 900;
        assert_eq!(cfg.scan_interval(), Duration::from_secs(900));
    }

    #[test]
    fn huge_scan_interval_is_capped_to_a_day() {
        let mut cfg = Config::with_stations(["lv_sund"]);

        cfg.scan_interval_secs = u64::MAX;
        assert_eq!(cfg.scan_interval(), MAX_SCAN_INTERVAL);

        cfg.scan_interval_secs = MAX_SCAN_INTERVAL.as_secs();
        assert_eq!(cfg.scan_interval(), MAX_SCAN_INTERVAL);
    }

    #[test]
    fn load_missing_file_gives_default() {
        let path = std::env::temp_dir()
            .join(format!("foweather-missing-{}", std::process::id()))
            .join("config.toml");

        let cfg = Config::load(&path).expect("missing file is not an error");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn bad_unit_system_fails_to_parse() {
        let res = toml::from_str::<Config>(
            r#"
            stations = ["lv_sund"]
            unit_system = "kelvin"
            "#,
        );
        let err = res.unwrap_err().to_string();
        assert!(err.contains("Unknown unit system 'kelvin'"), "{err}");
    }

    #[test]
    fn unit_system_is_case_insensitive_in_toml() {
        let cfg: Config = toml::from_str(
            r#"
            stations = ["lv_sund"]
            unit_system = "Imperial"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.unit_system, UnitSystem::Imperial);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("foweather-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut cfg = Config::with_stations(["lv_hvalba"]);
        cfg.unit_system = UnitSystem::Imperial;
        cfg.save_to(&path).expect("save must succeed");

        let loaded = Config::load_from(&path).expect("load must succeed");
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(&dir);
    }
}
