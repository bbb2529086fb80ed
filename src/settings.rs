use anyhow::{anyhow, bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::calibration::{CalibrationConfig, Viewport};
use crate::dwell::DwellTimings;
use crate::prediction::PredictionConfig;
use crate::simulation::SimulationConfig;
use crate::smoothing::DEFAULT_ALPHA;

pub const PREDICT_URL_ENV: &str = "GAZEBOARD_PREDICT_URL";
pub const DEBUG_ENV: &str = "GAZEBOARD_DEBUG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub smoothing_alpha: f64,
    pub viewport: Viewport,
    pub calibration: CalibrationConfig,
    pub dwell: DwellTimings,
    pub prediction: PredictionConfig,
    pub tick_interval_ms: u64,
    pub simulation: SimulationConfig,
    /// Log a tick heartbeat every few seconds instead of every minute.
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_ALPHA,
            viewport: Viewport::default(),
            calibration: CalibrationConfig::default(),
            dwell: DwellTimings::default(),
            prediction: PredictionConfig::default(),
            tick_interval_ms: 50,
            simulation: SimulationConfig::default(),
            debug: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            bail!(
                "smoothing alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            );
        }
        if !(self.calibration.radius_px > 0.0) {
            bail!("calibration radius must be positive");
        }
        if !(self.viewport.width_px > 0.0 && self.viewport.height_px > 0.0) {
            bail!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width_px,
                self.viewport.height_px
            );
        }
        if self.prediction.max_results == 0 {
            bail!("prediction max_results must be at least 1");
        }
        if self.tick_interval_ms == 0 {
            bail!("tick interval must be at least 1ms");
        }
        if !(self.simulation.speed > 0.0) {
            bail!(
                "simulation speed must be positive, got {}",
                self.simulation.speed
            );
        }
        if !(self.simulation.arrive_radius > 0.0) {
            bail!(
                "simulation arrive radius must be positive, got {}",
                self.simulation.arrive_radius
            );
        }
        Ok(())
    }

    /// Applies `GAZEBOARD_PREDICT_URL` and `GAZEBOARD_DEBUG`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(PREDICT_URL_ENV).ok(),
            std::env::var(DEBUG_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, predict_url: Option<String>, debug: Option<String>) {
        if let Some(url) = predict_url.filter(|u| !u.trim().is_empty()) {
            self.prediction.endpoint = Some(url.trim().to_string());
        }
        if let Some(flag) = debug {
            self.debug = matches!(flag.trim(), "1" | "true" | "TRUE" | "True");
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<PipelineConfig>,
}

impl SettingsStore {
    /// Loads `path` if it exists. A file that fails to parse is logged and
    /// replaced by defaults; it is not rewritten until the next update.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(
                    "Ignoring unreadable settings at {} ({}); using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            })
        } else {
            PipelineConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> Result<PipelineConfig> {
        let guard = self
            .data
            .read()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        Ok(guard.clone())
    }

    /// Validates, stores and persists `config`.
    pub fn update(&self, config: PipelineConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = config;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: PipelineConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings at {}", self.path.display()))?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &PipelineConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationGrid;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.smoothing_alpha, 0.3);
        assert_eq!(config.calibration.radius_px, 50.0);
        assert_eq!(config.dwell.letter_ms, 1500);
        assert_eq!(config.dwell.prediction_ms, 100);
        assert_eq!(config.prediction.debounce_ms, 1500);
        assert_eq!(config.tick_interval_ms, 50);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.smoothing_alpha = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.calibration.radius_px = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.viewport.height_px = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.prediction.max_results = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.simulation.speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.simulation.arrive_radius = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.simulation.arrive_radius = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"smoothingAlpha": 0.5, "calibration": {"grid": "fivePoint"}}"#,
        )
        .unwrap();
        assert_eq!(config.smoothing_alpha, 0.5);
        assert_eq!(config.calibration.grid, CalibrationGrid::FivePoint);
        assert_eq!(config.calibration.radius_px, 50.0);
        assert_eq!(config.prediction, PredictionConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PipelineConfig::default();
        config.apply_overrides(Some(" http://localhost:3000/api/predict ".into()), Some("1".into()));
        assert_eq!(
            config.prediction.endpoint.as_deref(),
            Some("http://localhost:3000/api/predict")
        );
        assert!(config.debug);

        config.apply_overrides(Some("   ".into()), Some("no".into()));
        assert!(config.prediction.endpoint.is_some());
        assert!(!config.debug);
    }

    #[test]
    fn test_store_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_store_persists_updates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        let mut config = store.config().unwrap();
        config.dwell.letter_ms = 1200;
        store.update(config.clone()).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.config().unwrap().dwell.letter_ms, 1200);
        assert_eq!(reopened.config().unwrap(), config);
    }

    #[test]
    fn test_store_rejects_invalid_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut config = PipelineConfig::default();
        config.smoothing_alpha = 2.0;
        assert!(store.update(config).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_store_unparseable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.config().unwrap(), PipelineConfig::default());
        assert!(store.reload().is_err());
    }
}
