use crate::application::generator::GeneratorMode;
use crate::application::publisher::IndicatorMode;
use crate::domain::telemetry::LabelStyle;
use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TITLE: &str = "Automation Dashboard";
const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_VIEWER_BUFFER: usize = 16;

/// Named bundles of defaults matching the two observed demos.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardPreset {
    /// 10 positions, 1s ticks, independent draws, relative labels.
    #[default]
    Fast,
    /// 6 positions, 3s ticks, random walk over the mock history, clock labels.
    Smooth,
}

/// Initial contents of the rolling window.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HistorySeed {
    Zero,
    Mock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Frames a viewer may fall behind before frames are dropped.
    #[serde(default = "default_viewer_buffer")]
    pub viewer_buffer: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            viewer_buffer: default_viewer_buffer(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_viewer_buffer() -> usize {
    DEFAULT_VIEWER_BUFFER
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub title: String,
    pub tick_interval_ms: u64,
    pub window_capacity: usize,
    pub generator: GeneratorMode,
    pub indicators: IndicatorMode,
    pub labels: LabelStyle,
    pub history: HistorySeed,
    /// Overrides the built-in warning threshold when set.
    pub warning_threshold: Option<f64>,
    pub origin_temperature: f64,
    pub origin_energy: f64,
    pub seed: Option<u64>,
}

impl DashboardSettings {
    pub fn preset(preset: DashboardPreset) -> Self {
        let base = Self {
            title: DEFAULT_TITLE.to_string(),
            tick_interval_ms: 1000,
            window_capacity: 10,
            generator: GeneratorMode::Independent,
            indicators: IndicatorMode::Linked,
            labels: LabelStyle::Relative,
            history: HistorySeed::Zero,
            warning_threshold: None,
            origin_temperature: 24.0,
            origin_energy: 85.0,
            seed: None,
        };

        match preset {
            DashboardPreset::Fast => base,
            DashboardPreset::Smooth => Self {
                tick_interval_ms: 3000,
                window_capacity: 6,
                generator: GeneratorMode::RandomWalk,
                labels: LabelStyle::Clock,
                history: HistorySeed::Mock,
                ..base
            },
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(DashboardError::InvalidConfig(
                "dashboard.tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.window_capacity == 0 {
            return Err(DashboardError::InvalidConfig(
                "dashboard.window_capacity must be greater than 0".to_string(),
            ));
        }
        if let Some(threshold) = self.warning_threshold {
            if !threshold.is_finite() {
                return Err(DashboardError::InvalidConfig(format!(
                    "dashboard.warning_threshold must be finite, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }
}

/// File/env shape: every dashboard field is optional and falls back to the preset.
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    dashboard: RawDashboardSettings,
}

#[derive(Debug, Deserialize, Default)]
struct RawDashboardSettings {
    #[serde(default)]
    preset: DashboardPreset,
    title: Option<String>,
    tick_interval_ms: Option<u64>,
    window_capacity: Option<usize>,
    generator: Option<GeneratorMode>,
    indicators: Option<IndicatorMode>,
    labels: Option<LabelStyle>,
    history: Option<HistorySeed>,
    warning_threshold: Option<f64>,
    origin_temperature: Option<f64>,
    origin_energy: Option<f64>,
    seed: Option<u64>,
}

impl RawConfig {
    fn resolve(self) -> Result<AppConfig> {
        let raw = self.dashboard;
        let defaults = DashboardSettings::preset(raw.preset);

        let dashboard = DashboardSettings {
            title: raw.title.unwrap_or(defaults.title),
            tick_interval_ms: raw.tick_interval_ms.unwrap_or(defaults.tick_interval_ms),
            window_capacity: raw.window_capacity.unwrap_or(defaults.window_capacity),
            generator: raw.generator.unwrap_or(defaults.generator),
            indicators: raw.indicators.unwrap_or(defaults.indicators),
            labels: raw.labels.unwrap_or(defaults.labels),
            history: raw.history.unwrap_or(defaults.history),
            warning_threshold: raw.warning_threshold.or(defaults.warning_threshold),
            origin_temperature: raw.origin_temperature.unwrap_or(defaults.origin_temperature),
            origin_energy: raw.origin_energy.unwrap_or(defaults.origin_energy),
            seed: raw.seed.or(defaults.seed),
        };
        dashboard.validate()?;

        if self.server.viewer_buffer == 0 {
            return Err(DashboardError::InvalidConfig(
                "server.viewer_buffer must be greater than 0".to_string(),
            ));
        }

        Ok(AppConfig {
            server: self.server,
            dashboard,
        })
    }
}

const ENV_PREFIX: &str = "AUTODASH";

/// `AUTODASH_<SECTION>__<KEY>` variables, e.g. `AUTODASH_DASHBOARD__PRESET=smooth`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load `config/dashboard.*` (optional) overlaid with `AUTODASH_*` environment
/// variables.
pub fn load_config() -> Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(environment())
        .build()?;

    settings.try_deserialize::<RawConfig>()?.resolve()
}
