use chrono::Offset;
use crate::classification::category_map::CategoryMap;
use crate::classification::error::ConfigError;
use crate::classification::verdict::{VerdictPolicy, WeightMode};
use crate::image_classifier::models::model_config::ModelConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Tract,
    Fake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Stdin,
    Fake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub category_map: CategoryMap,
    pub verdict_policy: VerdictPolicy,
    pub model: ModelConfig,
    pub classifier: ClassifierKind,
    pub source: SourceKind,
    pub display: DisplayKind,
    pub tick_rate: Duration,
    pub model_retry_interval: Duration,
    pub fake_upload_interval: Duration,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            category_map: CategoryMap::default(),
            verdict_policy: VerdictPolicy::default(),
            model: ModelConfig::default(),
            classifier: ClassifierKind::Fake,
            source: SourceKind::Fake,
            display: DisplayKind::Console,
            tick_rate: Duration::from_secs(1),
            model_retry_interval: Duration::from_secs(5),
            fake_upload_interval: Duration::from_secs(3),
            logger_timezone: utc(),
        }
    }
}

/// Every field is optional; missing ones keep their defaults.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    category_map: Option<CategoryMap>,
    acceptance_threshold: Option<f32>,
    weight_mode: Option<WeightMode>,
    model: Option<ModelConfig>,
    classifier: Option<ClassifierKind>,
    source: Option<SourceKind>,
    display: Option<DisplayKind>,
    tick_rate_ms: Option<u64>,
    model_retry_interval_ms: Option<u64>,
    fake_upload_interval_ms: Option<u64>,
    utc_offset_hours: Option<i32>,
}

impl Config {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(text)?;
        let mut config = Config::default();

        if let Some(category_map) = file.category_map {
            config.category_map = category_map;
        }
        if let Some(threshold) = file.acceptance_threshold {
            if !(0.0..1.0).contains(&threshold) {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
            config.verdict_policy.acceptance_threshold = threshold;
        }
        if let Some(weight_mode) = file.weight_mode {
            config.verdict_policy.weight_mode = weight_mode;
        }
        if let Some(model) = file.model {
            config.model = model;
        }
        if let Some(classifier) = file.classifier {
            config.classifier = classifier;
        }
        if let Some(source) = file.source {
            config.source = source;
        }
        if let Some(display) = file.display {
            config.display = display;
        }
        if let Some(ms) = file.tick_rate_ms {
            config.tick_rate = Duration::from_millis(ms);
        }
        if let Some(ms) = file.model_retry_interval_ms {
            config.model_retry_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = file.fake_upload_interval_ms {
            config.fake_upload_interval = Duration::from_millis(ms);
        }
        if let Some(hours) = file.utc_offset_hours {
            config.logger_timezone = hours
                .checked_mul(3600)
                .and_then(chrono::FixedOffset::east_opt)
                .ok_or(ConfigError::InvalidUtcOffset(hours))?;
        }

        Ok(config)
    }

    pub fn acceptance_threshold(&self) -> f32 {
        self.verdict_policy.acceptance_threshold
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
