// 该文件是 Vizio （视语） 项目的一部分。
// src/config.rs - 运行时配置
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::{
  sync::{Arc, RwLock},
  time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feedback::MeasurementUnit;

mod store;

pub use self::store::{ConfigStore, ConfigStoreError, JsonFileStore};

pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.90;
pub const DEFAULT_DISTANCE_SCALE: f64 = 2.2;
pub const DEFAULT_DEBOUNCE_INTERVAL_MS: u64 = 1000;
pub const MAX_DISTANCE_SCALE: f64 = 5.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
  #[error("置信度阈值超出范围 [0, 1]: {0}")]
  ScoreThreshold(f32),
  #[error("距离系数超出范围 [0, 5]: {0}")]
  DistanceScale(f64),
  #[error("防抖间隔必须大于 0")]
  DebounceInterval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfiguration {
  pub score_threshold: f32,
  pub distance_scale: f64,
  pub debounce_interval_ms: u64,
  pub measurement_unit: MeasurementUnit,
  pub proximity_warning_enabled: bool,
}

impl Default for RuntimeConfiguration {
  fn default() -> Self {
    Self {
      score_threshold: DEFAULT_SCORE_THRESHOLD,
      distance_scale: DEFAULT_DISTANCE_SCALE,
      debounce_interval_ms: DEFAULT_DEBOUNCE_INTERVAL_MS,
      measurement_unit: MeasurementUnit::default(),
      proximity_warning_enabled: false,
    }
  }
}

impl RuntimeConfiguration {
  pub fn debounce_interval(&self) -> Duration {
    Duration::from_millis(self.debounce_interval_ms)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&self.score_threshold) {
      return Err(ConfigError::ScoreThreshold(self.score_threshold));
    }
    if !(0.0..=MAX_DISTANCE_SCALE).contains(&self.distance_scale) {
      return Err(ConfigError::DistanceScale(self.distance_scale));
    }
    if self.debounce_interval_ms == 0 {
      return Err(ConfigError::DebounceInterval);
    }
    Ok(())
  }
}

/// 共享运行时配置
///
/// 读者每帧取一次完整快照；写者构造新值后整体替换，读者不会看到写了一半的配置。
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
  inner: Arc<RwLock<Arc<RuntimeConfiguration>>>,
}

impl SharedConfig {
  pub fn new(config: RuntimeConfiguration) -> Self {
    Self {
      inner: Arc::new(RwLock::new(Arc::new(config))),
    }
  }

  pub fn snapshot(&self) -> Arc<RuntimeConfiguration> {
    let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
    Arc::clone(&guard)
  }

  pub fn replace(&self, config: RuntimeConfiguration) {
    let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
    *guard = Arc::new(config);
  }

  /// 基于当前值修改并整体替换，返回新的快照
  pub fn update<F>(&self, f: F) -> Arc<RuntimeConfiguration>
  where
    F: FnOnce(&mut RuntimeConfiguration),
  {
    let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
    let mut next = RuntimeConfiguration::clone(&guard);
    f(&mut next);
    let next = Arc::new(next);
    *guard = Arc::clone(&next);
    next
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let config = RuntimeConfiguration::default();
    assert_eq!(config.score_threshold, 0.90);
    assert_eq!(config.distance_scale, 2.2);
    assert_eq!(config.debounce_interval(), Duration::from_secs(1));
    assert_eq!(config.measurement_unit, MeasurementUnit::Inches);
    assert!(!config.proximity_warning_enabled);
    assert_eq!(config.validate(), Ok(()));
  }

  #[test]
  fn validate_rejects_out_of_range() {
    let scale = RuntimeConfiguration {
      distance_scale: 5.5,
      ..Default::default()
    };
    assert_eq!(scale.validate(), Err(ConfigError::DistanceScale(5.5)));

    let debounce = RuntimeConfiguration {
      debounce_interval_ms: 0,
      ..Default::default()
    };
    assert_eq!(debounce.validate(), Err(ConfigError::DebounceInterval));
  }

  #[test]
  fn snapshots_are_isolated_from_updates() {
    let shared = SharedConfig::new(RuntimeConfiguration::default());
    let before = shared.snapshot();
    let after = shared.update(|c| {
      c.measurement_unit = MeasurementUnit::Metres;
      c.debounce_interval_ms = 5000;
    });

    assert_eq!(before.measurement_unit, MeasurementUnit::Inches);
    assert_eq!(after.debounce_interval_ms, 5000);
    assert_eq!(*shared.snapshot(), *after);

    shared.replace(RuntimeConfiguration::default());
    assert_eq!(shared.snapshot().debounce_interval_ms, 1000);
  }

  #[test]
  fn missing_fields_take_defaults() {
    let config: RuntimeConfiguration =
      serde_json::from_str(r#"{"measurement_unit": "feet"}"#).unwrap();
    assert_eq!(config.measurement_unit, MeasurementUnit::Feet);
    assert_eq!(config.distance_scale, DEFAULT_DISTANCE_SCALE);
  }
}
