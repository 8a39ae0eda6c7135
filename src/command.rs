// 该文件是 Vizio （视语） 项目的一部分。
// src/command.rs - 语音命令解释
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

use std::fmt;

use tracing::{info, warn};

use crate::{
  config::{RuntimeConfiguration, SharedConfig},
  feedback::MeasurementUnit,
};

mod grammar;

pub use self::grammar::{Grammar, RuleKind};

pub const CONFIRMATION_PROMPT: &str = "Your command will be executed.";
pub const RETRY_PROMPT: &str = "Unrecognized command. Please try again.";

/// 命令可能修改的配置字段，用于错误播报
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Measurement,
  Rate,
  Threshold,
  Distance,
}

impl Field {
  pub fn name(&self) -> &'static str {
    match self {
      Field::Measurement => "measurement",
      Field::Rate => "rate",
      Field::Threshold => "threshold",
      Field::Distance => "distance",
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// 一次成功解析得到的配置变更
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
  /// 切换单位，同时关闭近距离提醒模式
  Unit(MeasurementUnit),
  /// 不再播报距离，改为近距离提醒模式
  DisableMeasurement,
  DebounceIntervalMs(u64),
  /// 百分比形式的阈值，10..=99
  ScoreThresholdPercent(u8),
  DistanceScale(f64),
}

impl Change {
  pub fn apply(&self, config: &mut RuntimeConfiguration) {
    match *self {
      Change::Unit(unit) => {
        config.measurement_unit = unit;
        config.proximity_warning_enabled = false;
      }
      Change::DisableMeasurement => config.proximity_warning_enabled = true,
      Change::DebounceIntervalMs(ms) => config.debounce_interval_ms = ms,
      Change::ScoreThresholdPercent(percent) => config.score_threshold = percent as f32 / 100.0,
      Change::DistanceScale(scale) => config.distance_scale = scale,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Applied(Change),
  InvalidValue(Field),
  Unrecognized,
}

impl Outcome {
  /// 对应的语音回复
  pub fn prompt(&self) -> String {
    match self {
      Outcome::Applied(_) => CONFIRMATION_PROMPT.to_string(),
      Outcome::InvalidValue(field) => format!("Invalid {}.", field),
      Outcome::Unrecognized => RETRY_PROMPT.to_string(),
    }
  }
}

/// 命令解释器
///
/// 按语法表顺序逐条尝试，只应用第一条匹配的规则。
/// 不阻塞，同步返回结果；持久化与播报由调用方完成。
pub struct CommandInterpreter {
  grammar: Grammar,
}

impl CommandInterpreter {
  pub fn new() -> Result<Self, regex::Error> {
    Ok(Self {
      grammar: Grammar::new()?,
    })
  }

  /// 只解析，不修改配置
  pub fn parse(&self, utterance: &str) -> Outcome {
    let utterance = utterance.trim().to_lowercase();
    self.grammar.resolve(&utterance)
  }

  /// 解析并在成功时更新共享配置
  pub fn interpret(&self, utterance: &str, config: &SharedConfig) -> Outcome {
    let outcome = self.parse(utterance);
    match &outcome {
      Outcome::Applied(change) => {
        let next = config.update(|c| change.apply(c));
        info!("执行命令 \"{}\": {:?} -> {:?}", utterance, change, next);
      }
      Outcome::InvalidValue(field) => warn!("命令 \"{}\" 的 {} 取值无效", utterance, field),
      Outcome::Unrecognized => warn!("无法识别的命令: \"{}\"", utterance),
    }
    outcome
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn interpreter() -> CommandInterpreter {
    CommandInterpreter::new().unwrap()
  }

  #[test]
  fn unit_change_clears_warning_mode() {
    let config = SharedConfig::new(RuntimeConfiguration {
      proximity_warning_enabled: true,
      ..Default::default()
    });
    let outcome = interpreter().interpret("Change measurements to metres", &config);
    assert_eq!(outcome, Outcome::Applied(Change::Unit(MeasurementUnit::Metres)));
    let snapshot = config.snapshot();
    assert_eq!(snapshot.measurement_unit, MeasurementUnit::Metres);
    assert!(!snapshot.proximity_warning_enabled);
  }

  #[test]
  fn debounce_change_sets_milliseconds() {
    let config = SharedConfig::default();
    let outcome = interpreter().interpret("set a debounce time to 5 seconds", &config);
    assert_eq!(outcome, Outcome::Applied(Change::DebounceIntervalMs(5000)));
    assert_eq!(config.snapshot().debounce_interval_ms, 5000);

    let outcome = interpreter().interpret("report rate 2 0", &config);
    assert_eq!(outcome, Outcome::InvalidValue(Field::Rate));
    assert_eq!(config.snapshot().debounce_interval_ms, 5000);

    let outcome = interpreter().interpret("debounce time to 0 seconds", &config);
    assert_eq!(outcome, Outcome::InvalidValue(Field::Rate));
    assert_eq!(config.snapshot().debounce_interval_ms, 5000);

    let outcome = interpreter().interpret("bounce rate to 1 second", &config);
    assert_eq!(outcome, Outcome::Applied(Change::DebounceIntervalMs(1000)));
  }

  #[test]
  fn disable_measurement_enables_warning_mode() {
    let config = SharedConfig::default();
    for utterance in ["no measurements", "Disable measurement please"] {
      config.replace(RuntimeConfiguration::default());
      assert_eq!(
        interpreter().interpret(utterance, &config),
        Outcome::Applied(Change::DisableMeasurement)
      );
      assert!(config.snapshot().proximity_warning_enabled);
    }
  }

  #[test]
  fn threshold_requires_two_digits() {
    let config = SharedConfig::default();
    assert_eq!(
      interpreter().interpret("threshold change to 07", &config),
      Outcome::Unrecognized
    );
    assert_eq!(
      interpreter().interpret("thresholds to 150", &config),
      Outcome::InvalidValue(Field::Threshold)
    );
    assert_eq!(config.snapshot().score_threshold, 0.90);

    assert_eq!(
      interpreter().interpret("threshold change to 75", &config),
      Outcome::Applied(Change::ScoreThresholdPercent(75))
    );
    assert_eq!(config.snapshot().score_threshold, 0.75);
  }

  #[test]
  fn threshold_bounds_are_inclusive() {
    let config = SharedConfig::default();
    assert_eq!(
      interpreter().interpret("threshold to 10", &config),
      Outcome::Applied(Change::ScoreThresholdPercent(10))
    );
    assert_eq!(config.snapshot().score_threshold, 0.10);

    assert_eq!(
      interpreter().interpret("threshold to 99", &config),
      Outcome::Applied(Change::ScoreThresholdPercent(99))
    );
    assert_eq!(config.snapshot().score_threshold, 0.99);

    assert_eq!(
      interpreter().interpret("threshold to 100", &config),
      Outcome::InvalidValue(Field::Threshold)
    );
    assert_eq!(config.snapshot().score_threshold, 0.99);
  }

  #[test]
  fn distance_scale_bounds_are_inclusive() {
    let config = SharedConfig::default();
    assert_eq!(
      interpreter().interpret("distance to 0", &config),
      Outcome::Applied(Change::DistanceScale(0.0))
    );
    assert_eq!(config.snapshot().distance_scale, 0.0);

    assert_eq!(
      interpreter().interpret("distance to 5", &config),
      Outcome::Applied(Change::DistanceScale(5.0))
    );
    assert_eq!(config.snapshot().distance_scale, 5.0);

    assert_eq!(
      interpreter().interpret("distance to 5.01", &config),
      Outcome::InvalidValue(Field::Distance)
    );
    assert_eq!(config.snapshot().distance_scale, 5.0);
  }

  #[test]
  fn distance_scale_bounds() {
    let config = SharedConfig::default();
    assert_eq!(
      interpreter().interpret("distance to 6", &config),
      Outcome::InvalidValue(Field::Distance)
    );
    assert_eq!(
      interpreter().interpret("distance to 1.234", &config),
      Outcome::InvalidValue(Field::Distance)
    );
    assert_eq!(config.snapshot().distance_scale, 2.2);

    assert_eq!(
      interpreter().interpret("distance to 1.25", &config),
      Outcome::Applied(Change::DistanceScale(1.25))
    );
    assert_eq!(config.snapshot().distance_scale, 1.25);
  }

  #[test]
  fn unknown_unit_is_an_invalid_measurement() {
    assert_eq!(
      interpreter().parse("measurement to furlongs"),
      Outcome::InvalidValue(Field::Measurement)
    );
  }

  #[test]
  fn unmatched_utterance_is_unrecognized() {
    let config = SharedConfig::default();
    assert_eq!(interpreter().interpret("what time is it", &config), Outcome::Unrecognized);
    assert_eq!(*config.snapshot(), RuntimeConfiguration::default());
  }

  #[test]
  fn prompts() {
    assert_eq!(Outcome::InvalidValue(Field::Rate).prompt(), "Invalid rate.");
    assert_eq!(Outcome::Unrecognized.prompt(), RETRY_PROMPT);
    assert_eq!(
      Outcome::Applied(Change::DisableMeasurement).prompt(),
      CONFIRMATION_PROMPT
    );
  }
}
