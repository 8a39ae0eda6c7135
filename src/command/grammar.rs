// 该文件是 Vizio （视语） 项目的一部分。
// src/command/grammar.rs - 命令语法表
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

use regex::{Captures, Regex};
use tracing::debug;

use crate::{
  command::{Change, Field, Outcome},
  config::MAX_DISTANCE_SCALE,
  feedback::MeasurementUnit,
};

const THRESHOLD_PERCENT_RANGE: std::ops::RangeInclusive<u64> = 10..=99;
const DISTANCE_MAX_DECIMALS: usize = 2;

/// 语法规则类别，声明顺序即匹配优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
  Unit,
  DisableMeasurement,
  DebounceInterval,
  ScoreThreshold,
  DistanceScale,
}

impl RuleKind {
  pub const ORDER: [RuleKind; 5] = [
    RuleKind::Unit,
    RuleKind::DisableMeasurement,
    RuleKind::DebounceInterval,
    RuleKind::ScoreThreshold,
    RuleKind::DistanceScale,
  ];

  // 连接词 "to" 与识别结果中常见的 "2" 等价
  fn pattern(&self) -> &'static str {
    match self {
      RuleKind::Unit => r"\bmeasurements? (?:to|2) ([a-z]+)",
      RuleKind::DisableMeasurement => r"\b(?:no|disable) measurements?\b",
      RuleKind::DebounceInterval => {
        r"\b(?:bounce|debounce|report) (?:rate|time) (?:to|2) (\d+)(?: seconds?)?"
      }
      // 阈值必须是不以 0 开头的两位及以上数字，"07" 之类不匹配
      RuleKind::ScoreThreshold => r"\bthresholds? (?:change )?(?:to|2) ([1-9]\d+)\b",
      RuleKind::DistanceScale => r"\bdistance (?:to|2) (\d+(?:\.\d+)?)",
    }
  }

  fn resolve(&self, captures: &Captures) -> Outcome {
    let value = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    match self {
      RuleKind::Unit => match MeasurementUnit::from_synonym(value) {
        Some(unit) => Outcome::Applied(Change::Unit(unit)),
        None => Outcome::InvalidValue(Field::Measurement),
      },
      RuleKind::DisableMeasurement => Outcome::Applied(Change::DisableMeasurement),
      RuleKind::DebounceInterval => value
        .parse::<u64>()
        .ok()
        .filter(|seconds| *seconds > 0)
        .and_then(|seconds| seconds.checked_mul(1000))
        .map(|ms| Outcome::Applied(Change::DebounceIntervalMs(ms)))
        .unwrap_or(Outcome::InvalidValue(Field::Rate)),
      RuleKind::ScoreThreshold => value
        .parse::<u64>()
        .ok()
        .filter(|percent| THRESHOLD_PERCENT_RANGE.contains(percent))
        .map(|percent| Outcome::Applied(Change::ScoreThresholdPercent(percent as u8)))
        .unwrap_or(Outcome::InvalidValue(Field::Threshold)),
      RuleKind::DistanceScale => {
        let decimals = value.split_once('.').map_or(0, |(_, fraction)| fraction.len());
        value
          .parse::<f64>()
          .ok()
          .filter(|scale| {
            decimals <= DISTANCE_MAX_DECIMALS && (0.0..=MAX_DISTANCE_SCALE).contains(scale)
          })
          .map(|scale| Outcome::Applied(Change::DistanceScale(scale)))
          .unwrap_or(Outcome::InvalidValue(Field::Distance))
      }
    }
  }
}

struct Rule {
  kind: RuleKind,
  pattern: Regex,
}

/// 有序语法表，先匹配者生效
pub struct Grammar {
  rules: Vec<Rule>,
}

impl Grammar {
  pub fn new() -> Result<Self, regex::Error> {
    let rules = RuleKind::ORDER
      .iter()
      .map(|kind| {
        Ok(Rule {
          kind: *kind,
          pattern: Regex::new(kind.pattern())?,
        })
      })
      .collect::<Result<Vec<_>, regex::Error>>()?;
    Ok(Self { rules })
  }

  /// 第一条匹配的规则类别
  #[cfg(test)]
  pub fn matching_rule(&self, utterance: &str) -> Option<RuleKind> {
    self
      .rules
      .iter()
      .find(|rule| rule.pattern.is_match(utterance))
      .map(|rule| rule.kind)
  }

  pub fn resolve(&self, utterance: &str) -> Outcome {
    for rule in &self.rules {
      if let Some(captures) = rule.pattern.captures(utterance) {
        debug!("命令 \"{}\" 匹配规则 {:?}", utterance, rule.kind);
        return rule.kind.resolve(&captures);
      }
    }
    Outcome::Unrecognized
  }
}
