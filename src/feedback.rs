// 该文件是 Vizio （视语） 项目的一部分。
// src/feedback.rs - 播报与显示文本生成
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

mod unit;

pub use self::unit::MeasurementUnit;

use crate::{config::RuntimeConfiguration, distance::Estimate, model::Detection};

/// 近距离提醒阈值，按未缩放的英寸距离比较，与当前单位无关
pub const PROXIMITY_THRESHOLD_INCHES: f64 = 50.0;

/// 单个检测生成的反馈
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
  /// 播报文本
  pub spoken: String,
  /// 显示/日志文本，始终包含原始标签与置信度
  pub display: String,
  /// 是否需要触发近距离震动提醒
  pub alert: bool,
}

/// 组合一条检测的反馈文本
///
/// `phrase` 为标签的可读短语（见 [`crate::model::LabelTable::phrase`]）。
/// 距离未知时两种文本都退化为只含标签。
pub fn compose(
  detection: &Detection,
  phrase: &str,
  estimate: &Estimate,
  config: &RuntimeConfiguration,
) -> Feedback {
  let unit = config.measurement_unit;
  let score = format!("{:.2}", detection.score as f64 * 100.0);

  let Some(distance) = estimate.distance() else {
    return Feedback {
      spoken: phrase.to_string(),
      display: format!("{} {}%", detection.class_label, score),
      alert: false,
    };
  };

  let converted = unit.format(distance.inches);
  let display = format!(
    "{} {}% {} {} away",
    detection.class_label, score, converted, unit
  );

  if config.proximity_warning_enabled {
    let alert = distance.raw_inches < PROXIMITY_THRESHOLD_INCHES;
    let spoken = if alert {
      format!("{} Be careful!", phrase)
    } else {
      phrase.to_string()
    };
    return Feedback {
      spoken,
      display,
      alert,
    };
  }

  Feedback {
    spoken: format!("{} {} {} away", phrase, converted, unit),
    display,
    alert: false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{distance::Distance, model::BoundingBox};

  fn detection() -> Detection {
    Detection {
      class_index: 3,
      class_label: "escalator_front".to_string(),
      score: 0.9512,
      bbox: BoundingBox {
        top: 0.1,
        left: 0.2,
        bottom: 0.3,
        right: 0.6,
      },
    }
  }

  fn measured(raw: f64, scale: f64) -> Estimate {
    Estimate::Measured(Distance {
      raw_inches: raw,
      inches: raw * scale,
    })
  }

  #[test]
  fn distance_mode_speaks_converted_distance() {
    let config = RuntimeConfiguration {
      measurement_unit: MeasurementUnit::Feet,
      ..Default::default()
    };
    let feedback = compose(&detection(), "escalator", &measured(60.0, 2.0), &config);
    assert_eq!(feedback.spoken, "escalator 10 feet away");
    assert_eq!(feedback.display, "escalator_front 95.12% 10 feet away");
    assert!(!feedback.alert);
  }

  #[test]
  fn warning_mode_alerts_below_threshold_on_raw_inches() {
    let config = RuntimeConfiguration {
      proximity_warning_enabled: true,
      ..Default::default()
    };

    let near = compose(&detection(), "escalator", &measured(40.0, 2.2), &config);
    assert_eq!(near.spoken, "escalator Be careful!");
    assert!(near.alert);
    assert_eq!(near.display, "escalator_front 95.12% 88 inches away");

    let far = compose(&detection(), "escalator", &measured(55.0, 0.5), &config);
    assert_eq!(far.spoken, "escalator");
    assert!(!far.alert);
  }

  #[test]
  fn proximity_cutoff_is_strictly_below_fifty_inches() {
    let config = RuntimeConfiguration {
      proximity_warning_enabled: true,
      ..Default::default()
    };

    let at_cutoff = compose(&detection(), "escalator", &measured(50.0, 1.0), &config);
    assert_eq!(at_cutoff.spoken, "escalator");
    assert!(!at_cutoff.alert);

    let inside = compose(&detection(), "escalator", &measured(49.99, 1.0), &config);
    assert_eq!(inside.spoken, "escalator Be careful!");
    assert!(inside.alert);

    // 只看原始距离，缩放后超过 50 仍然提醒
    let scaled = compose(&detection(), "escalator", &measured(49.99, 5.0), &config);
    assert!(scaled.alert);
  }

  #[test]
  fn unknown_distance_degrades_to_label() {
    let config = RuntimeConfiguration {
      proximity_warning_enabled: true,
      ..Default::default()
    };
    for estimate in [Estimate::Infinite, Estimate::NoEstimate] {
      let feedback = compose(&detection(), "Escalator at Front", &estimate, &config);
      assert_eq!(feedback.spoken, "Escalator at Front");
      assert_eq!(feedback.display, "escalator_front 95.12%");
      assert!(!feedback.alert);
    }
  }
}
