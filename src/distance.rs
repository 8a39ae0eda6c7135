// 该文件是 Vizio （视语） 项目的一部分。
// src/distance.rs - 基于针孔模型的距离估计
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

use std::collections::HashMap;

use serde::Deserialize;

use crate::model::{BoundingBox, split_label};

/// 标定朝向，`left` 与 `right` 共用侧面常数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
  Front,
  Side,
}

impl Orientation {
  pub fn from_direction(direction: &str) -> Option<Self> {
    match direction {
      "front" => Some(Orientation::Front),
      "left" | "right" => Some(Orientation::Side),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationEntry {
  pub focal_length: f64,
  pub width_inches: f64,
}

impl CalibrationEntry {
  pub fn is_valid(&self) -> bool {
    self.focal_length.is_finite()
      && self.focal_length > 0.0
      && self.width_inches.is_finite()
      && self.width_inches > 0.0
  }
}

/// `(family, orientation) -> CalibrationEntry`
#[derive(Debug, Clone, Default)]
pub struct CalibrationTable {
  entries: HashMap<(String, Orientation), CalibrationEntry>,
}

/// 已测得的距离，单位英寸
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
  /// 未乘灵敏度系数的原始距离
  pub raw_inches: f64,
  /// 乘以 `distance_scale` 后用于播报的距离
  pub inches: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate {
  Measured(Distance),
  /// 像素宽度为零，距离未知
  Infinite,
  /// 标签无法拆分或没有对应的标定族
  NoEstimate,
}

impl Estimate {
  pub fn distance(&self) -> Option<Distance> {
    match self {
      Estimate::Measured(distance) => Some(*distance),
      Estimate::Infinite | Estimate::NoEstimate => None,
    }
  }
}

impl CalibrationTable {
  pub fn insert(
    &mut self,
    family: &str,
    orientation: Orientation,
    entry: CalibrationEntry,
  ) -> Option<CalibrationEntry> {
    self.entries.insert((family.to_string(), orientation), entry)
  }

  pub fn get(&self, family: &str, orientation: Orientation) -> Option<&CalibrationEntry> {
    self.entries.get(&(family.to_string(), orientation))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// 估计检测对象的实际距离
  ///
  /// `frame_dimension` 为推理输入分辨率（而非显示分辨率）。
  /// `distance = width * focal / pixel_width * distance_scale`
  pub fn estimate(
    &self,
    class_label: &str,
    bbox: &BoundingBox,
    frame_dimension: u32,
    distance_scale: f64,
  ) -> Estimate {
    let Some(entry) = split_label(class_label).and_then(|(family, direction)| {
      Orientation::from_direction(direction).and_then(|orientation| self.get(family, orientation))
    }) else {
      return Estimate::NoEstimate;
    };

    let pixel_width = frame_dimension as f64 * bbox.width() as f64;
    if !pixel_width.is_finite() || pixel_width <= 0.0 {
      return Estimate::Infinite;
    }

    let raw_inches = entry.width_inches * entry.focal_length / pixel_width;
    Estimate::Measured(Distance {
      raw_inches,
      inches: raw_inches * distance_scale,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table() -> CalibrationTable {
    let mut table = CalibrationTable::default();
    table.insert(
      "escalator",
      Orientation::Front,
      CalibrationEntry {
        focal_length: 83.29,
        width_inches: 56.67,
      },
    );
    table.insert(
      "escalator",
      Orientation::Side,
      CalibrationEntry {
        focal_length: 79.76,
        width_inches: 56.67,
      },
    );
    table
  }

  fn bbox(left: f32, right: f32) -> BoundingBox {
    BoundingBox {
      top: 0.1,
      left,
      bottom: 0.3,
      right,
    }
  }

  #[test]
  fn pinhole_distance_for_front_escalator() {
    let estimate = table().estimate("escalator_front", &bbox(0.2, 0.6), 320, 1.0);
    let distance = estimate.distance().unwrap();
    assert!((distance.inches - 36.876).abs() < 0.01);
    assert_eq!(distance.raw_inches, distance.inches);

    let scaled = table().estimate("escalator_front", &bbox(0.2, 0.6), 320, 2.2);
    let scaled = scaled.distance().unwrap();
    assert!((scaled.inches - distance.inches * 2.2).abs() < 1e-9);
    assert_eq!(scaled.raw_inches, distance.raw_inches);
  }

  #[test]
  fn left_and_right_share_side_constant() {
    let table = table();
    let left = table.estimate("escalator_left", &bbox(0.2, 0.6), 320, 1.0);
    let right = table.estimate("escalator_right", &bbox(0.2, 0.6), 320, 1.0);
    assert_eq!(left, right);
    assert_ne!(left, table.estimate("escalator_front", &bbox(0.2, 0.6), 320, 1.0));
  }

  #[test]
  fn monotonically_decreasing_in_pixel_width() {
    let table = table();
    let mut previous = f64::INFINITY;
    for step in 1..=50 {
      let right = 0.2 + step as f32 * 0.015;
      let distance = table
        .estimate("escalator_front", &bbox(0.2, right), 320, 1.0)
        .distance()
        .unwrap()
        .inches;
      assert!(distance < previous);
      previous = distance;
    }
  }

  #[test]
  fn zero_width_is_infinite_not_nan() {
    let estimate = table().estimate("escalator_front", &bbox(0.4, 0.4), 320, 1.0);
    assert_eq!(estimate, Estimate::Infinite);
    assert_eq!(estimate.distance(), None);
  }

  #[test]
  fn unknown_labels_have_no_estimate() {
    let table = table();
    for label in ["escalator", "escalator_up", "elevator_front", "a_b_c"] {
      assert_eq!(
        table.estimate(label, &bbox(0.2, 0.6), 320, 1.0),
        Estimate::NoEstimate
      );
    }
  }
}
