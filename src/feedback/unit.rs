// 该文件是 Vizio （视语） 项目的一部分。
// src/feedback/unit.rs - 距离单位与换算
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

use serde::{Deserialize, Serialize};

const INCHES_PER_FOOT: f64 = 12.0;
const METRES_PER_INCH: f64 = 0.0254;
const CENTIMETRES_PER_INCH: f64 = 2.54;
const MILLIMETRES_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
  #[default]
  Inches,
  Feet,
  Metres,
  Centimetres,
  Millimetres,
}

impl MeasurementUnit {
  #[cfg(test)]
  pub const ALL: [MeasurementUnit; 5] = [
    MeasurementUnit::Inches,
    MeasurementUnit::Feet,
    MeasurementUnit::Metres,
    MeasurementUnit::Centimetres,
    MeasurementUnit::Millimetres,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      MeasurementUnit::Inches => "inches",
      MeasurementUnit::Feet => "feet",
      MeasurementUnit::Metres => "metres",
      MeasurementUnit::Centimetres => "centimetres",
      MeasurementUnit::Millimetres => "millimetres",
    }
  }

  /// 将口语中的单位说法归一化
  pub fn from_synonym(word: &str) -> Option<Self> {
    let word = word
      .trim()
      .trim_end_matches(|c: char| c.is_ascii_punctuation());
    match word {
      "inch" | "inches" => Some(MeasurementUnit::Inches),
      "foot" | "feet" => Some(MeasurementUnit::Feet),
      "meter" | "meters" | "metre" | "metres" => Some(MeasurementUnit::Metres),
      "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
        Some(MeasurementUnit::Centimetres)
      }
      "millimeter" | "millimeters" | "millimetre" | "millimetres" => {
        Some(MeasurementUnit::Millimetres)
      }
      _ => None,
    }
  }

  /// 英寸换算到本单位，并按本单位的播报精度取整
  pub fn convert(&self, inches: f64) -> f64 {
    match self {
      MeasurementUnit::Inches => inches.round(),
      MeasurementUnit::Feet => (inches / INCHES_PER_FOOT).round(),
      MeasurementUnit::Metres => (inches * METRES_PER_INCH * 100.0).round() / 100.0,
      MeasurementUnit::Centimetres => (inches * CENTIMETRES_PER_INCH).round(),
      MeasurementUnit::Millimetres => (inches * MILLIMETRES_PER_INCH).round(),
    }
  }

  #[cfg(test)]
  pub fn to_inches(&self, value: f64) -> f64 {
    match self {
      MeasurementUnit::Inches => value,
      MeasurementUnit::Feet => value * INCHES_PER_FOOT,
      MeasurementUnit::Metres => value / METRES_PER_INCH,
      MeasurementUnit::Centimetres => value / CENTIMETRES_PER_INCH,
      MeasurementUnit::Millimetres => value / MILLIMETRES_PER_INCH,
    }
  }

  /// 本单位最小可播报步长，以英寸表示
  #[cfg(test)]
  pub fn step_inches(&self) -> f64 {
    match self {
      MeasurementUnit::Metres => self.to_inches(0.01),
      _ => self.to_inches(1.0),
    }
  }

  /// 播报用数字文本，米保留两位小数，其余取整
  pub fn format(&self, inches: f64) -> String {
    let value = self.convert(inches);
    match self {
      MeasurementUnit::Metres => format!("{:.2}", value),
      _ => format!("{}", value as i64),
    }
  }
}

impl fmt::Display for MeasurementUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
