// 该文件是 Vizio （视语） 项目的一部分。
// src/model/labels.rs - 标签与标定表
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

use std::{collections::HashMap, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
  distance::{CalibrationEntry, CalibrationTable, Orientation},
  model::split_label,
};

/// 内置的交通场景标签表
pub const DEFAULT_LABEL_TABLE: &str = include_str!("../../labels/transit.toml");

#[derive(Error, Debug)]
pub enum LabelTableError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("标签表格式错误: {0}")]
  ParseError(#[from] toml::de::Error),
  #[error("标签表为空")]
  Empty,
  #[error("标定参数无效: {family}/{orientation:?}")]
  InvalidCalibration {
    family: String,
    orientation: Orientation,
  },
  #[error("标定项重复: {family}/{orientation:?}")]
  DuplicateCalibration {
    family: String,
    orientation: Orientation,
  },
}

#[derive(Debug, Deserialize)]
struct LabelTableFile {
  labels: Vec<String>,
  #[serde(default)]
  phrases: HashMap<String, String>,
  #[serde(default)]
  calibration: Vec<CalibrationRecord>,
}

#[derive(Debug, Deserialize)]
struct CalibrationRecord {
  family: String,
  orientation: Orientation,
  focal_length: f64,
  width_inches: f64,
}

/// 启动时加载的只读数据：类别索引到标签、标签到播报短语、以及标定表
#[derive(Debug, Clone)]
pub struct LabelTable {
  labels: Vec<String>,
  phrases: HashMap<String, String>,
  calibration: CalibrationTable,
}

impl LabelTable {
  pub fn from_toml_str(raw: &str) -> Result<Self, LabelTableError> {
    let file: LabelTableFile = toml::from_str(raw)?;
    if file.labels.is_empty() {
      return Err(LabelTableError::Empty);
    }

    let mut calibration = CalibrationTable::default();
    for record in file.calibration {
      let entry = CalibrationEntry {
        focal_length: record.focal_length,
        width_inches: record.width_inches,
      };
      if !entry.is_valid() {
        return Err(LabelTableError::InvalidCalibration {
          family: record.family,
          orientation: record.orientation,
        });
      }
      if calibration
        .insert(&record.family, record.orientation, entry)
        .is_some()
      {
        return Err(LabelTableError::DuplicateCalibration {
          family: record.family,
          orientation: record.orientation,
        });
      }
    }

    debug!(
      "标签表: {} 个标签, {} 条短语, {} 条标定",
      file.labels.len(),
      file.phrases.len(),
      calibration.len()
    );

    Ok(Self {
      labels: file.labels,
      phrases: file.phrases,
      calibration,
    })
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LabelTableError> {
    let path = path.as_ref();
    info!("加载标签表: {}", path.display());
    let raw = std::fs::read_to_string(path)?;
    Self::from_toml_str(&raw)
  }

  pub fn builtin() -> Result<Self, LabelTableError> {
    Self::from_toml_str(DEFAULT_LABEL_TABLE)
  }

  pub fn label(&self, index: usize) -> Option<&str> {
    self.labels.get(index).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  pub fn calibration(&self) -> &CalibrationTable {
    &self.calibration
  }

  /// 播报用短语：优先使用显式映射，否则回退到 [`format_label`]
  pub fn phrase(&self, class_label: &str) -> String {
    self
      .phrases
      .get(class_label)
      .cloned()
      .unwrap_or_else(|| format_label(class_label))
  }
}

/// 通用标签格式化：`escalator_left` -> `Escalator at Left`
///
/// 不能拆成两段的标签原样返回。
pub fn format_label(class_label: &str) -> String {
  match split_label(class_label) {
    Some((object, direction)) => format!("{} at {}", capitalize(object), capitalize(direction)),
    None => class_label.to_string(),
  }
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
