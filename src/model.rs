// 该文件是 Vizio （视语） 项目的一部分。
// src/model.rs - 检测结果模型
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

use serde::Deserialize;

/// 标签中对象与方向之间的分隔符，例如 `escalator_left`
pub const LABEL_SEPARATOR: char = '_';

/// 归一化边界框，坐标均为相对于方形推理帧的 [0, 1] 小数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  pub top: f32,
  pub left: f32,
  pub bottom: f32,
  pub right: f32,
}

impl BoundingBox {
  /// 从 `[top, left, bottom, right]` 行构造
  pub fn from_row(row: &[f32]) -> Option<Self> {
    match row {
      [top, left, bottom, right] => Some(Self {
        top: *top,
        left: *left,
        bottom: *bottom,
        right: *right,
      }),
      _ => None,
    }
  }

  pub fn width(&self) -> f32 {
    self.right - self.left
  }

  pub fn height(&self) -> f32 {
    self.bottom - self.top
  }
}

/// 单帧中的一个检测对象，每帧重新生成，不会被修改
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
  pub class_index: usize,
  pub class_label: String,
  pub score: f32,
  pub bbox: BoundingBox,
}

/// 一帧推理的原始输出
///
/// 四个并行数组与模型输出张量一一对应：
/// - `scores[n]`
/// - `boxes[4n]`，每行 `[top, left, bottom, right]`
/// - `classes[n]`，以浮点数表示的类别索引
/// - `count`，模型报告的检测数量
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InferenceOutput {
  pub scores: Vec<f32>,
  pub boxes: Vec<f32>,
  pub classes: Vec<f32>,
  #[serde(default)]
  pub count: Option<f32>,
}

impl InferenceOutput {
  /// 可以安全解码的检测数量
  ///
  /// 取模型报告数量与各数组实际长度中的最小值；报告数量缺失或非法时按数组长度处理。
  pub fn usable_len(&self) -> usize {
    let available = self
      .scores
      .len()
      .min(self.classes.len())
      .min(self.boxes.len() / 4);
    match self.count {
      Some(count) if count.is_finite() && count >= 0.0 => available.min(count as usize),
      _ => available,
    }
  }
}

/// 将原始标签拆分为 `(对象, 方向)`，必须恰好两段
pub fn split_label(label: &str) -> Option<(&str, &str)> {
  let mut parts = label.split(LABEL_SEPARATOR);
  match (parts.next(), parts.next(), parts.next()) {
    (Some(object), Some(direction), None) if !object.is_empty() && !direction.is_empty() => {
      Some((object, direction))
    }
    _ => None,
  }
}

mod decoder;
mod labels;

pub use self::decoder::{DecodeError, Decoded, decode};
pub use self::labels::{DEFAULT_LABEL_TABLE, LabelTable, LabelTableError, format_label};
