// 该文件是 Vizio （视语） 项目的一部分。
// src/model/decoder.rs - 推理输出解码
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

use thiserror::Error;
use tracing::debug;

use crate::model::{BoundingBox, Detection, InferenceOutput, LabelTable};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
  #[error("类别索引越界: 第 {position} 个检测的类别 {class} 不在标签表中 (共 {labels} 个标签)")]
  InvalidClassIndex {
    position: usize,
    class: f32,
    labels: usize,
  },
}

/// 惰性解码器，按模型原始索引顺序产出超过阈值的检测
pub struct Decoded<'a> {
  output: &'a InferenceOutput,
  labels: &'a LabelTable,
  threshold: f32,
  position: usize,
  len: usize,
}

/// 解码一帧推理输出
///
/// 只保留 `score > threshold` 的项；不排序、不去重。
/// 类别索引越界会作为该项的错误返回，其余检测不受影响。
pub fn decode<'a>(
  output: &'a InferenceOutput,
  labels: &'a LabelTable,
  threshold: f32,
) -> Decoded<'a> {
  let len = output.usable_len();
  debug!(
    "解码推理输出: 报告数量 {:?}, 可用数量 {}, 阈值 {:.2}",
    output.count, len, threshold
  );
  Decoded {
    output,
    labels,
    threshold,
    position: 0,
    len,
  }
}

impl Decoded<'_> {
  fn decode_at(&self, position: usize) -> Result<Detection, DecodeError> {
    let class = self.output.classes[position];
    let invalid = || DecodeError::InvalidClassIndex {
      position,
      class,
      labels: self.labels.len(),
    };

    if !class.is_finite() || class < 0.0 {
      return Err(invalid());
    }
    let class_index = class as usize;
    let class_label = self.labels.label(class_index).ok_or_else(invalid)?;

    let row = &self.output.boxes[position * 4..position * 4 + 4];
    let bbox = BoundingBox::from_row(row).ok_or_else(invalid)?;

    Ok(Detection {
      class_index,
      class_label: class_label.to_string(),
      score: self.output.scores[position],
      bbox,
    })
  }
}

impl Iterator for Decoded<'_> {
  type Item = Result<Detection, DecodeError>;

  fn next(&mut self) -> Option<Self::Item> {
    while self.position < self.len {
      let position = self.position;
      self.position += 1;
      if self.output.scores[position] > self.threshold {
        return Some(self.decode_at(position));
      }
    }
    None
  }
}
