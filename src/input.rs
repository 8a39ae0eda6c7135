// 该文件是 Vizio （视语） 项目的一部分。
// src/input.rs - 推理帧与语音输入
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

use crate::model::InferenceOutput;

/// 帧源交付的一帧：推理输出以及该帧的像素尺寸
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceFrame {
  pub index: u64,
  pub output: InferenceOutput,
  pub width: Option<u32>,
  pub height: Option<u32>,
}

mod replay;
mod voice;

pub use self::replay::{ReplayError, ReplaySource};
pub use self::voice::{ChannelRecognizer, Recognizer, VoiceEvent};
