// 该文件是 Vizio （视语） 项目的一部分。
// src/output.rs - 播报、震动与显示输出
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
use url::Url;

use crate::{FromUrl, FromUrlWithScheme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
  /// 打断当前播报
  Flush,
  /// 排在当前播报之后
  Enqueue,
}

/// 语音合成协作方，播报不阻塞调用方
pub trait Speech {
  fn speak(&self, text: &str, priority: Priority);
  fn is_speaking(&self) -> bool;
}

pub trait Haptic {
  fn pulse(&self, duration_ms: u64, intensity: u8);
}

/// 显示文本的输出面（屏幕提示或日志）
pub trait Display {
  type Error: std::fmt::Display;
  fn show(&self, text: &str) -> Result<(), Self::Error>;
}

mod haptic;
mod speech;
mod transcript;

pub use self::haptic::{CONFIRM_PULSE, HapticPulse, LogHaptic, PROXIMITY_PULSE};
pub use self::speech::{LogSpeech, SpeechBusy};
pub use self::transcript::{LogDisplay, TranscriptDisplay, TranscriptError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("文本记录错误: {0}")]
  TranscriptError(#[from] TranscriptError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum DisplayWrapper {
  Log(LogDisplay),
  Transcript(TranscriptDisplay),
}

impl FromUrl for DisplayWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      LogDisplay::SCHEME => Ok(DisplayWrapper::Log(LogDisplay)),
      TranscriptDisplay::SCHEME => Ok(DisplayWrapper::Transcript(TranscriptDisplay::from_url(
        url,
      )?)),
      scheme => Err(OutputError::SchemeMismatch(scheme.to_string())),
    }
  }
}

impl Display for DisplayWrapper {
  type Error = OutputError;

  fn show(&self, text: &str) -> Result<(), Self::Error> {
    match self {
      DisplayWrapper::Log(display) => match display.show(text) {
        Ok(()) => Ok(()),
        Err(never) => match never {},
      },
      DisplayWrapper::Transcript(display) => Ok(display.show(text)?),
    }
  }
}
