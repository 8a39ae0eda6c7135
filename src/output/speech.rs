// 该文件是 Vizio （视语） 项目的一部分。
// src/output/speech.rs - 语音播报
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

use std::{
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
  },
  time::{Duration, Instant},
};

use tracing::info;

use crate::output::{Priority, Speech};

/// 按文本长度估算的播报时长
const SPEECH_MS_PER_CHAR: u64 = 60;
const SPEECH_MIN_MS: u64 = 400;

pub fn estimated_duration(text: &str) -> Duration {
  let chars = text.chars().count() as u64;
  Duration::from_millis((chars * SPEECH_MS_PER_CHAR).max(SPEECH_MIN_MS))
}

/// 语音引擎忙碌标志，由引擎一侧写入，流水线每次判断只读一次
#[derive(Debug, Clone, Default)]
pub struct SpeechBusy(Arc<AtomicBool>);

impl SpeechBusy {
  pub fn set(&self, speaking: bool) {
    self.0.store(speaking, Ordering::Release);
  }

  pub fn get(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

/// 将播报写入日志的语音输出
///
/// 没有真实引擎回调时，按估算时长模拟播报过程中的忙碌状态。
#[derive(Debug, Default)]
pub struct LogSpeech {
  busy: SpeechBusy,
  speaking_until: Mutex<Option<Instant>>,
}

impl LogSpeech {
  pub fn new() -> Self {
    Self::default()
  }

  /// 供外部引擎回调更新忙碌状态
  pub fn busy_handle(&self) -> SpeechBusy {
    self.busy.clone()
  }

  fn speak_at(&self, text: &str, priority: Priority, now: Instant) {
    info!("播报 [{:?}]: {}", priority, text);
    let mut until = self.speaking_until.lock().unwrap_or_else(|e| e.into_inner());
    let start = match (priority, *until) {
      (Priority::Enqueue, Some(end)) if end > now => end,
      _ => now,
    };
    *until = Some(start + estimated_duration(text));
  }

  fn is_speaking_at(&self, now: Instant) -> bool {
    if self.busy.get() {
      return true;
    }
    let until = self.speaking_until.lock().unwrap_or_else(|e| e.into_inner());
    until.is_some_and(|end| now < end)
  }
}

impl Speech for LogSpeech {
  fn speak(&self, text: &str, priority: Priority) {
    self.speak_at(text, priority, Instant::now());
  }

  fn is_speaking(&self) -> bool {
    self.is_speaking_at(Instant::now())
  }
}
