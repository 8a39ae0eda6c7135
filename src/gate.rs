// 该文件是 Vizio （视语） 项目的一部分。
// src/gate.rs - 播报防抖
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

use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
  /// 没有待冷却的播报
  Silent,
  /// 上次播报后的防抖计时中
  Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
  /// 语音引擎正在播报，本次不做判断，状态不变
  Busy,
  Emit,
  Suppress,
}

/// 播报防抖状态
///
/// 同一标签在一个防抖间隔内最多播报一次；标签变化立即打断防抖。
/// 忙碌检查与实际播报之间存在竞争，只保证尽力而为，不保证恰好一次。
#[derive(Debug, Default)]
pub struct SpeechGate {
  last_spoken_label: Option<String>,
  last_spoken_at: Option<Instant>,
}

impl SpeechGate {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn last_spoken_label(&self) -> Option<&str> {
    self.last_spoken_label.as_deref()
  }

  pub fn last_spoken_at(&self) -> Option<Instant> {
    self.last_spoken_at
  }

  pub fn state(&self, now: Instant, interval: Duration) -> GateState {
    match self.last_spoken_at {
      Some(at) if now.saturating_duration_since(at) <= interval => GateState::Cooling,
      _ => GateState::Silent,
    }
  }

  /// 判断该标签此刻是否应当播报；返回 `Emit` 时已记录本次播报
  pub fn evaluate(
    &mut self,
    label: &str,
    now: Instant,
    interval: Duration,
    busy: bool,
  ) -> GateDecision {
    if busy {
      debug!("语音引擎忙碌，跳过 {}", label);
      return GateDecision::Busy;
    }

    let label_changed = self.last_spoken_label.as_deref() != Some(label);
    let expired = self
      .last_spoken_at
      .is_none_or(|at| now.saturating_duration_since(at) > interval);

    if label_changed || expired {
      self.last_spoken_label = Some(label.to_string());
      self.last_spoken_at = Some(now);
      GateDecision::Emit
    } else {
      debug!("防抖抑制: {}", label);
      GateDecision::Suppress
    }
  }
}
