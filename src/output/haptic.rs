// 该文件是 Vizio （视语） 项目的一部分。
// src/output/haptic.rs - 震动提醒
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

use tracing::info;

use crate::output::Haptic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticPulse {
  pub duration_ms: u64,
  pub intensity: u8,
}

impl HapticPulse {
  pub fn send<H: Haptic + ?Sized>(&self, haptic: &H) {
    haptic.pulse(self.duration_ms, self.intensity);
  }
}

/// 命令执行成功后的短震
pub const CONFIRM_PULSE: HapticPulse = HapticPulse {
  duration_ms: 100,
  intensity: 128,
};

/// 近距离提醒的长震
pub const PROXIMITY_PULSE: HapticPulse = HapticPulse {
  duration_ms: 500,
  intensity: 255,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogHaptic;

impl Haptic for LogHaptic {
  fn pulse(&self, duration_ms: u64, intensity: u8) {
    info!("震动: {} ms, 强度 {}", duration_ms, intensity);
  }
}
