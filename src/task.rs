// 该文件是 Vizio （视语） 项目的一部分。
// src/task.rs - 帧处理流水线与语音命令会话
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
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  thread,
  time::{Duration, Instant},
};

use tracing::{debug, error, info, warn};

use crate::{
  command::{CommandInterpreter, Outcome},
  config::{ConfigStore, SharedConfig},
  feedback::compose,
  gate::{GateDecision, SpeechGate},
  input::{InferenceFrame, Recognizer, VoiceEvent},
  model::{LabelTable, decode},
  output::{CONFIRM_PULSE, Display, Haptic, PROXIMITY_PULSE, Priority, Speech},
};

pub const ACTIVATION_PROMPT: &str = "How can Vizio help you?";

/// 流水线使用的外部协作方
pub struct Outputs<S, H, D> {
  pub speech: S,
  pub haptic: H,
  pub display: D,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
  pub index: u64,
  pub detections: usize,
  pub decode_errors: usize,
  pub spoken: Vec<String>,
  pub alerts: usize,
}

/// 单帧处理：解码 -> 测距 -> 组合文本 -> 防抖 -> 播报
///
/// 帧按顺序逐一处理，防抖状态只在此处修改。
pub struct FeedbackPipeline {
  labels: LabelTable,
  frame_dimension: u32,
  config: SharedConfig,
  gate: SpeechGate,
}

impl FeedbackPipeline {
  pub fn new(labels: LabelTable, frame_dimension: u32, config: SharedConfig) -> Self {
    Self {
      labels,
      frame_dimension,
      config,
      gate: SpeechGate::new(),
    }
  }

  pub fn gate(&self) -> &SpeechGate {
    &self.gate
  }

  pub fn process_frame<S, H, D>(
    &mut self,
    frame: &InferenceFrame,
    speak_enabled: bool,
    outputs: &Outputs<S, H, D>,
  ) -> FrameReport
  where
    S: Speech,
    H: Haptic,
    D: Display,
  {
    self.process_frame_at(frame, speak_enabled, outputs, Instant::now())
  }

  /// `speak_enabled` 为 false 时（等待语音命令期间）只显示不播报
  pub fn process_frame_at<S, H, D>(
    &mut self,
    frame: &InferenceFrame,
    speak_enabled: bool,
    outputs: &Outputs<S, H, D>,
    now: Instant,
  ) -> FrameReport
  where
    S: Speech,
    H: Haptic,
    D: Display,
  {
    let config = self.config.snapshot();
    let interval = config.debounce_interval();
    let mut report = FrameReport {
      index: frame.index,
      ..Default::default()
    };
    debug!(
      "帧 {}: 显示分辨率 {:?}x{:?}, 推理分辨率 {}, 防抖状态 {:?}",
      frame.index,
      frame.width,
      frame.height,
      self.frame_dimension,
      self.gate.state(now, interval)
    );

    for decoded in decode(&frame.output, &self.labels, config.score_threshold) {
      let detection = match decoded {
        Ok(detection) => detection,
        Err(e) => {
          error!("帧 {}: {}", frame.index, e);
          report.decode_errors += 1;
          continue;
        }
      };
      report.detections += 1;

      let estimate = self.labels.calibration().estimate(
        &detection.class_label,
        &detection.bbox,
        self.frame_dimension,
        config.distance_scale,
      );
      let phrase = self.labels.phrase(&detection.class_label);
      let feedback = compose(&detection, &phrase, &estimate, &config);
      debug!("帧 {}: {:?} -> {:?}", frame.index, estimate, feedback);

      if let Err(e) = outputs.display.show(&feedback.display) {
        warn!("显示输出失败: {}", e);
      }

      if !speak_enabled {
        continue;
      }

      let busy = outputs.speech.is_speaking();
      if self
        .gate
        .evaluate(&detection.class_label, now, interval, busy)
        == GateDecision::Emit
      {
        info!("帧 {}: 播报 \"{}\"", frame.index, feedback.spoken);
        outputs.speech.speak(&feedback.spoken, Priority::Flush);
        if feedback.alert {
          PROXIMITY_PULSE.send(&outputs.haptic);
          report.alerts += 1;
        }
        report.spoken.push(feedback.spoken);
      }
    }

    report
  }
}

/// 语音命令会话：激活提示 -> 等待识别结果 -> 解释并回复
pub struct VoiceControl<C> {
  interpreter: CommandInterpreter,
  config: SharedConfig,
  store: C,
  awaiting: bool,
}

impl<C> VoiceControl<C>
where
  C: ConfigStore,
  C::Error: std::fmt::Display,
{
  pub fn new(config: SharedConfig, store: C) -> Result<Self, regex::Error> {
    Ok(Self {
      interpreter: CommandInterpreter::new()?,
      config,
      store,
      awaiting: false,
    })
  }

  /// 等待命令期间暂停正常的播报
  pub fn is_awaiting(&self) -> bool {
    self.awaiting
  }

  pub fn activate<S: Speech, R: Recognizer>(&mut self, speech: &S, recognizer: &R) {
    info!("语音命令已激活");
    speech.speak(ACTIVATION_PROMPT, Priority::Flush);
    self.awaiting = true;
    recognizer.begin_recognition();
  }

  pub fn handle<S, H, R>(
    &mut self,
    event: VoiceEvent,
    speech: &S,
    haptic: &H,
    recognizer: &R,
  ) -> Option<Outcome>
  where
    S: Speech,
    H: Haptic,
    R: Recognizer,
  {
    match event {
      VoiceEvent::Activate => {
        self.activate(speech, recognizer);
        None
      }
      VoiceEvent::Cancelled => {
        info!("语音识别已取消");
        self.awaiting = false;
        None
      }
      VoiceEvent::Recognized(text) => {
        if !self.awaiting {
          debug!("未激活时收到识别结果，视为一次完整会话");
        }
        self.awaiting = false;
        Some(self.execute(&text, speech, haptic))
      }
    }
  }

  fn execute<S: Speech, H: Haptic>(&mut self, text: &str, speech: &S, haptic: &H) -> Outcome {
    let outcome = self.interpreter.interpret(text, &self.config);
    if let Outcome::Applied(_) = outcome {
      if let Err(e) = self.store.save(&self.config.snapshot()) {
        warn!("保存配置失败: {}", e);
      }
      CONFIRM_PULSE.send(haptic);
    }
    speech.speak(&outcome.prompt(), Priority::Flush);
    outcome
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSummary {
  pub frames: usize,
  pub skipped_frames: usize,
  pub detections: usize,
  pub utterances: usize,
  pub commands: usize,
}

/// 连续处理帧源，直到帧源结束、达到帧数上限或收到停止信号
#[derive(Default, Debug)]
pub struct NavigationTask {
  frame_number: Option<usize>,
  frame_interval: Option<Duration>,
  stop: Option<Arc<AtomicBool>>,
}

impl NavigationTask {
  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }

  /// 回放时按固定间隔送帧，模拟相机帧率
  pub fn with_frame_interval(mut self, frame_interval: Option<Duration>) -> Self {
    self.frame_interval = frame_interval;
    self
  }

  pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
    self.stop = Some(stop);
    self
  }

  pub fn run_task<I, E, C, R, S, H, D>(
    self,
    input: I,
    pipeline: &mut FeedbackPipeline,
    voice: &mut VoiceControl<C>,
    recognizer: &R,
    outputs: &Outputs<S, H, D>,
  ) -> anyhow::Result<TaskSummary>
  where
    I: Iterator<Item = Result<InferenceFrame, E>>,
    E: std::fmt::Display,
    C: ConfigStore,
    C::Error: std::fmt::Display,
    R: Recognizer,
    S: Speech,
    H: Haptic,
    D: Display,
  {
    info!("开始任务...");
    let mut summary = TaskSummary::default();

    for frame in input {
      while let Some(event) = recognizer.poll() {
        if voice
          .handle(event, &outputs.speech, &outputs.haptic, recognizer)
          .is_some()
        {
          summary.commands += 1;
        }
      }

      let frame = match frame {
        Ok(frame) => frame,
        Err(e) => {
          warn!("跳过无效帧: {}", e);
          summary.skipped_frames += 1;
          continue;
        }
      };

      let report = pipeline.process_frame(&frame, !voice.is_awaiting(), outputs);
      summary.frames += 1;
      summary.detections += report.detections;
      summary.utterances += report.spoken.len();

      if self.frame_number.is_some_and(|n| summary.frames >= n) {
        info!("达到指定帧数 {}, 退出任务循环", summary.frames);
        break;
      }
      if self.stop.as_ref().is_some_and(|stop| stop.load(Ordering::Acquire)) {
        warn!("中断信号接收，退出任务循环");
        break;
      }
      if let Some(interval) = self.frame_interval {
        thread::sleep(interval);
      }
    }

    info!("任务完成，退出: {:?}", summary);
    Ok(summary)
  }
}
