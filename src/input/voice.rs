// 该文件是 Vizio （视语） 项目的一部分。
// src/input/voice.rs - 语音识别输入
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
  io::BufRead,
  sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender, TryRecvError},
  },
  thread,
};

use tracing::{debug, info, warn};

const ACTIVATE_KEYWORD: &str = "mic";
const CANCEL_KEYWORD: &str = "cancel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
  /// 用户按下麦克风按钮
  Activate,
  Recognized(String),
  Cancelled,
}

impl VoiceEvent {
  /// 文本行到事件：`mic` 激活，`cancel` 取消，其余视为识别结果，空行忽略
  pub fn from_line(line: &str) -> Option<Self> {
    match line.trim() {
      "" => None,
      ACTIVATE_KEYWORD => Some(VoiceEvent::Activate),
      CANCEL_KEYWORD => Some(VoiceEvent::Cancelled),
      text => Some(VoiceEvent::Recognized(text.to_string())),
    }
  }
}

/// 一次性语音识别协作方，结果异步到达
pub trait Recognizer {
  fn begin_recognition(&self);
  /// 非阻塞地取出一个已到达的事件
  fn poll(&self) -> Option<VoiceEvent>;
}

/// 通过 channel 接收事件的识别器
pub struct ChannelRecognizer {
  receiver: Receiver<VoiceEvent>,
  listening: AtomicBool,
}

impl ChannelRecognizer {
  pub fn new() -> (Sender<VoiceEvent>, Self) {
    let (sender, receiver) = mpsc::channel();
    (
      sender,
      Self {
        receiver,
        listening: AtomicBool::new(false),
      },
    )
  }

  /// 从任意按行读取的来源产生事件，在后台线程中读取
  pub fn spawn_reader<R>(reader: R) -> Self
  where
    R: BufRead + Send + 'static,
  {
    let (sender, recognizer) = Self::new();
    thread::spawn(move || {
      for line in reader.lines() {
        let line = match line {
          Ok(line) => line,
          Err(e) => {
            warn!("读取语音输入失败: {}", e);
            break;
          }
        };
        if let Some(event) = VoiceEvent::from_line(&line)
          && sender.send(event).is_err()
        {
          break;
        }
      }
      debug!("语音输入结束");
    });
    recognizer
  }

  pub fn stdin() -> Self {
    Self::spawn_reader(std::io::BufReader::new(std::io::stdin()))
  }

  pub fn is_listening(&self) -> bool {
    self.listening.load(Ordering::Acquire)
  }
}

impl Recognizer for ChannelRecognizer {
  fn begin_recognition(&self) {
    info!("开始语音识别");
    self.listening.store(true, Ordering::Release);
  }

  fn poll(&self) -> Option<VoiceEvent> {
    match self.receiver.try_recv() {
      Ok(event) => {
        if matches!(event, VoiceEvent::Recognized(_) | VoiceEvent::Cancelled) {
          self.listening.store(false, Ordering::Release);
        }
        Some(event)
      }
      Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
    }
  }
}
