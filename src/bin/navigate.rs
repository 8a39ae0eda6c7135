// 该文件是 Vizio （视语） 项目的一部分。
// src/bin/navigate.rs - 回放推理输出并进行语音引导
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
  path::PathBuf,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  thread,
  time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use url::Url;

use vizio::{
  FromUrl,
  config::{ConfigStore, JsonFileStore, SharedConfig},
  input::{ChannelRecognizer, ReplaySource},
  model::LabelTable,
  output::{DisplayWrapper, LogHaptic, LogSpeech},
  task::{FeedbackPipeline, NavigationTask, Outputs, VoiceControl},
};

/// Vizio 语音引导参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 录制的推理输出，例如 replay:///data/frames.jsonl
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 运行时配置存储，例如 file:///var/lib/vizio/config.json
  #[arg(long, value_name = "STORE")]
  pub config: Url,
  /// 标签与标定表 (TOML)，缺省使用内置表
  #[arg(long, value_name = "FILE")]
  pub labels: Option<PathBuf>,
  /// 显示文本输出，log:// 或 transcript:///path/to/feedback.log
  #[arg(long, value_name = "DISPLAY", default_value = "log://")]
  pub display: Url,
  /// 推理输入分辨率（方形帧边长）
  #[arg(long, value_name = "PIXELS", default_value = "320")]
  pub frame_dimension: u32,
  /// 送帧间隔（毫秒），0 表示不等待
  #[arg(long, value_name = "MS", default_value = "33")]
  pub frame_interval: u64,

  #[arg(long, value_name = "FRAME_NUMBER")]
  pub frame_number: Option<usize>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("推理输出来源: {}", args.input);
  info!("配置存储: {}", args.config);
  info!("显示输出: {}", args.display);

  let labels = match &args.labels {
    Some(path) => LabelTable::from_path(path)
      .with_context(|| format!("无法加载标签表: {}", path.display()))?,
    None => LabelTable::builtin()?,
  };

  let store = JsonFileStore::from_url(&args.config)?;
  let config = SharedConfig::new(store.load().context("无法加载运行时配置")?);
  info!("运行时配置: {:?}", config.snapshot());

  let input = <ReplaySource>::from_url(&args.input)?;
  let outputs = Outputs {
    speech: LogSpeech::new(),
    haptic: LogHaptic,
    display: DisplayWrapper::from_url(&args.display)?,
  };

  let mut pipeline = FeedbackPipeline::new(labels, args.frame_dimension, config.clone());
  let mut voice = VoiceControl::new(config, store)?;
  let recognizer = ChannelRecognizer::stdin();

  let stop = Arc::new(AtomicBool::new(false));
  let handler_stop = Arc::clone(&stop);
  ctrlc::set_handler(move || {
    info!("收到中断信号，准备退出...");
    handler_stop.store(true, Ordering::Release);
    thread::spawn(|| {
      thread::sleep(Duration::from_secs(30));
      warn!("强制退出程序");
      std::process::exit(1);
    });
  })?;

  let frame_interval =
    (args.frame_interval > 0).then(|| Duration::from_millis(args.frame_interval));
  let summary = NavigationTask::default()
    .with_frame_number(args.frame_number)
    .with_frame_interval(frame_interval)
    .with_stop_signal(stop)
    .run_task(input, &mut pipeline, &mut voice, &recognizer, &outputs)?;

  info!(
    "处理完成: {} 帧 (跳过 {}), {} 个检测, {} 次播报, {} 条命令",
    summary.frames, summary.skipped_frames, summary.detections, summary.utterances, summary.commands
  );

  Ok(())
}
