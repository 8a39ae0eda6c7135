// 该文件是 Vizio （视语） 项目的一部分。
// src/bin/command.rs - 对持久化配置执行语音命令
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

use anyhow::Result;
use clap::Parser;
use tracing::info;
use url::Url;

use vizio::{
  FromUrl,
  command::{CommandInterpreter, Outcome},
  config::{ConfigStore, JsonFileStore, SharedConfig},
};

/// 将识别文本作为语音命令应用到配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 运行时配置存储，例如 file:///var/lib/vizio/config.json
  #[arg(long, value_name = "STORE")]
  pub config: Url,
  /// 只解析，不修改也不保存配置
  #[arg(long)]
  pub dry_run: bool,
  /// 识别文本，按顺序逐条执行
  #[arg(required = true, value_name = "UTTERANCE")]
  pub utterances: Vec<String>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();
  info!("配置存储: {}", args.config);

  let store = JsonFileStore::from_url(&args.config)?;
  let config = SharedConfig::new(store.load()?);
  let interpreter = CommandInterpreter::new()?;

  for utterance in &args.utterances {
    let outcome = if args.dry_run {
      interpreter.parse(utterance)
    } else {
      interpreter.interpret(utterance, &config)
    };

    if !args.dry_run && matches!(outcome, Outcome::Applied(_)) {
      store.save(&config.snapshot())?;
    }

    println!("\"{}\" => {:?}", utterance, outcome);
    println!("  回复: {}", outcome.prompt());
  }

  println!();
  println!("{}", serde_json::to_string_pretty(&*config.snapshot())?);

  Ok(())
}
