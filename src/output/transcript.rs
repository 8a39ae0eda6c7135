// 该文件是 Vizio （视语） 项目的一部分。
// src/output/transcript.rs - 显示文本记录
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
  convert::Infallible,
  fs::{File, OpenOptions},
  io::Write,
  path::{Path, PathBuf},
  sync::Mutex,
};

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, output::Display, url_path};

#[derive(Error, Debug)]
pub enum TranscriptError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("路径解码失败: {0}")]
  PathError(#[from] std::string::FromUtf8Error),
}

/// 直接写入日志的显示输出，`log://`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl LogDisplay {
  pub const SCHEME: &'static str = "log";
}

impl Display for LogDisplay {
  type Error = Infallible;

  fn show(&self, text: &str) -> Result<(), Self::Error> {
    info!("{}", text);
    Ok(())
  }
}

/// 以追加方式写入带时间戳的文本记录，`transcript:///path/to/feedback.log`
pub struct TranscriptDisplay {
  path: PathBuf,
  file: Mutex<File>,
}

impl FromUrlWithScheme for TranscriptDisplay {
  const SCHEME: &'static str = "transcript";
}

impl FromUrl for TranscriptDisplay {
  type Error = TranscriptError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(TranscriptError::SchemeMismatch);
    }
    Self::open(url_path(uri)?)
  }
}

impl TranscriptDisplay {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, TranscriptError> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    info!("文本记录输出到: {}", path.display());
    Ok(Self {
      path,
      file: Mutex::new(file),
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl Display for TranscriptDisplay {
  type Error = TranscriptError;

  fn show(&self, text: &str) -> Result<(), Self::Error> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut file = match self.file.lock() {
      Ok(file) => file,
      Err(poisoned) => {
        warn!("文本记录锁已中毒，继续写入");
        poisoned.into_inner()
      }
    };
    writeln!(file, "{} {}", timestamp, text)?;
    Ok(())
  }
}
