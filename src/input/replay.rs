// 该文件是 Vizio （视语） 项目的一部分。
// src/input/replay.rs - 回放录制的推理输出
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
  fs::File,
  io::{BufRead, BufReader, Lines},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, input::InferenceFrame, model::InferenceOutput, url_path};

#[derive(Error, Debug)]
pub enum ReplayError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("路径解码失败: {0}")]
  PathError(#[from] std::string::FromUtf8Error),
  #[error("第 {line} 行解析失败: {source}")]
  ParseError {
    line: usize,
    source: serde_json::Error,
  },
}

#[derive(Debug, Deserialize)]
struct ReplayRecord {
  #[serde(flatten)]
  output: InferenceOutput,
  width: Option<u32>,
  height: Option<u32>,
}

/// JSON Lines 格式的推理输出回放，每行一帧：
///
/// ```json
/// {"scores":[0.95],"boxes":[0.1,0.2,0.3,0.6],"classes":[3],"count":1,"width":320,"height":320}
/// ```
pub struct ReplaySource<R = BufReader<File>> {
  lines: Lines<R>,
  line: usize,
  index: u64,
}

impl FromUrlWithScheme for ReplaySource {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplaySource {
  type Error = ReplayError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ReplayError::SchemeMismatch(url.scheme().to_string()));
    }

    let path = url_path(url)?;
    info!("打开回放文件: {}", path.display());
    let file = File::open(&path)?;
    Ok(Self::from_reader(BufReader::new(file)))
  }
}

impl<R: BufRead> ReplaySource<R> {
  pub fn from_reader(reader: R) -> Self {
    Self {
      lines: reader.lines(),
      line: 0,
      index: 0,
    }
  }
}

impl<R: BufRead> Iterator for ReplaySource<R> {
  type Item = Result<InferenceFrame, ReplayError>;

  fn next(&mut self) -> Option<Self::Item> {
    for raw in self.lines.by_ref() {
      self.line += 1;
      let raw = match raw {
        Ok(raw) => raw,
        Err(e) => return Some(Err(e.into())),
      };
      if raw.trim().is_empty() {
        continue;
      }

      let record: ReplayRecord = match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(source) => {
          return Some(Err(ReplayError::ParseError {
            line: self.line,
            source,
          }));
        }
      };

      let frame = InferenceFrame {
        index: self.index,
        output: record.output,
        width: record.width,
        height: record.height,
      };
      self.index += 1;
      return Some(Ok(frame));
    }
    None
  }
}
