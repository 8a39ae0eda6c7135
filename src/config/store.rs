// 该文件是 Vizio （视语） 项目的一部分。
// src/config/store.rs - 运行时配置持久化
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

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, config::RuntimeConfiguration, url_path};

pub trait ConfigStore {
  type Error;
  fn load(&self) -> Result<RuntimeConfiguration, Self::Error>;
  fn save(&self, config: &RuntimeConfiguration) -> Result<(), Self::Error>;
}

#[derive(Error, Debug)]
pub enum ConfigStoreError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("路径解码失败: {0}")]
  PathError(#[from] std::string::FromUtf8Error),
}

/// 以 JSON 文件保存的配置，`file:///path/to/vizio.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: PathBuf,
}

impl FromUrlWithScheme for JsonFileStore {
  const SCHEME: &'static str = "file";
}

impl FromUrl for JsonFileStore {
  type Error = ConfigStoreError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(ConfigStoreError::SchemeMismatch(format!(
        "期望 '{}', 实际 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }
    Ok(Self::new(url_path(uri)?))
  }
}

impl JsonFileStore {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl ConfigStore for JsonFileStore {
  type Error = ConfigStoreError;

  /// 文件不存在时返回默认配置；内容违反约束时记录警告并整体回退到默认值
  fn load(&self) -> Result<RuntimeConfiguration, Self::Error> {
    if !self.path.exists() {
      info!("配置文件不存在，使用默认配置: {}", self.path.display());
      return Ok(RuntimeConfiguration::default());
    }

    let raw = std::fs::read_to_string(&self.path)?;
    let config: RuntimeConfiguration = serde_json::from_str(&raw)?;
    if let Err(e) = config.validate() {
      warn!("配置文件 {} 无效 ({})，使用默认配置", self.path.display(), e);
      return Ok(RuntimeConfiguration::default());
    }

    debug!("已加载配置: {:?}", config);
    Ok(config)
  }

  fn save(&self, config: &RuntimeConfiguration) -> Result<(), Self::Error> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let raw = serde_json::to_string_pretty(config)?;
    std::fs::write(&self.path, raw)?;
    debug!("配置已保存: {}", self.path.display());
    Ok(())
  }
}
