// 该文件是 Vizio （视语） 项目的一部分。
// tests/config_store.rs - JSON 配置存储测试
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

use url::Url;

use vizio::{
  FromUrl,
  command::{CommandInterpreter, Outcome},
  config::{ConfigStore, ConfigStoreError, JsonFileStore, RuntimeConfiguration, SharedConfig},
  feedback::MeasurementUnit,
};

#[test]
fn missing_file_loads_defaults() {
  let dir = tempfile::tempdir().unwrap();
  let store = JsonFileStore::new(dir.path().join("absent.json"));
  assert_eq!(store.load().unwrap(), RuntimeConfiguration::default());
}

#[test]
fn saved_configuration_survives_reload() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("state").join("vizio.json");
  let url = Url::from_file_path(&path).unwrap();
  let store = JsonFileStore::from_url(&url).unwrap();

  let config = RuntimeConfiguration {
    score_threshold: 0.75,
    distance_scale: 1.5,
    debounce_interval_ms: 3000,
    measurement_unit: MeasurementUnit::Metres,
    proximity_warning_enabled: false,
  };
  store.save(&config).unwrap();

  let reopened = JsonFileStore::new(&path);
  assert_eq!(reopened.load().unwrap(), config);
}

#[test]
fn percent_encoded_url_names_the_decoded_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("my cfg.json");
  let url = Url::from_file_path(&path).unwrap();
  assert!(url.as_str().ends_with("my%20cfg.json"));

  let store = JsonFileStore::from_url(&url).unwrap();
  assert_eq!(store.path(), path);
  store.save(&RuntimeConfiguration::default()).unwrap();
  assert!(path.exists());
}

#[test]
fn partial_file_fills_in_defaults() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("vizio.json");
  std::fs::write(&path, r#"{"measurement_unit":"feet"}"#).unwrap();

  let config = JsonFileStore::new(&path).load().unwrap();
  assert_eq!(config.measurement_unit, MeasurementUnit::Feet);
  assert_eq!(config.debounce_interval_ms, 1000);
  assert_eq!(config.score_threshold, 0.90);
}

#[test]
fn out_of_range_values_fall_back_to_defaults() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("vizio.json");
  std::fs::write(&path, r#"{"distance_scale":9.0,"measurement_unit":"feet"}"#).unwrap();

  let config = JsonFileStore::new(&path).load().unwrap();
  assert_eq!(config, RuntimeConfiguration::default());
}

#[test]
fn malformed_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("vizio.json");
  std::fs::write(&path, "{ not json").unwrap();

  assert!(matches!(
    JsonFileStore::new(&path).load(),
    Err(ConfigStoreError::JsonError(_))
  ));
}

#[test]
fn rejects_other_schemes() {
  let url = Url::parse("replay:///tmp/vizio.json").unwrap();
  assert!(matches!(
    JsonFileStore::from_url(&url),
    Err(ConfigStoreError::SchemeMismatch(_))
  ));
}

#[test]
fn interpreted_commands_persist() {
  let dir = tempfile::tempdir().unwrap();
  let store = JsonFileStore::new(dir.path().join("vizio.json"));
  let config = SharedConfig::new(store.load().unwrap());
  let interpreter = CommandInterpreter::new().unwrap();

  for utterance in ["set a debounce time to 5 seconds", "distance to 1.25", "distance to 6"] {
    if let Outcome::Applied(_) = interpreter.interpret(utterance, &config) {
      store.save(&config.snapshot()).unwrap();
    }
  }

  let reloaded = store.load().unwrap();
  assert_eq!(reloaded.debounce_interval_ms, 5000);
  assert_eq!(reloaded.distance_scale, 1.25);
}
