use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::config::types::ApplicationConfig;
use crate::config::validation::{ValidationError, Validator};

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        env::var("PORTFOLIO_ENV")
            .map(|value| Self::parse(&value))
            .unwrap_or(Environment::Development)
    }

    /// 解析環境名稱，無法辨識時視為開發環境
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置載入錯誤
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("配置讀取失敗: {0}")]
    Source(#[from] ConfigError),

    #[error("配置驗證失敗: {0}")]
    Invalid(#[from] ValidationError),
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 載入指定環境的配置來源
    ///
    /// 配置文件可以不存在，此時只使用預設值與環境變數。
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load_from_dir(&config_dir, env)
    }

    pub fn load_from_dir<P: AsRef<Path>>(config_dir: P, env: Environment) -> Result<Config, ConfigError> {
        let config_path = config_dir.as_ref().join(env.as_filename());
        debug!(path = %config_path.display(), "載入配置文件");

        Config::builder()
            .add_source(File::from(config_path).required(false))
            // 環境變數優先級高於文件配置
            .add_source(
                ConfigEnvironment::with_prefix("PORTFOLIO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }
}

impl ApplicationConfig {
    /// 從環境變數指定的環境加載配置
    pub fn load_from_env() -> Result<Self, ConfigLoadError> {
        Self::load(Environment::from_env())
    }

    /// 從指定環境加載並驗證配置
    pub fn load(env: Environment) -> Result<Self, ConfigLoadError> {
        Self::from_source(ConfigLoader::load(env)?)
    }

    pub fn from_source(source: Config) -> Result<Self, ConfigLoadError> {
        let app_config: ApplicationConfig = source.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }
}
