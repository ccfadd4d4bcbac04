use serde::{Deserialize, Serialize};

use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub input: InputConfig,
    pub pipeline: PipelineConfig,
    pub metrics: MetricsConfig,
    pub log: LogConfig,
    pub output: OutputConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.input.validate()?;
        self.pipeline.validate()?;
        self.metrics.validate()?;
        self.log.validate()?;
        self.output.validate()?;

        Ok(())
    }
}

/// 匯出檔輸入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub directory: String,
    pub extension: String,
    pub delimiter: String,
    pub header_rows: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: "Historicos".to_string(),
            extension: "csv".to_string(),
            delimiter: "\t".to_string(),
            header_rows: 1,
        }
    }
}

impl InputConfig {
    /// 分隔符的單一位元組形式
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Some(*byte),
            _ => None,
        }
    }
}

impl Validator for InputConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.directory, "input.directory")?;
        ValidationUtils::not_empty(&self.extension, "input.extension")?;
        if self.delimiter_byte().is_none() {
            return Err(ValidationError::InvalidValue(format!(
                "input.delimiter 必須是單一 ASCII 字元: {:?}",
                self.delimiter
            )));
        }
        ValidationUtils::in_range(self.header_rows, 0, 100, "input.header_rows")?;

        Ok(())
    }
}

/// 管線配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 任一帳戶失敗即中止整個執行
    pub fail_fast: bool,
    pub portfolio_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fail_fast: true,
            portfolio_name: "Portfolio".to_string(),
        }
    }
}

impl Validator for PipelineConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.portfolio_name, "pipeline.portfolio_name")
    }
}

/// 分母為零時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDivisionPolicy {
    /// 依 IEEE 規則產生 inf 或 NaN
    #[default]
    Infinity,
    /// 回傳 `DivisionUndefined` 錯誤
    Error,
}

/// 指標計算配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub trading_days_per_month: u32,
    pub zero_division: ZeroDivisionPolicy,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            trading_days_per_month: 21,
            zero_division: ZeroDivisionPolicy::Infinity,
        }
    }
}

impl Validator for MetricsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::in_range(self.trading_days_per_month, 1, 31, "metrics.trading_days_per_month")
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase().as_str(),
            &["trace", "debug", "info", "warn", "error"],
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(&self.format.to_lowercase().as_str(), &["pretty", "json"], "log.format")?;

        Ok(())
    }
}

/// 報表輸出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

impl Validator for OutputConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::one_of(&self.format.to_lowercase().as_str(), &["text", "json"], "output.format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input.directory, "Historicos");
        assert_eq!(config.input.delimiter_byte(), Some(b'\t'));
        assert!(config.pipeline.fail_fast);
        assert_eq!(config.metrics.trading_days_per_month, 21);
        assert_eq!(config.metrics.zero_division, ZeroDivisionPolicy::Infinity);
    }

    #[test]
    fn test_invalid_sections_are_rejected() {
        let mut config = ApplicationConfig::default();
        config.log.level = "verbose".to_string();
        assert_matches!(config.validate(), Err(ValidationError::InvalidValue(_)));

        let mut config = ApplicationConfig::default();
        config.input.delimiter = "::".to_string();
        assert_matches!(config.validate(), Err(ValidationError::InvalidValue(_)));

        let mut config = ApplicationConfig::default();
        config.metrics.trading_days_per_month = 0;
        assert_matches!(config.validate(), Err(ValidationError::RangeError { .. }));
    }

    #[test]
    fn test_zero_division_policy_is_lowercase() {
        let policy: ZeroDivisionPolicy = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(policy, ZeroDivisionPolicy::Error);
    }
}
