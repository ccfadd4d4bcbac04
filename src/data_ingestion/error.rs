//! 匯出檔讀取與清洗錯誤定義

use thiserror::Error;

/// 讀取與清洗錯誤類型
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("檔案讀取錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("檔案解碼錯誤: {0}")]
    Decode(String),

    #[error("CSV 解析錯誤: {0}")]
    Csv(#[from] csv::Error),

    /// 第 `row` 列（從 1 起算）的欄位無法解析
    #[error("解析錯誤: 第 {row} 列, 欄位 {field}, 值 '{value}', 原因: {reason}")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl IngestError {
    pub fn parse(row: usize, field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            row,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// 讀取與清洗結果類型
pub type IngestResult<T> = Result<T, IngestError>;
