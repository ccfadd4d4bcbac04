//! 績效指標計算錯誤定義

use thiserror::Error;

/// 指標計算錯誤類型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("序列 '{series}' 沒有任何數據")]
    EmptySeries { series: String },

    /// `zero_division = error` 時，分母為零的指標
    #[error("指標 '{metric}' 的分母為零")]
    DivisionUndefined { metric: &'static str },

    #[error("數據存取錯誤: {0}")]
    Data(String),
}

impl From<polars::prelude::PolarsError> for MetricsError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        MetricsError::Data(err.to_string())
    }
}

/// 指標計算結果類型
pub type MetricsResult<T> = Result<T, MetricsError>;
