//! 管線錯誤定義

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::data_ingestion::IngestError;
use crate::metrics::MetricsError;

/// 管線錯誤類型，每個變體都標明所屬帳戶或序列
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("帳戶 '{account}' 讀取或清洗失敗: {source}")]
    Ingest {
        account: String,
        #[source]
        source: IngestError,
    },

    #[error("序列 '{series}' 沒有任何數據")]
    EmptySeries { series: String },

    #[error("序列 '{series}' 指標計算失敗: {source}")]
    Metrics {
        series: String,
        #[source]
        source: MetricsError,
    },

    #[error("序列 '{series}' 數據處理錯誤: {source}")]
    Polars {
        series: String,
        #[source]
        source: PolarsError,
    },

    #[error("沒有任何帳戶處理成功（共 {failed} 個失敗）")]
    NoAccounts { failed: usize },
}

impl PipelineError {
    pub fn polars(series: impl Into<String>, source: PolarsError) -> Self {
        PipelineError::Polars {
            series: series.into(),
            source,
        }
    }
}

/// 管線結果類型
pub type PipelineResult<T> = Result<T, PipelineError>;
