//! 管線編排：清洗、分桶、合併與指標計算

use std::path::Path;

use tracing::{error, info, warn};

use super::error::{PipelineError, PipelineResult};
use super::portfolio::PortfolioAggregator;
use super::resampler::Resampler;
use crate::config::{MetricsConfig, PipelineConfig};
use crate::data_ingestion::{account_name, ExportReader, IngestResult, RecordCleaner};
use crate::domain_types::{
    cleaned_records_to_frame, AggregationSpec, Frequency, IntervalSeries, MetricsReport, RawRecord,
};
use crate::metrics::{MetricsEngine, PerformanceStats};

/// 一個帳戶的原始記錄
#[derive(Debug, Clone)]
pub struct AccountSource {
    pub name: String,
    pub records: Vec<RawRecord>,
}

impl AccountSource {
    pub fn new(name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

/// 被隔離的帳戶失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFailure {
    pub account: String,
    pub message: String,
}

/// 單一命名序列的結果
#[derive(Debug, Clone)]
pub struct SeriesReport {
    pub name: String,
    pub stats: PerformanceStats,
    pub report: MetricsReport,
}

/// 一次執行的結果：帳戶依名稱排序，投資組合在最後
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    pub reports: Vec<SeriesReport>,
    pub failures: Vec<AccountFailure>,
}

impl PipelineOutcome {
    pub fn get(&self, name: &str) -> Option<&SeriesReport> {
        self.reports.iter().find(|r| r.name == name)
    }
}

struct AccountResult {
    hourly: IntervalSeries,
    report: SeriesReport,
}

/// 投資組合管線
#[derive(Debug, Clone, Default)]
pub struct PortfolioPipeline {
    config: PipelineConfig,
    engine: MetricsEngine,
}

impl PortfolioPipeline {
    pub fn new(config: PipelineConfig, metrics: MetricsConfig) -> Self {
        Self {
            config,
            engine: MetricsEngine::new(metrics),
        }
    }

    /// 清洗並分桶為帳戶的小時序列
    pub fn normalize_account(&self, source: &AccountSource) -> PipelineResult<IntervalSeries> {
        normalize(&source.name, &source.records)
    }

    /// 對已載入的帳戶執行完整管線
    pub fn run(&self, sources: Vec<AccountSource>) -> PipelineResult<PipelineOutcome> {
        let loaded = sources
            .into_iter()
            .map(|source| (source.name, Ok(source.records)))
            .collect();
        self.run_loaded(loaded)
    }

    /// 讀取目錄中所有匯出檔並執行完整管線
    pub fn run_directory<P: AsRef<Path>>(
        &self,
        reader: &ExportReader,
        directory: P,
    ) -> PipelineResult<PipelineOutcome> {
        let directory = directory.as_ref();
        let files = reader.discover(directory).map_err(|source| PipelineError::Ingest {
            account: directory.display().to_string(),
            source,
        })?;

        if files.is_empty() {
            warn!(directory = %directory.display(), "目錄中沒有匯出檔");
        }

        let loaded = files
            .iter()
            .map(|path| (account_name(path), reader.read_file(path)))
            .collect();
        self.run_loaded(loaded)
    }

    fn run_loaded(&self, mut loaded: Vec<(String, IngestResult<Vec<RawRecord>>)>) -> PipelineResult<PipelineOutcome> {
        loaded.sort_by(|a, b| a.0.cmp(&b.0));
        info!(accounts = loaded.len(), fail_fast = self.config.fail_fast, "開始處理帳戶");

        let mut outcome = PipelineOutcome::default();
        let mut hourly = Vec::with_capacity(loaded.len());

        for (name, records) in loaded {
            let result = records
                .map_err(|source| PipelineError::Ingest {
                    account: name.clone(),
                    source,
                })
                .and_then(|records| self.process_account(&name, &records));

            match result {
                Ok(account) => {
                    hourly.push(account.hourly);
                    outcome.reports.push(account.report);
                }
                Err(err) if self.config.fail_fast => return Err(err),
                Err(err) => {
                    error!(account = %name, error = %err, "帳戶處理失敗，已排除於投資組合之外");
                    outcome.failures.push(AccountFailure {
                        account: name,
                        message: err.to_string(),
                    });
                }
            }
        }

        if hourly.is_empty() && !outcome.failures.is_empty() {
            return Err(PipelineError::NoAccounts {
                failed: outcome.failures.len(),
            });
        }

        let portfolio = PortfolioAggregator::aggregate(&self.config.portfolio_name, &hourly)?;
        outcome.reports.push(self.report_daily(&portfolio)?);

        info!(
            reports = outcome.reports.len(),
            failures = outcome.failures.len(),
            "管線執行完成"
        );
        Ok(outcome)
    }

    fn process_account(&self, name: &str, records: &[RawRecord]) -> PipelineResult<AccountResult> {
        let hourly = normalize(name, records)?;
        let report = self.report_daily(&hourly)?;
        Ok(AccountResult { hourly, report })
    }

    fn report_daily(&self, hourly: &IntervalSeries) -> PipelineResult<SeriesReport> {
        let daily = PortfolioAggregator::to_daily(hourly)?;
        let stats = self.engine.compute(&daily).map_err(|source| PipelineError::Metrics {
            series: daily.name().to_string(),
            source,
        })?;

        Ok(SeriesReport {
            name: daily.name().to_string(),
            report: stats.to_report(),
            stats,
        })
    }
}

fn normalize(name: &str, records: &[RawRecord]) -> PipelineResult<IntervalSeries> {
    let cleaned = RecordCleaner::clean(records).map_err(|source| PipelineError::Ingest {
        account: name.to_string(),
        source,
    })?;
    if cleaned.is_empty() {
        return Err(PipelineError::EmptySeries {
            series: name.to_string(),
        });
    }

    let df = cleaned_records_to_frame(&cleaned).map_err(|e| PipelineError::polars(name, e))?;
    Resampler::resample(name, &df, Frequency::Hour, &AggregationSpec::account_hourly())
        .map_err(|e| PipelineError::polars(name, e))
}
