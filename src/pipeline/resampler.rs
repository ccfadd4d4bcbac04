// resampler.rs
use polars::prelude::*;
use tracing::debug;

use crate::domain_types::{AggregationSpec, ColumnName, Frequency, IntervalSeries};

/// 提供重採樣核心功能的結構
pub struct Resampler;

impl Resampler {
    /// 對 LazyFrame 進行重採樣
    ///
    /// 區間為左閉、以左端點標記，起點對齊 epoch；沒有數據的區間不會產生。
    pub fn resample_lazy(lf: LazyFrame, frequency: Frequency, spec: &AggregationSpec) -> LazyFrame {
        let window_size = frequency.to_duration();
        let no_group_keys: [Expr; 0] = [];

        lf.sort(
            [ColumnName::DATE],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .group_by_dynamic(
            col(ColumnName::DATE),
            no_group_keys,
            DynamicGroupOptions {
                label: Label::Left,
                start_by: StartBy::WindowBound,
                index_column: ColumnName::DATE.into(),
                every: window_size,
                period: window_size,
                offset: Duration::new(0),
                include_boundaries: false,
                closed_window: ClosedWindow::Left,
                ..Default::default()
            },
        )
        .agg(spec.exprs())
        .filter(col(ColumnName::BALANCE).is_not_null())
    }

    /// 對 DataFrame 進行重採樣
    pub fn resample_df(
        df: &DataFrame,
        frequency: Frequency,
        spec: &AggregationSpec,
    ) -> PolarsResult<DataFrame> {
        // 重用惰性版本，然後立即執行
        Self::resample_lazy(df.clone().lazy(), frequency, spec).collect()
    }

    /// 重採樣並包裝為命名序列
    pub fn resample(
        name: &str,
        df: &DataFrame,
        frequency: Frequency,
        spec: &AggregationSpec,
    ) -> PolarsResult<IntervalSeries> {
        let resampled = Self::resample_df(df, frequency, spec)?;
        debug!(
            series = name,
            frequency = %frequency,
            rows_in = df.height(),
            rows_out = resampled.height(),
            "重採樣完成"
        );
        IntervalSeries::new(name, frequency, resampled)
    }
}
