//! 跨帳戶的投資組合合併

use polars::prelude::*;
use tracing::{debug, info};

use super::error::{PipelineError, PipelineResult};
use super::resampler::Resampler;
use crate::domain_types::series::float_values;
use crate::domain_types::{AggregationSpec, ColumnName, Frequency, IntervalSeries};

/// 投資組合聚合器
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    /// 將所有帳戶的小時序列合併為一條投資組合小時序列
    ///
    /// 平均後的餘額不能直接使用：帳戶在不同時段出現會造成跳動，
    /// 因此以加總損益重建連續的餘額。
    pub fn aggregate(name: &str, accounts: &[IntervalSeries]) -> PipelineResult<IntervalSeries> {
        if accounts.is_empty() {
            return Err(PipelineError::EmptySeries {
                series: name.to_string(),
            });
        }

        let frames: Vec<LazyFrame> = accounts
            .iter()
            .map(|series| series.frame().clone().lazy().select(hourly_columns()))
            .collect();

        let combined = concat(frames, UnionArgs::default())
            .and_then(|lf| {
                Resampler::resample_lazy(lf, Frequency::Hour, &AggregationSpec::portfolio_hourly()).collect()
            })
            .map_err(|e| PipelineError::polars(name, e))?;

        let mut df = reconstruct_balance(combined).map_err(|e| PipelineError::polars(name, e))?;
        df = df
            .lazy()
            .filter(col(ColumnName::EQUITY).is_not_null())
            .collect()
            .map_err(|e| PipelineError::polars(name, e))?;

        info!(
            portfolio = name,
            accounts = accounts.len(),
            rows = df.height(),
            "投資組合小時序列合併完成"
        );
        IntervalSeries::new(name, Frequency::Hour, df).map_err(|e| PipelineError::polars(name, e))
    }

    /// 將任一序列轉為日線，丟棄 equity
    pub fn to_daily(series: &IntervalSeries) -> PipelineResult<IntervalSeries> {
        Resampler::resample(
            series.name(),
            series.frame(),
            Frequency::Day,
            &AggregationSpec::final_daily(),
        )
        .map_err(|e| PipelineError::polars(series.name(), e))
    }
}

fn hourly_columns() -> [Expr; 6] {
    [
        col(ColumnName::DATE),
        col(ColumnName::BALANCE),
        col(ColumnName::EQUITY),
        col(ColumnName::DEPOSIT_LOAD),
        col(ColumnName::PROFIT),
        col(ColumnName::DRAWDOWN),
    ]
}

/// 由左至右重建餘額：損益為零時沿用上一列，否則累加損益
fn reconstruct_balance(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let averaged = float_values(&df, ColumnName::BALANCE)?;
    let profits = float_values(&df, ColumnName::PROFIT)?;

    let mut balances = Vec::with_capacity(averaged.len());
    for (i, (&mean_balance, &profit)) in averaged.iter().zip(&profits).enumerate() {
        let balance = match balances.last() {
            None => mean_balance,
            Some(&previous) if profit == 0.0 => previous,
            Some(&previous) => previous + profit,
        };
        if i > 0 && balance != mean_balance {
            debug!(row = i, averaged = mean_balance, reconstructed = balance, "重建餘額");
        }
        balances.push(balance);
    }

    df.with_column(Column::new(ColumnName::BALANCE.into(), balances))?;
    Ok(df)
}
