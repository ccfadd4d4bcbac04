//! 區間時間序列
//!
//! 包裝 Polars DataFrame，`date` 欄位為區間起點的毫秒時間戳。

use polars::prelude::*;

use super::data_point::{CleanedRecord, IntervalRow};
use super::frequency::Frequency;
use super::types::ColumnName;
use crate::utils::time_utils::{datetime_to_timestamp_ms, timestamp_ms_to_datetime};

/// 已分桶的命名序列（單一帳戶或投資組合）
#[derive(Debug, Clone)]
pub struct IntervalSeries {
    name: String,
    frequency: Frequency,
    df: DataFrame,
}

impl IntervalSeries {
    /// 創建新的區間序列，驗證必要欄位
    pub fn new(name: impl Into<String>, frequency: Frequency, df: DataFrame) -> PolarsResult<Self> {
        for column in ColumnName::DAILY_COLUMNS {
            if !df.schema().contains(column) {
                return Err(PolarsError::ColumnNotFound(
                    format!("IntervalSeries 缺少欄位 '{}'", column).into(),
                ));
            }
        }

        Ok(Self {
            name: name.into(),
            frequency,
            df,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn has_equity(&self) -> bool {
        self.df.schema().contains(ColumnName::EQUITY)
    }

    pub fn timestamps_ms(&self) -> PolarsResult<Vec<i64>> {
        let dates = self.df.column(ColumnName::DATE)?.as_materialized_series().cast(&DataType::Int64)?;
        Ok(dates.i64()?.into_iter().map(|v| v.unwrap_or_default()).collect())
    }

    pub fn balances(&self) -> PolarsResult<Vec<f64>> {
        float_values(&self.df, ColumnName::BALANCE)
    }

    pub fn deposit_loads(&self) -> PolarsResult<Vec<f64>> {
        float_values(&self.df, ColumnName::DEPOSIT_LOAD)
    }

    pub fn profits(&self) -> PolarsResult<Vec<f64>> {
        float_values(&self.df, ColumnName::PROFIT)
    }

    pub fn drawdowns(&self) -> PolarsResult<Vec<f64>> {
        float_values(&self.df, ColumnName::DRAWDOWN)
    }

    /// 日線序列沒有 equity 欄位時回傳 `None`
    pub fn equities(&self) -> PolarsResult<Option<Vec<Option<f64>>>> {
        if !self.has_equity() {
            return Ok(None);
        }
        optional_float_values(&self.df, ColumnName::EQUITY).map(Some)
    }

    /// 以有序列的形式取出所有數據，位置索引即時間順序
    pub fn rows(&self) -> PolarsResult<Vec<IntervalRow>> {
        let dates = self.timestamps_ms()?;
        let balances = self.balances()?;
        let deposit_loads = self.deposit_loads()?;
        let profits = self.profits()?;
        let drawdowns = self.drawdowns()?;
        let equities = self.equities()?;

        dates
            .iter()
            .enumerate()
            .map(|(i, &ts)| {
                let date = timestamp_ms_to_datetime(ts).ok_or_else(|| {
                    PolarsError::ComputeError(format!("無效的時間戳: {}", ts).into())
                })?;
                Ok(IntervalRow {
                    date,
                    balance: balances[i],
                    equity: equities.as_ref().and_then(|values| values[i]),
                    deposit_load: deposit_loads[i],
                    profit: profits[i],
                    drawdown: drawdowns[i],
                })
            })
            .collect()
    }
}

/// 將清洗後的記錄轉為 DataFrame（尚未分桶）
pub fn cleaned_records_to_frame(records: &[CleanedRecord]) -> PolarsResult<DataFrame> {
    let dates: Vec<i64> = records
        .iter()
        .map(|r| datetime_to_timestamp_ms(&r.timestamp))
        .collect();
    let balances: Vec<f64> = records.iter().map(|r| r.balance).collect();
    let equities: Vec<Option<f64>> = records.iter().map(|r| r.equity).collect();
    let deposit_loads: Vec<f64> = records.iter().map(|r| r.deposit_load).collect();
    let profits: Vec<f64> = records.iter().map(|r| r.profit).collect();
    let drawdowns: Vec<f64> = records.iter().map(|r| r.drawdown).collect();

    DataFrame::new(vec![
        Column::new(ColumnName::DATE.into(), dates),
        Column::new(ColumnName::BALANCE.into(), balances),
        Column::new(ColumnName::EQUITY.into(), equities),
        Column::new(ColumnName::DEPOSIT_LOAD.into(), deposit_loads),
        Column::new(ColumnName::PROFIT.into(), profits),
        Column::new(ColumnName::DRAWDOWN.into(), drawdowns),
    ])
}

/// 將列數據轉為 DataFrame；`with_equity` 為 false 時不建立 equity 欄位
pub fn interval_rows_to_frame(rows: &[IntervalRow], with_equity: bool) -> PolarsResult<DataFrame> {
    let dates: Vec<i64> = rows.iter().map(|r| datetime_to_timestamp_ms(&r.date)).collect();
    let balances: Vec<f64> = rows.iter().map(|r| r.balance).collect();
    let deposit_loads: Vec<f64> = rows.iter().map(|r| r.deposit_load).collect();
    let profits: Vec<f64> = rows.iter().map(|r| r.profit).collect();
    let drawdowns: Vec<f64> = rows.iter().map(|r| r.drawdown).collect();

    let mut columns = vec![
        Column::new(ColumnName::DATE.into(), dates),
        Column::new(ColumnName::BALANCE.into(), balances),
    ];
    if with_equity {
        let equities: Vec<Option<f64>> = rows.iter().map(|r| r.equity).collect();
        columns.push(Column::new(ColumnName::EQUITY.into(), equities));
    }
    columns.push(Column::new(ColumnName::DEPOSIT_LOAD.into(), deposit_loads));
    columns.push(Column::new(ColumnName::PROFIT.into(), profits));
    columns.push(Column::new(ColumnName::DRAWDOWN.into(), drawdowns));

    DataFrame::new(columns)
}

pub(crate) fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    Ok(optional_float_values(df, name)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

pub(crate) fn optional_float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}
