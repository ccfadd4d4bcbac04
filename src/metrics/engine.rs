//! 績效指標引擎
//!
//! 對任何一條日線序列計算固定順序的績效與風險指標。

use chrono::NaiveDateTime;
use tracing::debug;

use super::drawdown::{below_high_water, max_balance_reduction};
use super::error::{MetricsError, MetricsResult};
use super::streak::longest_run;
use crate::config::{MetricsConfig, ZeroDivisionPolicy};
use crate::domain_types::{IntervalRow, IntervalSeries, MetricValue, MetricsReport};
use crate::utils::format_report_date;

/// 報表中缺少日期時的顯示值
pub const MISSING: &str = "-";

/// 金額與其發生日期
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayExtreme {
    pub amount: f64,
    pub date: NaiveDateTime,
}

/// 最長區段的天數與起迄日期；沒有符合的列時日期為 `None`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreakSummary {
    pub days: usize,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// 最大餘額回落及其日期
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionSummary {
    pub amount: f64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub recovery: Option<NaiveDateTime>,
}

/// 一條序列的績效統計
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceStats {
    pub total_return: f64,
    pub daily_volatility: f64,
    pub average_daily_profit: f64,
    pub average_monthly_return: f64,
    pub win_loss_ratio: f64,
    pub expectancy: f64,
    pub average_take_profit: f64,
    pub average_stop_loss: f64,
    pub max_drawdown: f64,
    pub max_balance_reduction: ReductionSummary,
    pub worst_day: DayExtreme,
    pub best_day: DayExtreme,
    pub longest_winning_streak: StreakSummary,
    pub longest_without_new_high: StreakSummary,
}

impl PerformanceStats {
    /// 轉為依固定順序排列的報表
    pub fn to_report(&self) -> MetricsReport {
        let mut report = MetricsReport::new();
        report.push("Total Return", amount(self.total_return));
        report.push("Daily Volatility", amount(self.daily_volatility));
        report.push("Average Daily Profit", amount(self.average_daily_profit));
        report.push("Average Monthly Return", amount(self.average_monthly_return));
        report.push("Win/Loss Ratio", amount(self.win_loss_ratio));
        report.push("Mathematical Expectancy", amount(self.expectancy));
        report.push("Average Take Profit", amount(self.average_take_profit));
        report.push("Average Stop Loss", amount(self.average_stop_loss));
        report.push("Max Drawdown", amount(self.max_drawdown));

        let reduction = &self.max_balance_reduction;
        report.push("Max Balance Reduction", amount(reduction.amount));
        report.push(
            "Max Balance Reduction Dates",
            MetricValue::map([
                ("Start", format_report_date(&reduction.start)),
                ("End", format_report_date(&reduction.end)),
                ("Recovery", optional_date(reduction.recovery)),
            ]),
        );

        report.push("Worst Day", day_extreme(&self.worst_day));
        report.push("Best Day", day_extreme(&self.best_day));
        report.push("Longest Winning Streak", streak(&self.longest_winning_streak));
        report.push("Longest Time Without New High", streak(&self.longest_without_new_high));
        report
    }
}

fn amount(value: f64) -> MetricValue {
    MetricValue::scalar(format!("{:.2}", value))
}

fn optional_date(date: Option<NaiveDateTime>) -> String {
    date.as_ref().map_or_else(|| MISSING.to_string(), format_report_date)
}

fn day_extreme(day: &DayExtreme) -> MetricValue {
    MetricValue::map([
        ("Amount", format!("{:.2}", day.amount)),
        ("Date", format_report_date(&day.date)),
    ])
}

fn streak(summary: &StreakSummary) -> MetricValue {
    MetricValue::map([
        ("Days", summary.days.to_string()),
        ("Start", optional_date(summary.start)),
        ("End", optional_date(summary.end)),
    ])
}

/// 指標計算引擎
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// 計算序列的績效統計
    pub fn compute(&self, series: &IntervalSeries) -> MetricsResult<PerformanceStats> {
        let rows = series.rows()?;
        self.compute_rows(series.name(), &rows)
    }

    /// 計算並格式化為報表
    pub fn report(&self, series: &IntervalSeries) -> MetricsResult<MetricsReport> {
        self.compute(series).map(|stats| stats.to_report())
    }

    /// 對依時間排序的日線列計算績效統計
    pub fn compute_rows(&self, name: &str, rows: &[IntervalRow]) -> MetricsResult<PerformanceStats> {
        let (first, last) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(MetricsError::EmptySeries {
                    series: name.to_string(),
                })
            }
        };

        let profits: Vec<f64> = rows.iter().map(|r| r.profit).collect();
        let balances: Vec<f64> = rows.iter().map(|r| r.balance).collect();
        let gains: Vec<f64> = profits.iter().copied().filter(|&p| p > 0.0).collect();
        let losses: Vec<f64> = profits.iter().copied().filter(|&p| p < 0.0).collect();

        let returns = Self::daily_returns(rows);
        debug!(
            series = name,
            days = rows.len(),
            returns = returns.len(),
            mean_return = mean(&returns),
            "日報酬計算完成"
        );

        let average_daily_profit = mean(&profits);
        let win_loss_ratio = self.divide("Win/Loss Ratio", gains.len() as f64, losses.len() as f64)?;
        let average_take_profit = self.subset_mean("Average Take Profit", &gains)?;
        let average_stop_loss = self.subset_mean("Average Stop Loss", &losses)?;

        let expectancy = (subset_contribution(&gains) + subset_contribution(&losses)) / rows.len() as f64;

        let max_drawdown = rows
            .iter()
            .map(|r| r.drawdown)
            .fold(f64::NEG_INFINITY, f64::max);

        let reduction = max_balance_reduction(&balances).ok_or_else(|| MetricsError::EmptySeries {
            series: name.to_string(),
        })?;
        let max_balance_reduction = ReductionSummary {
            amount: reduction.amount,
            start: rows[reduction.start].date,
            end: rows[reduction.end].date,
            recovery: reduction.recovery.map(|i| rows[i].date),
        };

        let winning: Vec<bool> = profits.iter().map(|&p| p > 0.0).collect();

        Ok(PerformanceStats {
            total_return: last.balance - first.balance,
            daily_volatility: std_dev(&profits),
            average_daily_profit,
            average_monthly_return: average_daily_profit * self.config.trading_days_per_month as f64,
            win_loss_ratio,
            expectancy,
            average_take_profit,
            average_stop_loss,
            max_drawdown,
            max_balance_reduction,
            worst_day: extreme(rows, |candidate, current| candidate < current),
            best_day: extreme(rows, |candidate, current| candidate > current),
            longest_winning_streak: summarize_streak(rows, &winning),
            longest_without_new_high: summarize_streak(rows, &below_high_water(&balances)),
        })
    }

    /// 日報酬 `profit[i] / balance[i-1]`，前一日餘額為零或無效的列略過
    pub fn daily_returns(rows: &[IntervalRow]) -> Vec<f64> {
        rows.windows(2)
            .filter_map(|pair| {
                let previous = pair[0].balance;
                (previous != 0.0 && previous.is_finite()).then(|| pair[1].profit / previous)
            })
            .collect()
    }

    fn divide(&self, metric: &'static str, numerator: f64, denominator: f64) -> MetricsResult<f64> {
        if denominator == 0.0 && self.config.zero_division == ZeroDivisionPolicy::Error {
            return Err(MetricsError::DivisionUndefined { metric });
        }
        Ok(numerator / denominator)
    }

    fn subset_mean(&self, metric: &'static str, values: &[f64]) -> MetricsResult<f64> {
        self.divide(metric, values.iter().sum(), values.len() as f64)
    }
}

/// 子集的 `mean · count`；空子集貢獻 0
fn subset_contribution(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        mean(values) * values.len() as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    use statrs::statistics::Statistics;
    values.iter().mean()
}

/// 樣本標準差（ddof = 1）
fn std_dev(values: &[f64]) -> f64 {
    use statrs::statistics::Statistics;
    values.iter().std_dev()
}

/// 依比較函數取極值，相同時保留最早的一列
fn extreme(rows: &[IntervalRow], better: impl Fn(f64, f64) -> bool) -> DayExtreme {
    let mut chosen = &rows[0];
    for row in &rows[1..] {
        if better(row.profit, chosen.profit) {
            chosen = row;
        }
    }
    DayExtreme {
        amount: chosen.profit,
        date: chosen.date,
    }
}

fn summarize_streak(rows: &[IntervalRow], flags: &[bool]) -> StreakSummary {
    match longest_run(flags) {
        Some(run) => StreakSummary {
            days: run.len,
            start: Some(rows[run.start].date),
            end: Some(rows[run.end].date),
        },
        None => StreakSummary::default(),
    }
}
