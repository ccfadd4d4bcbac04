//! 績效與風險指標
pub mod drawdown;
pub mod engine;
pub mod error;
pub mod streak;

pub use drawdown::{cumulative_max, max_balance_reduction, BalanceReduction};
pub use engine::{DayExtreme, MetricsEngine, PerformanceStats, ReductionSummary, StreakSummary};
pub use error::{MetricsError, MetricsResult};
pub use streak::{longest_run, run_lengths, Run};
