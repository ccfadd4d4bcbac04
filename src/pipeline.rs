//! 序列正規化與投資組合管線
pub mod error;
pub mod portfolio;
pub mod resampler;
pub mod runner;

pub use error::{PipelineError, PipelineResult};
pub use portfolio::PortfolioAggregator;
pub use resampler::Resampler;
pub use runner::{AccountFailure, AccountSource, PipelineOutcome, PortfolioPipeline, SeriesReport};
