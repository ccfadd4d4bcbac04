// 模組定義
pub mod config;
pub mod data_ingestion;
pub mod domain_types;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod utils;
