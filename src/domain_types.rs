pub mod aggregation;
pub mod data_point;
pub mod frequency;
pub mod report;
pub mod series;
pub mod types;

pub use aggregation::{AggregationOp, AggregationSpec};
pub use data_point::{CleanedRecord, IntervalRow, RawRecord};
pub use frequency::Frequency;
pub use report::{MetricValue, MetricsReport};
pub use series::{cleaned_records_to_frame, interval_rows_to_frame, IntervalSeries};
pub use types::ColumnName;
