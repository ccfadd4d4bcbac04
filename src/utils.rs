// utils.rs - 公共工具模組

pub mod time_utils;

pub use time_utils::{
    datetime_to_timestamp_ms, format_report_date, parse_export_datetime,
    timestamp_ms_to_datetime,
};
