// time_utils.rs
//
// 提供時間轉換相關的工具函數。
// 匯出檔的時間不帶時區，所有毫秒時間戳皆視為 UTC。

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 匯出檔常見的日期時間格式（依序嘗試）
pub const DATETIME_FORMATS: [&str; 7] = [
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// 只有日期時使用的格式，時間補為午夜
pub const DATE_FORMATS: [&str; 3] = ["%Y.%m.%d", "%Y-%m-%d", "%Y/%m/%d"];

/// 報表中日期的輸出格式
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 解析匯出檔中的時間字串
pub fn parse_export_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// 將 NaiveDateTime 轉換為毫秒時間戳
pub fn datetime_to_timestamp_ms(dt: &NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

/// 將毫秒時間戳轉換為 NaiveDateTime
pub fn timestamp_ms_to_datetime(ts: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ts).map(|dt| dt.naive_utc())
}

/// 格式化報表日期
pub fn format_report_date(dt: &NaiveDateTime) -> String {
    dt.format(REPORT_DATE_FORMAT).to_string()
}
