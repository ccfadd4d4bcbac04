#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use portfolio_metrics::domain_types::{interval_rows_to_frame, Frequency, IntervalRow, IntervalSeries, MetricsReport, RawRecord};

pub const HEADER: &str = "<DATE>\t<BALANCE>\t<EQUITY>\t<DEPOSIT LOAD>";

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

/// 每天一筆、equity 等於 balance 的原始記錄
pub fn daily_records(balances: &[f64]) -> Vec<RawRecord> {
    balances
        .iter()
        .enumerate()
        .map(|(i, &balance)| {
            let ts = base_time() + Duration::days(i as i64);
            RawRecord::new(&ts.format("%Y.%m.%d %H:%M").to_string(), balance, balance, 0.0)
        })
        .collect()
}

/// 依給定的損益序列建立日線序列（期初餘額 `opening`）
pub fn daily_series(name: &str, profits: &[f64], opening: f64) -> IntervalSeries {
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut balance = opening;
    let rows: Vec<IntervalRow> = profits
        .iter()
        .enumerate()
        .map(|(i, &profit)| {
            balance += profit;
            IntervalRow {
                date: origin + Duration::days(i as i64),
                balance,
                equity: None,
                deposit_load: 0.0,
                profit,
                drawdown: profit.min(0.0).abs(),
            }
        })
        .collect();
    series_from_rows(name, Frequency::Day, &rows)
}

pub fn series_from_rows(name: &str, frequency: Frequency, rows: &[IntervalRow]) -> IntervalSeries {
    let with_equity = rows.iter().any(|r| r.equity.is_some());
    let df = interval_rows_to_frame(rows, with_equity).unwrap();
    IntervalSeries::new(name, frequency, df).unwrap()
}

/// 匯出檔文字內容（含標題行）
pub fn export_text(records: &[RawRecord]) -> String {
    let mut lines = vec![HEADER.to_string()];
    for record in records {
        let number = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_default();
        lines.push(format!(
            "{}\t{}\t{}\t{}",
            record.timestamp.clone().unwrap_or_default(),
            number(record.balance),
            number(record.equity),
            number(record.deposit_load)
        ));
    }
    lines.join("\r\n") + "\r\n"
}

/// 以帶 BOM 的 UTF-16LE 寫出匯出檔
pub fn write_utf16_export(dir: &Path, file_name: &str, text: &str) -> PathBuf {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let path = dir.join(file_name);
    fs::write(&path, bytes).unwrap();
    path
}

pub fn scalar(report: &MetricsReport, metric: &str) -> String {
    report
        .get(metric)
        .and_then(|value| value.as_scalar())
        .unwrap_or_else(|| panic!("缺少指標 {}", metric))
        .to_string()
}

pub fn field(report: &MetricsReport, metric: &str, key: &str) -> String {
    report
        .get(metric)
        .and_then(|value| value.field(key))
        .unwrap_or_else(|| panic!("缺少指標 {}.{}", metric, key))
        .to_string()
}
