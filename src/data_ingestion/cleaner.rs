//! 單一帳戶原始記錄的清洗
//!
//! 入金事件與 equity ≠ balance 的快照不是真實的餘額變動，
//! 這些列會沿用上一列（已修正）的餘額。

use tracing::debug;

use super::error::{IngestError, IngestResult};
use crate::domain_types::{CleanedRecord, RawRecord};
use crate::utils::time_utils::parse_export_datetime;

/// 清洗統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub total: usize,
    pub dropped_empty: usize,
    pub carried_forward: usize,
}

/// 原始記錄清洗器
pub struct RecordCleaner;

impl RecordCleaner {
    /// 清洗一個帳戶的有序原始記錄
    pub fn clean(records: &[RawRecord]) -> IngestResult<Vec<CleanedRecord>> {
        Self::clean_with_stats(records).map(|(cleaned, _)| cleaned)
    }

    pub fn clean_with_stats(records: &[RawRecord]) -> IngestResult<(Vec<CleanedRecord>, CleaningStats)> {
        let mut stats = CleaningStats {
            total: records.len(),
            ..Default::default()
        };
        let mut cleaned: Vec<CleanedRecord> = Vec::with_capacity(records.len());
        // 上一列修正後的餘額，單次由左至右傳遞
        let mut last_balance: Option<f64> = None;

        for (index, raw) in records.iter().enumerate() {
            if raw.is_empty() {
                stats.dropped_empty += 1;
                continue;
            }
            // 有檔案行號時以行號回報，否則使用列表位置
            let row = raw.line.unwrap_or(index + 1);

            let timestamp_text = raw.timestamp.as_deref().unwrap_or_default();
            let timestamp = parse_export_datetime(timestamp_text).ok_or_else(|| {
                IngestError::parse(row, "timestamp", timestamp_text, "無法解析的日期時間")
            })?;
            let deposit_load = raw.deposit_load.unwrap_or(0.0);

            let (balance, profit) = match last_balance {
                None => {
                    let balance = raw.balance.ok_or_else(|| {
                        IngestError::parse(row, "balance", "", "第一筆記錄缺少餘額")
                    })?;
                    (balance, 0.0)
                }
                Some(previous) => {
                    let balance = match (raw.balance, raw.equity) {
                        (Some(balance), Some(equity)) if deposit_load <= 0.0 && equity == balance => balance,
                        _ => {
                            stats.carried_forward += 1;
                            previous
                        }
                    };
                    let profit = if balance != previous { balance - previous } else { 0.0 };
                    (balance, profit)
                }
            };

            let mut drawdown = 0.0;
            if last_balance.is_some() {
                if let Some(equity) = raw.equity {
                    if equity - balance < 0.0 {
                        drawdown = balance - equity;
                    }
                }
                // 已實現虧損一律計入回撤，覆蓋浮動值
                if profit < 0.0 {
                    drawdown = profit.abs();
                }
            }

            last_balance = Some(balance);
            cleaned.push(CleanedRecord {
                timestamp,
                balance,
                equity: raw.equity,
                deposit_load,
                profit,
                drawdown,
            });
        }

        debug!(
            total = stats.total,
            kept = cleaned.len(),
            dropped_empty = stats.dropped_empty,
            carried_forward = stats.carried_forward,
            "原始記錄清洗完成"
        );

        Ok((cleaned, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn raw(ts: &str, balance: f64, equity: f64, deposit_load: f64) -> RawRecord {
        RawRecord::new(ts, balance, equity, deposit_load)
    }

    #[test]
    fn test_first_row_has_no_signal() {
        let cleaned = RecordCleaner::clean(&[raw("2024.01.02 10:00", 1000.0, 900.0, 0.0)]).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].profit, 0.0);
        assert_eq!(cleaned[0].drawdown, 0.0);
        assert_eq!(cleaned[0].balance, 1000.0);
    }

    #[test]
    fn test_genuine_change_produces_profit() {
        let cleaned = RecordCleaner::clean(&[
            raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0),
            raw("2024.01.02 11:00", 1050.0, 1050.0, 0.0),
            raw("2024.01.02 12:00", 1020.0, 1020.0, 0.0),
        ])
        .unwrap();

        let profits: Vec<f64> = cleaned.iter().map(|r| r.profit).collect();
        assert_eq!(profits, vec![0.0, 50.0, -30.0]);
        // 已實現虧損計為回撤
        assert_eq!(cleaned[2].drawdown, 30.0);
    }

    #[test]
    fn test_deposit_row_is_carried_forward() {
        let cleaned = RecordCleaner::clean(&[
            raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0),
            raw("2024.01.02 11:00", 6000.0, 6000.0, 5000.0),
            raw("2024.01.02 12:00", 6000.0, 6000.0, 0.0),
        ])
        .unwrap();

        assert_eq!(cleaned[1].balance, 1000.0);
        assert_eq!(cleaned[1].profit, 0.0);
        // 入金後第一個正常列會表現為真實變動
        assert_eq!(cleaned[2].profit, 5000.0);
    }

    #[test]
    fn test_floating_snapshot_records_equity_drawdown() {
        let cleaned = RecordCleaner::clean(&[
            raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0),
            raw("2024.01.02 10:30", 1010.0, 980.0, 0.0),
        ])
        .unwrap();

        // equity ≠ balance: 餘額沿用，回撤來自浮動虧損
        assert_eq!(cleaned[1].balance, 1000.0);
        assert_eq!(cleaned[1].profit, 0.0);
        assert_eq!(cleaned[1].drawdown, 20.0);
    }

    #[test]
    fn test_correction_chains_through_consecutive_artifacts() {
        let cleaned = RecordCleaner::clean(&[
            raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0),
            raw("2024.01.02 10:10", 1100.0, 1090.0, 0.0),
            raw("2024.01.02 10:20", 1200.0, 1150.0, 0.0),
            raw("2024.01.02 10:30", 1200.0, 1200.0, 0.0),
        ])
        .unwrap();

        let balances: Vec<f64> = cleaned.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![1000.0, 1000.0, 1000.0, 1200.0]);
        assert_eq!(cleaned[3].profit, 200.0);
    }

    #[test]
    fn test_empty_rows_are_dropped() {
        let (cleaned, stats) = RecordCleaner::clean_with_stats(&[
            raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0),
            RawRecord::default(),
            raw("2024.01.02 11:00", 1000.0, 1000.0, 0.0),
        ])
        .unwrap();

        assert_eq!(cleaned.len(), 2);
        assert_eq!(stats.dropped_empty, 1);
        assert_eq!(stats.carried_forward, 0);
    }

    #[test]
    fn test_missing_equity_is_treated_as_artifact() {
        let mut second = raw("2024.01.02 11:00", 1300.0, 0.0, 0.0);
        second.equity = None;
        let cleaned = RecordCleaner::clean(&[raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0), second]).unwrap();

        assert_eq!(cleaned[1].balance, 1000.0);
        assert_eq!(cleaned[1].equity, None);
        assert_eq!(cleaned[1].drawdown, 0.0);
    }

    #[test]
    fn test_unparseable_timestamp_names_row() {
        let result = RecordCleaner::clean(&[
            raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0),
            raw("yesterday", 1000.0, 1000.0, 0.0),
        ]);

        assert_matches!(result, Err(IngestError::Parse { row: 2, field: "timestamp", .. }));
    }

    #[test]
    fn test_error_row_prefers_source_line() {
        let result = RecordCleaner::clean(&[
            raw("2024.01.02 10:00", 1000.0, 1000.0, 0.0).at_line(2),
            RawRecord::default().at_line(3),
            raw("yesterday", 1000.0, 1000.0, 0.0).at_line(5),
        ]);

        assert_matches!(result, Err(IngestError::Parse { row: 5, field: "timestamp", .. }));
    }

    #[test]
    fn test_first_row_without_balance_fails() {
        let first = RawRecord {
            timestamp: Some("2024.01.02 10:00".to_string()),
            equity: Some(1000.0),
            ..Default::default()
        };
        assert_matches!(
            RecordCleaner::clean(&[first]),
            Err(IngestError::Parse { row: 1, field: "balance", .. })
        );
    }
}
