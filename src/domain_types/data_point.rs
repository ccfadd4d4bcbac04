use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 匯出檔中的原始記錄
///
/// 數值欄位缺失時為 `None`，不以 0 代替。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timestamp: Option<String>,
    pub balance: Option<f64>,
    pub equity: Option<f64>,
    pub deposit_load: Option<f64>,
    /// 匯出檔中的行號（從 1 起算），非來自檔案時為 `None`
    #[serde(default)]
    pub line: Option<usize>,
}

impl RawRecord {
    pub fn new(timestamp: &str, balance: f64, equity: f64, deposit_load: f64) -> Self {
        Self {
            timestamp: Some(timestamp.to_string()),
            balance: Some(balance),
            equity: Some(equity),
            deposit_load: Some(deposit_load),
            line: None,
        }
    }

    pub fn at_line(self, line: usize) -> Self {
        Self {
            line: Some(line),
            ..self
        }
    }

    /// 四個欄位皆為空（空白時間字串視為空）
    pub fn is_empty(&self) -> bool {
        let blank_timestamp = self
            .timestamp
            .as_deref()
            .map(|ts| ts.trim().is_empty())
            .unwrap_or(true);

        blank_timestamp
            && self.balance.is_none()
            && self.equity.is_none()
            && self.deposit_load.is_none()
    }
}

/// 清洗後的記錄，附帶已實現損益與回撤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub timestamp: NaiveDateTime,
    pub balance: f64,
    pub equity: Option<f64>,
    pub deposit_load: f64,
    /// 真實餘額變動；餘額被沿用時為 0
    pub profit: f64,
    /// 非負的回撤幅度
    pub drawdown: f64,
}

/// 重採樣後序列中的一列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRow {
    /// 區間起點
    pub date: NaiveDateTime,
    pub balance: f64,
    /// 日線序列中為 `None`
    pub equity: Option<f64>,
    pub deposit_load: f64,
    pub profit: f64,
    pub drawdown: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_emptiness() {
        assert!(RawRecord::default().is_empty());

        let blank = RawRecord {
            timestamp: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.is_empty());

        let partial = RawRecord {
            balance: Some(100.0),
            ..Default::default()
        };
        assert!(!partial.is_empty());

        assert!(!RawRecord::new("2024.01.02 10:00", 100.0, 100.0, 0.0).is_empty());
    }
}
