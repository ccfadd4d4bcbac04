//! 重採樣頻率定義

use polars::prelude::Duration as PolarsDuration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 區間寬度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Hour,
    Day,
}

impl Frequency {
    /// 獲取頻率的毫秒數
    pub fn milliseconds(&self) -> i64 {
        match self {
            Frequency::Hour => 3_600_000,
            Frequency::Day => 86_400_000,
        }
    }

    /// 轉換為 Polars Duration（整數索引，單位為毫秒）
    pub fn to_duration(&self) -> PolarsDuration {
        PolarsDuration::parse(&format!("{}i", self.milliseconds()))
    }

    /// 獲取顯示名稱
    pub fn display_name(&self) -> &'static str {
        match self {
            Frequency::Hour => "Hour",
            Frequency::Day => "Day",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_widths() {
        assert_eq!(Frequency::Hour.milliseconds(), 3_600_000);
        assert_eq!(Frequency::Day.milliseconds(), 24 * Frequency::Hour.milliseconds());
        assert_eq!(Frequency::Hour.to_duration(), PolarsDuration::parse("3600000i"));
        assert_eq!(Frequency::Day.to_string(), "Day");
    }
}
