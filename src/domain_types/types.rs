//! 基本欄位名稱定義

/// 序列數據框架使用的欄位名稱
///
/// `DATE` 欄位保存區間起點的毫秒時間戳（UTC 無時區）。
pub struct ColumnName;

impl ColumnName {
    pub const DATE: &'static str = "date";
    pub const BALANCE: &'static str = "balance";
    pub const EQUITY: &'static str = "equity";
    pub const DEPOSIT_LOAD: &'static str = "deposit_load";
    pub const PROFIT: &'static str = "profit";
    pub const DRAWDOWN: &'static str = "drawdown";

    /// 日線輸出（不含 equity）的欄位順序
    pub const DAILY_COLUMNS: [&'static str; 5] = [
        Self::DATE,
        Self::BALANCE,
        Self::DEPOSIT_LOAD,
        Self::PROFIT,
        Self::DRAWDOWN,
    ];
}
