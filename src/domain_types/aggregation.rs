use polars::prelude::{col, Expr};
use serde::{Deserialize, Serialize};

use crate::domain_types::types::ColumnName;

/// 單一欄位的聚合操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationOp {
    Last,
    Max,
    Sum,
    Mean,
}

impl AggregationOp {
    /// 轉換為作用於指定欄位的 Polars 表達式（保留原欄位名）
    pub fn to_expr(self, column: &str) -> Expr {
        let expr = col(column);
        let expr = match self {
            AggregationOp::Last => expr.last(),
            AggregationOp::Max => expr.max(),
            AggregationOp::Sum => expr.sum(),
            AggregationOp::Mean => expr.mean(),
        };
        expr.alias(column)
    }
}

/// 重採樣時每個欄位的聚合規則
///
/// `equity` 為 `None` 表示該欄位在此輪聚合中被丟棄。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
    pub balance: AggregationOp,
    pub equity: Option<AggregationOp>,
    pub deposit_load: AggregationOp,
    pub profit: AggregationOp,
    pub drawdown: AggregationOp,
}

impl AggregationSpec {
    /// 單一帳戶的小時聚合
    pub fn account_hourly() -> Self {
        Self {
            balance: AggregationOp::Last,
            equity: Some(AggregationOp::Max),
            deposit_load: AggregationOp::Last,
            profit: AggregationOp::Sum,
            drawdown: AggregationOp::Max,
        }
    }

    /// 跨帳戶的投資組合小時聚合：水位取平均，流量取加總
    pub fn portfolio_hourly() -> Self {
        Self {
            balance: AggregationOp::Mean,
            equity: Some(AggregationOp::Mean),
            deposit_load: AggregationOp::Sum,
            profit: AggregationOp::Sum,
            drawdown: AggregationOp::Sum,
        }
    }

    /// 所有序列最終的日線聚合（丟棄 equity）
    pub fn final_daily() -> Self {
        Self {
            balance: AggregationOp::Last,
            equity: None,
            deposit_load: AggregationOp::Max,
            profit: AggregationOp::Sum,
            drawdown: AggregationOp::Max,
        }
    }

    /// 產生對應的聚合表達式列表
    pub fn exprs(&self) -> Vec<Expr> {
        let mut exprs = vec![self.balance.to_expr(ColumnName::BALANCE)];
        if let Some(op) = self.equity {
            exprs.push(op.to_expr(ColumnName::EQUITY));
        }
        exprs.push(self.deposit_load.to_expr(ColumnName::DEPOSIT_LOAD));
        exprs.push(self.profit.to_expr(ColumnName::PROFIT));
        exprs.push(self.drawdown.to_expr(ColumnName::DRAWDOWN));
        exprs
    }
}
