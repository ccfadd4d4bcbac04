//! 餘額回落區段的定位

/// 累積最大值
pub fn cumulative_max(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            peak
        })
        .collect()
}

/// 最大的餘額回落，索引皆為位置索引
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceReduction {
    /// 高點減去回落低點的餘額
    pub amount: f64,
    /// 回落前的高點
    pub start: usize,
    /// 回落最深的位置
    pub end: usize,
    /// 餘額重新回到高點的位置
    pub recovery: Option<usize>,
}

/// 計算最大的餘額回落
pub fn max_balance_reduction(balances: &[f64]) -> Option<BalanceReduction> {
    if balances.is_empty() {
        return None;
    }

    let peaks = cumulative_max(balances);
    let mut end = 0;
    let mut amount = peaks[0] - balances[0];
    for (i, (&peak, &balance)) in peaks.iter().zip(balances).enumerate().skip(1) {
        let reduction = peak - balance;
        if reduction > amount {
            amount = reduction;
            end = i;
        }
    }

    let start = peaks.iter().position(|&peak| peak == peaks[end]).unwrap_or(end);
    let recovery = balances[end..]
        .iter()
        .position(|&balance| balance >= peaks[start])
        .map(|offset| end + offset);

    Some(BalanceReduction {
        amount,
        start,
        end,
        recovery,
    })
}

/// 每列是否低於先前的最高餘額
pub fn below_high_water(balances: &[f64]) -> Vec<bool> {
    cumulative_max(balances)
        .iter()
        .zip(balances)
        .map(|(&peak, &balance)| balance < peak)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reduction_example() {
        let balances = [100.0, 120.0, 90.0, 95.0, 130.0];
        assert_eq!(cumulative_max(&balances), vec![100.0, 120.0, 120.0, 120.0, 130.0]);

        let reduction = max_balance_reduction(&balances).unwrap();
        assert_eq!(reduction.amount, 30.0);
        assert_eq!(reduction.start, 1);
        assert_eq!(reduction.end, 2);
        assert_eq!(reduction.recovery, Some(4));
    }

    #[test]
    fn test_reduction_never_recovered() {
        let reduction = max_balance_reduction(&[100.0, 80.0, 90.0]).unwrap();
        assert_eq!(reduction.amount, 20.0);
        assert_eq!(reduction.start, 0);
        assert_eq!(reduction.end, 1);
        assert_eq!(reduction.recovery, None);
    }

    #[test]
    fn test_reduction_start_is_first_index_of_peak() {
        // 高點持平時，起點取第一次達到高點的位置
        let reduction = max_balance_reduction(&[100.0, 120.0, 120.0, 110.0]).unwrap();
        assert_eq!(reduction.start, 1);
        assert_eq!(reduction.end, 3);
    }

    #[test]
    fn test_monotonic_series_has_no_reduction() {
        let reduction = max_balance_reduction(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(reduction.amount, 0.0);
        assert_eq!(reduction.end, 0);
        assert_eq!(reduction.recovery, Some(0));
        assert!(max_balance_reduction(&[]).is_none());
    }

    #[test]
    fn test_below_high_water() {
        assert_eq!(
            below_high_water(&[100.0, 120.0, 90.0, 95.0, 130.0]),
            vec![false, false, true, true, false]
        );
    }

    proptest! {
        #[test]
        fn prop_cumulative_max_is_monotonic(values in proptest::collection::vec(-1e6f64..1e6, 1..64)) {
            let peaks = cumulative_max(&values);
            for window in peaks.windows(2) {
                prop_assert!(window[1] >= window[0]);
            }
            for (peak, value) in peaks.iter().zip(&values) {
                prop_assert!(peak >= value);
            }
        }

        #[test]
        fn prop_reduction_is_non_negative(values in proptest::collection::vec(0.0f64..1e6, 1..64)) {
            let reduction = max_balance_reduction(&values).unwrap();
            prop_assert!(reduction.amount >= 0.0);
            prop_assert!(reduction.start <= reduction.end);
        }
    }
}
