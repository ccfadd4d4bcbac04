//! 連續區段（streak）偵測
//!
//! 每列先指派一個布林旗標，再切分為旗標相同的最大連續區段。

/// 一個旗標為真的連續區段，`start..=end` 為位置索引
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub len: usize,
    pub start: usize,
    pub end: usize,
}

/// 每列所屬區段的長度；旗標為假的列為 0
pub fn run_lengths(flags: &[bool]) -> Vec<usize> {
    let mut lengths = vec![0; flags.len()];
    let mut start = 0;

    while start < flags.len() {
        let flag = flags[start];
        let end = flags[start..]
            .iter()
            .position(|&f| f != flag)
            .map_or(flags.len(), |offset| start + offset);

        if flag {
            lengths[start..end].fill(end - start);
        }
        start = end;
    }

    lengths
}

/// 最長的旗標區段；長度相同時取最早出現者，沒有任何旗標時為 `None`
pub fn longest_run(flags: &[bool]) -> Option<Run> {
    let lengths = run_lengths(flags);
    let longest = lengths.iter().copied().max().unwrap_or(0);
    if longest == 0 {
        return None;
    }

    // 第一個達到最大長度的列即該區段的起點
    let first = lengths.iter().position(|&len| len == longest)?;
    let end = first + longest - 1;
    Some(Run {
        len: longest,
        start: end + 1 - longest,
        end,
    })
}
