//! 派生指标公式

/// 区间吞吐（Mbps）：`scale * count * size * 8 / (interval_secs * 1e6)`。
/// 区间长度非正时返回 0。
pub fn throughput_mbps(scale: f64, count: u64, packet_size_bytes: u64, interval_secs: f64) -> f64 {
    if interval_secs <= 0.0 {
        return 0.0;
    }
    scale * count as f64 * packet_size_bytes as f64 * 8.0 / (interval_secs * 1e6)
}

/// 单个类别的收入（或损失）：`scale * price * size * count / 8 / 1e6`，未乘路径收益系数。
pub fn class_revenue(scale: f64, unit_price: f64, packet_size_bytes: u64, count: u64) -> f64 {
    scale * unit_price * packet_size_bytes as f64 * count as f64 / 8.0 / 1e6
}

/// 第 `p` 分位（0..=1，最近秩法）
pub fn percentile_ns(values: &[u64], p: f64) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let idx = (p * sorted.len() as f64).ceil() as usize;
    let idx = idx.saturating_sub(1).min(sorted.len().saturating_sub(1));
    sorted.get(idx).copied()
}

pub fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// 保留两位小数（用于日志输出）
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
