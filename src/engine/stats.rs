// ==========================================
// 需求预测与补货计划系统 - 统计工具
// ==========================================
// 职责: 均值、标准差、分位数、缺失值插补
// ==========================================

/// 算术平均 (空切片返回 0)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 样本标准差 (n - 1),少于 2 个点返回 0
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// 总体标准差 (n)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

/// 线性插值分位数 (q ∈ [0, 100]),输入需已升序
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = (q / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// 中位数
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, 50.0)
}

/// 缺失值插补
///
/// 内部缺口按下标线性插值,首尾缺口前向/后向填充;
/// 全部缺失时原样返回 0
pub fn fill_missing(values: &[f64], is_missing: impl Fn(f64) -> bool) -> Vec<f64> {
    let known: Vec<usize> = (0..values.len()).filter(|&i| !is_missing(values[i])).collect();
    let (first, last) = match (known.first(), known.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return vec![0.0; values.len()],
    };

    let mut filled = values.to_vec();
    for v in filled.iter_mut().take(first) {
        *v = values[first];
    }
    for v in filled.iter_mut().skip(last + 1) {
        *v = values[last];
    }
    for pair in known.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let span = (b - a) as f64;
        for (i, v) in filled.iter_mut().enumerate().take(b).skip(a + 1) {
            *v = values[a] + (values[b] - values[a]) * (i - a) as f64 / span;
        }
    }
    filled
}
