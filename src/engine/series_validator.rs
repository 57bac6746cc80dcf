// ==========================================
// 需求预测与补货计划系统 - 序列校验引擎
// ==========================================
// 职责: 判定序列是否可预测,清洗缺失值与异常值
// 输入: Series + ValidationThresholds
// 输出: 有效性标记 + 无效原因 / 清洗后的序列
// 红线: 校验失败非致命,只标记不中断
// ==========================================

use crate::config::ValidationThresholds;
use crate::domain::series::{Series, SeriesIssue};
use crate::engine::stats;
use tracing::{debug, instrument, warn};

/// 常数序列判定阈值 (样本标准差)
pub const MIN_STD_DEV: f64 = 1e-6;

/// 异常值替换最大轮数
const MAX_OUTLIER_PASSES: usize = 100;

// ==========================================
// SeriesValidator - 序列校验引擎
// ==========================================
pub struct SeriesValidator {
    thresholds: ValidationThresholds,
}

impl SeriesValidator {
    /// 构造函数
    ///
    /// # 参数
    /// - `thresholds`: 校验阈值
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    // ==========================================
    // 校验
    // ==========================================

    /// 校验序列并写入有效性标记
    ///
    /// # 返回
    /// 序列是否有效
    #[instrument(skip(self, series), fields(product_id = %series.product_id, len = series.len()))]
    pub fn validate(&self, series: &mut Series) -> bool {
        match self.check(&series.values) {
            Ok(()) => series.is_valid,
            Err(issue) => {
                warn!(product_id = %series.product_id, reason = %issue, "序列校验未通过");
                series.mark_invalid(issue);
                false
            }
        }
    }

    /// 按顺序执行四项校验,返回第一个命中的原因
    ///
    /// 1. 期数不足
    /// 2. 零值比例过高
    /// 3. 无正值
    /// 4. 无波动
    pub fn check(&self, values: &[f64]) -> Result<(), SeriesIssue> {
        let n = values.len();
        if n < self.thresholds.min_periods {
            return Err(SeriesIssue::InsufficientPeriods {
                got: n,
                min: self.thresholds.min_periods,
            });
        }

        let zero_fraction = if n == 0 {
            0.0
        } else {
            values.iter().filter(|&&v| v == 0.0).count() as f64 / n as f64
        };
        if zero_fraction > self.thresholds.max_zero_fraction {
            return Err(SeriesIssue::TooManyZeros {
                fraction: zero_fraction,
                max: self.thresholds.max_zero_fraction,
            });
        }

        if values.iter().all(|&v| v <= 0.0) {
            return Err(SeriesIssue::NoPositiveValues);
        }

        let std_dev = stats::sample_std_dev(values);
        if std_dev.is_nan() || std_dev < MIN_STD_DEV {
            return Err(SeriesIssue::NoVariability { std_dev });
        }

        Ok(())
    }

    // ==========================================
    // 清洗
    // ==========================================

    /// 清洗序列 (保留月份与有效性)
    pub fn clean(&self, series: &Series) -> Series {
        series.with_values(self.clean_values(&series.values))
    }

    /// 清洗数值
    ///
    /// 1. 负值与非有限值归零
    /// 2. 零值视为缺失: 内部线性插值,首尾前向/后向填充
    /// 3. IQR 异常值替换为非异常值中位数,重复至无异常值
    pub fn clean_values(&self, values: &[f64]) -> Vec<f64> {
        let clamped: Vec<f64> = values
            .iter()
            .map(|&v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
            .collect();

        let mut cleaned = stats::fill_missing(&clamped, |v| v == 0.0);

        let mut passes = 0;
        while passes < MAX_OUTLIER_PASSES {
            let replaced = self.replace_outliers(&mut cleaned);
            if replaced == 0 {
                break;
            }
            debug!(replaced, pass = passes, "异常值已替换");
            passes += 1;
        }

        cleaned
    }

    /// 单轮 IQR 异常值替换
    ///
    /// # 返回
    /// 被替换的点数 (IQR <= 0 时为 0)
    fn replace_outliers(&self, values: &mut [f64]) -> usize {
        let mut positives: Vec<f64> = values.iter().copied().filter(|&v| v > 0.0).collect();
        if positives.is_empty() {
            return 0;
        }
        positives.sort_by(f64::total_cmp);

        let q1 = stats::percentile_sorted(&positives, 25.0);
        let q3 = stats::percentile_sorted(&positives, 75.0);
        let iqr = q3 - q1;
        if iqr <= 0.0 {
            return 0;
        }

        let k = self.thresholds.outlier_multiplier;
        let lower = q1 - k * iqr;
        let upper = q3 + k * iqr;
        let is_outlier = |v: f64| v < lower || v > upper;

        let inliers: Vec<f64> = values.iter().copied().filter(|&v| !is_outlier(v)).collect();
        if inliers.is_empty() || inliers.len() == values.len() {
            return 0;
        }
        let replacement = stats::median(&inliers);

        let mut replaced = 0;
        for v in values.iter_mut() {
            if is_outlier(*v) {
                *v = replacement;
                replaced += 1;
            }
        }
        replaced
    }

    /// 校验并清洗
    ///
    /// 无效序列原样返回 (带无效原因)
    pub fn validate_and_clean(&self, mut series: Series) -> Series {
        if self.validate(&mut series) {
            self.clean(&series)
        } else {
            series
        }
    }
}

impl Default for SeriesValidator {
    fn default() -> Self {
        Self::new(ValidationThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_series(values: Vec<f64>) -> Series {
        Series::new("P-TEST", "测试产品", values, vec![])
    }

    fn seasonal_values(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + 10.0 * ((i % 12) as f64)).collect()
    }

    #[test]
    fn test_valid_series_passes() {
        let validator = SeriesValidator::default();
        let mut series = create_test_series(seasonal_values(24));
        assert!(validator.validate(&mut series));
        assert!(series.invalid_reason.is_none());
    }

    #[test]
    fn test_insufficient_periods_checked_first() {
        let validator = SeriesValidator::default();
        let mut series = create_test_series(vec![0.0; 5]);
        assert!(!validator.validate(&mut series));
        assert_eq!(
            series.invalid_reason,
            Some(SeriesIssue::InsufficientPeriods { got: 5, min: 12 })
        );
    }

    #[test]
    fn test_too_many_zeros() {
        let validator = SeriesValidator::default();
        let mut values = vec![0.0; 7];
        values.extend([5.0, 6.0, 7.0, 8.0, 9.0]);
        let result = validator.check(&values);
        assert!(matches!(result, Err(SeriesIssue::TooManyZeros { .. })));
    }

    #[test]
    fn test_all_negative_has_no_positive_values() {
        let validator = SeriesValidator::default();
        let values: Vec<f64> = (0..12).map(|i| -1.0 - i as f64).collect();
        assert_eq!(validator.check(&values), Err(SeriesIssue::NoPositiveValues));
    }

    #[test]
    fn test_constant_series_has_no_variability() {
        let validator = SeriesValidator::default();
        let result = validator.check(&[30.0; 12]);
        assert!(matches!(result, Err(SeriesIssue::NoVariability { .. })));
    }

    #[test]
    fn test_clean_clamps_and_interpolates() {
        let validator = SeriesValidator::default();
        let cleaned = validator.clean_values(&[-5.0, 10.0, 0.0, 14.0, f64::NAN, 18.0]);
        assert_eq!(cleaned, vec![10.0, 10.0, 12.0, 14.0, 16.0, 18.0]);
    }

    #[test]
    fn test_clean_replaces_outlier_with_inlier_median() {
        let validator = SeriesValidator::default();
        let cleaned = validator.clean_values(&[1.0, 2.0, 3.0, 4.0, 100.0]);
        assert_eq!(cleaned, vec![1.0, 2.0, 3.0, 4.0, 2.5]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let validator = SeriesValidator::default();
        let raw = vec![5.0, 0.0, 7.0, 300.0, -2.0, 6.0, 9.0, 0.0, 8.0, 1.0, 40.0, 6.5];
        let once = validator.clean_values(&raw);
        let twice = validator.clean_values(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_all_zero_stays_zero() {
        let validator = SeriesValidator::default();
        assert_eq!(validator.clean_values(&[0.0, -1.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }
}
