// ==========================================
// 需求预测与补货计划系统 - 预测结果领域模型
// ==========================================
// 职责: 平滑参数、拟合状态序列、前向预测、误差指标
// ==========================================

use crate::domain::types::{month_label, SeasonalType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 季节周期 (月)
pub const SEASONAL_PERIOD: usize = 12;

// ==========================================
// SmoothingParameters - 三次指数平滑参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParameters {
    pub alpha: f64,                   // 水平平滑系数
    pub beta: f64,                    // 趋势平滑系数
    pub gamma: f64,                   // 季节平滑系数
    pub seasonal_period: usize,       // 季节周期
    pub seasonal_type: SeasonalType,  // 季节类型
}

impl SmoothingParameters {
    pub fn new(alpha: f64, beta: f64, gamma: f64, seasonal_type: SeasonalType) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            seasonal_period: SEASONAL_PERIOD,
            seasonal_type,
        }
    }

    pub fn with_seasonal_type(self, seasonal_type: SeasonalType) -> Self {
        Self {
            seasonal_type,
            ..self
        }
    }
}

impl Default for SmoothingParameters {
    fn default() -> Self {
        Self::new(0.3, 0.1, 0.2, SeasonalType::Additive)
    }
}

// ==========================================
// ForecastMetrics - 样本内误差指标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mae: f64,  // 平均绝对误差
    pub rmse: f64, // 均方根误差
    pub mape: f64, // 平均绝对百分比误差 (%)
    pub mse: f64,  // 均方误差
}

// ==========================================
// MonthlyForecast - 单月预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyForecast {
    pub month: NaiveDate, // 月份 (当月 1 日)
    pub label: String,    // YYYY-MM
    pub value: f64,       // 预测消耗量
}

impl MonthlyForecast {
    pub fn new(month: NaiveDate, value: f64) -> Self {
        Self {
            month,
            label: month_label(month),
            value,
        }
    }
}

// ==========================================
// HistoricalComparison - 历史实际 vs 拟合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalComparison {
    pub month: NaiveDate,
    pub actual: f64,
    pub fitted: f64,
}

// ==========================================
// ForecastResult - 单产品预测结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub params: SmoothingParameters,    // 实际使用的参数

    // ===== 拟合状态序列 (长度 = 历史期数) =====
    pub fitted: Vec<f64>,
    pub level: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,

    // ===== 前向预测 =====
    pub forecasts: Vec<MonthlyForecast>,

    pub metrics: ForecastMetrics,

    // ===== 降级标记 =====
    pub degraded: bool,                 // 是否使用了平均值兜底
    pub degradation_reason: Option<String>,
}

impl ForecastResult {
    /// 查找某月预测值
    pub fn value_for(&self, month: NaiveDate) -> Option<f64> {
        self.forecasts
            .iter()
            .find(|f| f.month == month)
            .map(|f| f.value)
    }

    /// 预测值序列
    pub fn values(&self) -> Vec<f64> {
        self.forecasts.iter().map(|f| f.value).collect()
    }

    /// 历史实际值与拟合值对照
    ///
    /// # 参数
    /// - `months`: 历史月份
    /// - `actual`: 拟合时使用的历史值
    pub fn historical_comparison(
        &self,
        months: &[NaiveDate],
        actual: &[f64],
    ) -> Vec<HistoricalComparison> {
        months
            .iter()
            .zip(actual.iter())
            .zip(self.fitted.iter())
            .map(|((month, actual), fitted)| HistoricalComparison {
                month: *month,
                actual: *actual,
                fitted: *fitted,
            })
            .collect()
    }
}
