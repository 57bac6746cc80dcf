// ==========================================
// 需求预测与补货计划系统 - 领域类型定义
// ==========================================
// 职责: 季节类型、风险等级、安全库存来源、失败类别
// 红线: 等级制,不是评分制
// ==========================================

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 季节类型 (Seasonal Type)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeasonalType {
    #[default]
    Additive,       // 加法季节
    Multiplicative, // 乘法季节
}

impl fmt::Display for SeasonalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonalType::Additive => write!(f, "ADDITIVE"),
            SeasonalType::Multiplicative => write!(f, "MULTIPLICATIVE"),
        }
    }
}

// ==========================================
// 库存风险等级 (Risk Tier)
// ==========================================
// 依据月末库存与安全库存/再订货点的关系判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,    // 低风险: 月末库存 > 再订货点
    Medium, // 中风险: 安全库存 < 月末库存 <= 再订货点
    High,   // 高风险: 月末库存 <= 安全库存
}

impl RiskTier {
    /// 按月末库存判定风险等级
    ///
    /// # 参数
    /// - `closing_stock`: 月末库存
    /// - `safety_stock`: 安全库存
    /// - `reorder_point`: 当前再订货点
    pub fn classify(closing_stock: f64, safety_stock: f64, reorder_point: f64) -> Self {
        if closing_stock <= safety_stock {
            RiskTier::High
        } else if closing_stock <= reorder_point {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::Medium => write!(f, "MEDIUM"),
            RiskTier::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 安全库存来源 (Safety Stock Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyStockSource {
    Computed, // 服务水平 z 值计算
    Manual,   // 人工指定
}

impl fmt::Display for SafetyStockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyStockSource::Computed => write!(f, "COMPUTED"),
            SafetyStockSource::Manual => write!(f, "MANUAL"),
        }
    }
}

// ==========================================
// 失败/降级类别 (Failure Category)
// ==========================================
// 三类均为单产品内非致命错误,不重试
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCategory {
    Validation, // 序列校验未通过
    Forecast,   // 预测拟合失败(已降级为平均值)
    Simulation, // 逐日模拟失败
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCategory::Validation => write!(f, "VALIDATION"),
            FailureCategory::Forecast => write!(f, "FORECAST"),
            FailureCategory::Simulation => write!(f, "SIMULATION"),
        }
    }
}

// ==========================================
// 月份工具
// ==========================================
// 月份标识统一为当月 1 日

/// 月份标签 (YYYY-MM)
pub fn month_label(month: NaiveDate) -> String {
    month.format("%Y-%m").to_string()
}

/// 归一到当月 1 日
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // 每个月都有 1 日,减去 (day - 1) 天不会越界
    date - Days::new(u64::from(date.day0()))
}

/// 月份偏移,越界返回 None
pub fn add_months(month: NaiveDate, offset: u32) -> Option<NaiveDate> {
    first_of_month(month).checked_add_months(Months::new(offset))
}

/// 两个月份之间相差的月数 (to 早于 from 时为负)
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// 当月最后一天
pub fn last_day_of_month(month: NaiveDate) -> Option<NaiveDate> {
    add_months(month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_classify() {
        assert_eq!(RiskTier::classify(5.0, 10.0, 20.0), RiskTier::High);
        assert_eq!(RiskTier::classify(10.0, 10.0, 20.0), RiskTier::High);
        assert_eq!(RiskTier::classify(20.0, 10.0, 20.0), RiskTier::Medium);
        assert_eq!(RiskTier::classify(20.1, 10.0, 20.0), RiskTier::Low);
    }

    #[test]
    fn test_month_helpers() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(first_of_month(d), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(
            add_months(d, 1),
            Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
        assert_eq!(
            last_day_of_month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(month_label(d), "2024-01");
    }

    #[test]
    fn test_months_between() {
        let jan = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let jun = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let prev_nov = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        assert_eq!(months_between(jan, jun), 5);
        assert_eq!(months_between(jan, prev_nov), -2);
        assert_eq!(months_between(jan, jan), 0);
    }

    #[test]
    fn test_enum_serde_format() {
        let json = serde_json::to_string(&SeasonalType::Multiplicative).unwrap();
        assert_eq!(json, "\"MULTIPLICATIVE\"");
        let tier: RiskTier = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(tier, RiskTier::High);
        assert_eq!(FailureCategory::Simulation.to_string(), "SIMULATION");
    }
}
