// ==========================================
// 需求预测与补货计划系统 - 产品输入与结果
// ==========================================
// 职责: 单产品批量输入、单产品处理结果 (成功/无效/失败)
// ==========================================

use crate::domain::forecast::{ForecastResult, HistoricalComparison};
use crate::domain::projection::ProductProjection;
use crate::domain::series::{HistoryPoint, SeriesIssue};
use crate::domain::types::FailureCategory;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductInput - 单产品输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub product_id: String,
    #[serde(default)]
    pub description: String,
    pub history: Vec<HistoryPoint>, // 按月排列的历史消耗
    #[serde(default)]
    pub stock_on_hand: f64, // 当前在库
    #[serde(default)]
    pub units_in_transit: f64, // 当前在途 (仅回显,不参与推演)
    #[serde(default)]
    pub case_size: f64, // 箱规 (<= 0 视为 1)

    // ===== 单产品覆写 =====
    #[serde(default)]
    pub lead_time_days: Option<u32>,
    #[serde(default)]
    pub safety_stock: Option<f64>,
}

// ==========================================
// Degradation - 非致命降级记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degradation {
    pub category: FailureCategory,
    pub reason: String,
}

// ==========================================
// ProductReport - 完成推演的产品报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub product_id: String,
    pub description: String,
    pub is_valid: bool,
    pub invalid_reason: Option<SeriesIssue>,
    pub cleaned_series: Vec<f64>, // 无效序列时为空
    pub forecast: Option<ForecastResult>,
    pub history_fit: Vec<HistoricalComparison>,
    pub projection: ProductProjection,
    pub degradations: Vec<Degradation>,
}

// ==========================================
// ProductOutcome - 单产品处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductOutcome {
    Projected(Box<ProductReport>),
    Invalid {
        product_id: String,
        description: String,
        reason: SeriesIssue,
    },
    Failed {
        product_id: String,
        description: String,
        category: FailureCategory,
        #[serde(default)]
        series_valid: Option<bool>, // 失败前的校验结果 (工作线程异常时未知)
        reason: String,
    },
}

impl ProductOutcome {
    pub fn product_id(&self) -> &str {
        match self {
            ProductOutcome::Projected(report) => &report.product_id,
            ProductOutcome::Invalid { product_id, .. } => product_id,
            ProductOutcome::Failed { product_id, .. } => product_id,
        }
    }

    pub fn report(&self) -> Option<&ProductReport> {
        match self {
            ProductOutcome::Projected(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, ProductOutcome::Projected(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProductOutcome::Failed { .. })
    }
}
