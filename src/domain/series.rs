// ==========================================
// 需求预测与补货计划系统 - 需求序列领域模型
// ==========================================
// 职责: 月度历史消耗序列 + 有效性标记
// 红线: 无效原因一经设置不可撤销
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// HistoryPoint - 月度历史消耗点
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub month: NaiveDate, // 月份 (当月 1 日)
    pub value: f64,       // 当月消耗量
}

impl HistoryPoint {
    pub fn new(month: NaiveDate, value: f64) -> Self {
        Self { month, value }
    }
}

// ==========================================
// SeriesIssue - 序列无效原因
// ==========================================
// 按校验顺序排列,只记录第一个命中的原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeriesIssue {
    InsufficientPeriods { got: usize, min: usize }, // 数据期数不足
    TooManyZeros { fraction: f64, max: f64 },       // 零值比例过高
    NoPositiveValues,                               // 无正值
    NoVariability { std_dev: f64 },                 // 无波动(常数序列)
}

impl fmt::Display for SeriesIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesIssue::InsufficientPeriods { got, min } => {
                write!(f, "数据期数不足: {} < {}", got, min)
            }
            SeriesIssue::TooManyZeros { fraction, max } => {
                write!(f, "零值比例过高: {:.2} > {:.2}", fraction, max)
            }
            SeriesIssue::NoPositiveValues => write!(f, "序列中没有正值"),
            SeriesIssue::NoVariability { std_dev } => {
                write!(f, "序列无波动: 标准差 {:.2e}", std_dev)
            }
        }
    }
}

// ==========================================
// Series - 单产品月度需求序列
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub product_id: String,             // 产品编码
    pub description: String,            // 产品描述
    pub values: Vec<f64>,               // 按月排列的消耗量
    pub months: Vec<NaiveDate>,         // 与 values 一一对应的月份
    pub is_valid: bool,                 // 有效性标记
    pub invalid_reason: Option<SeriesIssue>, // 无效原因
}

impl Series {
    pub fn new(product_id: &str, description: &str, values: Vec<f64>, months: Vec<NaiveDate>) -> Self {
        Self {
            product_id: product_id.to_string(),
            description: description.to_string(),
            values,
            months,
            is_valid: true,
            invalid_reason: None,
        }
    }

    /// 从历史消耗点构造 (保持输入顺序)
    pub fn from_history(product_id: &str, description: &str, history: &[HistoryPoint]) -> Self {
        let values = history.iter().map(|p| p.value).collect();
        let months = history.iter().map(|p| p.month).collect();
        Self::new(product_id, description, values, months)
    }

    /// 标记为无效
    ///
    /// 已有原因时保留第一个原因
    pub fn mark_invalid(&mut self, issue: SeriesIssue) {
        self.is_valid = false;
        if self.invalid_reason.is_none() {
            self.invalid_reason = Some(issue);
        }
    }

    /// 替换数值,保留月份与有效性
    pub fn with_values(&self, values: Vec<f64>) -> Self {
        Self {
            values,
            ..self.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 最后一个历史月份
    pub fn last_month(&self) -> Option<NaiveDate> {
        self.months.last().copied()
    }
}
