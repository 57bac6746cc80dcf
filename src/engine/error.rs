// ==========================================
// 需求预测与补货计划系统 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 预测引擎错误类型
///
/// 均由 SeasonalForecaster 内部捕获并降级为平均值预测
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("序列为空,无法拟合")]
    EmptySeries,

    #[error("序列含非有限值 (位置 {index})")]
    NonFiniteInput { index: usize },

    #[error("季节状态不足: 需要 {needed} 个,实际 {got} 个")]
    InsufficientSeasonalHistory { needed: usize, got: usize },

    #[error("数值计算失败: {0}")]
    ComputationError(String),
}

/// 预测引擎 Result 类型别名
pub type ForecastEngineResult<T> = Result<T, ForecastError>;

/// 库存模拟错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("无法确定推演起始月: 产品 {product_id} 无历史月份且未配置 start_month")]
    MissingStartMonth { product_id: String },

    #[error("模拟配置无效: {0}")]
    InvalidConfig(String),

    #[error("历史消耗含非有限值: 产品 {product_id}")]
    NonFiniteHistory { product_id: String },

    #[error("日期越界: {base} + {offset}")]
    DateOverflow { base: NaiveDate, offset: String },

    #[error("库存状态出现非有限值 ({date}, {field})")]
    NonFiniteState { date: NaiveDate, field: String },
}

/// 库存模拟 Result 类型别名
pub type SimulationResult<T> = Result<T, SimulationError>;
