// ==========================================
// 需求预测与补货计划系统 - 领域模型层
// ==========================================
// 职责: 定义需求序列、预测结果、库存推演、批次报告
// 红线: 不含引擎逻辑
// ==========================================

pub mod batch;
pub mod forecast;
pub mod product;
pub mod projection;
pub mod series;
pub mod types;

// 重导出核心类型
pub use batch::{BatchReport, BatchSummary};
pub use forecast::{
    ForecastMetrics, ForecastResult, HistoricalComparison, MonthlyForecast, SmoothingParameters,
    SEASONAL_PERIOD,
};
pub use product::{Degradation, ProductInput, ProductOutcome, ProductReport};
pub use projection::{
    DayState, InventoryPolicy, MonthProjection, OpeningRecommendation, PendingOrder,
    ProductProjection, ReorderAlert,
};
pub use series::{HistoryPoint, Series, SeriesIssue};
pub use types::{FailureCategory, RiskTier, SafetyStockSource, SeasonalType};
