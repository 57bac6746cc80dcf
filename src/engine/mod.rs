// ==========================================
// 需求预测与补货计划系统 - 引擎层
// ==========================================
// 职责: 序列校验、季节预测、补货模拟、批次编排
// 红线: 引擎无共享可变状态,配置显式传入
// ==========================================

pub mod error;
pub mod forecaster;
pub mod optimizer;
pub mod order_queue;
pub mod orchestrator;
pub mod replenishment;
pub mod series_validator;
pub mod stats;

// 重导出核心引擎
pub use error::{ForecastEngineResult, ForecastError, SimulationError, SimulationResult};
pub use forecaster::{compute_metrics, determine_seasonality, fit, FittedModel, SeasonalForecaster};
pub use order_queue::PendingOrderQueue;
pub use orchestrator::{process_product, BatchOrchestrator};
pub use replenishment::{ReplenishmentSimulator, PROJECTION_MONTHS};
pub use series_validator::SeriesValidator;
