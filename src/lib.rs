// ==========================================
// 需求预测与补货计划系统 - 核心库
// ==========================================
// 技术栈: Rust + Tokio + Serde
// 系统定位: 决策支持系统 (补货建议,人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 校验/预测/推演
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, PlanningConfigReader, PlanningProfile};
pub use domain::{BatchReport, ProductInput, ProductOutcome};
pub use engine::{BatchOrchestrator, ReplenishmentSimulator, SeasonalForecaster, SeriesValidator};

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "需求预测与补货计划系统";
