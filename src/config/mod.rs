// ==========================================
// 需求预测与补货计划系统 - 配置层
// ==========================================
// 职责: 配置加载、类型化配置、范围校验
// 存储: JSON 键值文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod planning_config_trait;
pub mod planning_profile;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use planning_config_trait::PlanningConfigReader;
pub use planning_profile::{ForecastConfig, PlanningProfile, SimulationConfig, ValidationThresholds};
