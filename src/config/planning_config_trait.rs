// ==========================================
// 需求预测与补货计划系统 - 计划配置读取 Trait
// ==========================================
// 职责: 定义构建 PlanningProfile 所需的配置读取接口(不包含实现)
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// PlanningConfigReader Trait
// ==========================================
// 实现者: ConfigManager (JSON 键值文件)
#[async_trait]
pub trait PlanningConfigReader: Send + Sync {
    // ===== 序列校验 =====

    /// 最少期数 (默认 12)
    async fn get_min_periods(&self) -> ConfigResult<usize>;

    /// 最大零值比例 (默认 0.5)
    async fn get_max_zero_fraction(&self) -> ConfigResult<f64>;

    /// IQR 异常值倍数 (默认 1.5)
    async fn get_outlier_multiplier(&self) -> ConfigResult<f64>;

    // ===== 预测 =====

    /// 水平平滑系数 (默认 0.3)
    async fn get_smoothing_alpha(&self) -> ConfigResult<f64>;

    /// 趋势平滑系数 (默认 0.1)
    async fn get_smoothing_beta(&self) -> ConfigResult<f64>;

    /// 季节平滑系数 (默认 0.2)
    async fn get_smoothing_gamma(&self) -> ConfigResult<f64>;

    /// 预测月数 (默认 6)
    async fn get_forecast_horizon_months(&self) -> ConfigResult<usize>;

    /// 是否启用参数寻优 (默认 false)
    async fn get_optimize_parameters(&self) -> ConfigResult<bool>;

    // ===== 库存模拟 =====

    /// 服务水平 % (默认 99.99)
    async fn get_service_level_pct(&self) -> ConfigResult<f64>;

    /// 人工安全库存 (默认 未设置)
    async fn get_safety_stock_override(&self) -> ConfigResult<Option<f64>>;

    /// 补货提前期天数 (默认 20)
    async fn get_lead_time_days(&self) -> ConfigResult<u32>;

    /// 每月运营天数 (默认 22)
    async fn get_operational_days_per_month(&self) -> ConfigResult<u32>;

    /// 月消耗折算天数 (默认 未设置 = 运营天数)
    async fn get_consumption_days_per_month(&self) -> ConfigResult<Option<u32>>;

    /// 箱规下限 (默认 1)
    async fn get_min_units_per_case(&self) -> ConfigResult<f64>;

    /// 推演起始月 (默认 未设置)
    async fn get_start_month(&self) -> ConfigResult<Option<NaiveDate>>;

    // ===== 批次运行 =====

    /// 并发工作数 (默认 未设置 = CPU 并行度)
    async fn get_worker_count(&self) -> ConfigResult<Option<usize>>;

    /// 无效序列是否仍做推演 (默认 false)
    async fn get_simulate_invalid_series(&self) -> ConfigResult<bool>;
}
