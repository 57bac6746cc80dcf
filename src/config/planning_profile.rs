// ==========================================
// 需求预测与补货计划系统 - 计划配置
// ==========================================
// 职责: 校验阈值、预测参数、模拟参数的类型化配置
// 红线: 所有组件显式接收配置,不读全局状态
// ==========================================

use crate::config::config_manager::config_keys;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::planning_config_trait::PlanningConfigReader;
use crate::domain::product::ProductInput;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ValidationThresholds - 序列校验阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    pub min_periods: usize,       // 最少期数
    pub max_zero_fraction: f64,   // 最大零值比例
    pub outlier_multiplier: f64,  // IQR 异常值倍数
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_periods: 12,
            max_zero_fraction: 0.5,
            outlier_multiplier: 1.5,
        }
    }
}

// ==========================================
// ForecastConfig - 预测配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub horizon_months: usize,     // 预测月数
    pub optimize_parameters: bool, // 是否启用参数寻优
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.2,
            horizon_months: 6,
            optimize_parameters: false,
        }
    }
}

// ==========================================
// SimulationConfig - 库存模拟配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub service_level_pct: f64,                 // 服务水平 (%)
    pub safety_stock_override: Option<f64>,     // 人工安全库存
    pub lead_time_days: u32,                    // 补货提前期 (天)
    pub operational_days_per_month: u32,        // 每月运营天数
    pub consumption_days_per_month: Option<u32>, // 月消耗折算天数 (默认 = 运营天数)
    pub min_units_per_case: f64,                // 箱规下限
    pub start_month: Option<NaiveDate>,         // 推演起始月 (默认历史末月次月)
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            service_level_pct: 99.99,
            safety_stock_override: None,
            lead_time_days: 20,
            operational_days_per_month: 22,
            consumption_days_per_month: None,
            min_units_per_case: 1.0,
            start_month: None,
        }
    }
}

impl SimulationConfig {
    /// 月消耗折算天数
    pub fn consumption_days(&self) -> u32 {
        self.consumption_days_per_month
            .unwrap_or(self.operational_days_per_month)
    }

    /// 合并单产品覆写 (提前期、人工安全库存)
    pub fn for_product(&self, product: &ProductInput) -> Self {
        Self {
            lead_time_days: product.lead_time_days.unwrap_or(self.lead_time_days),
            safety_stock_override: product.safety_stock.or(self.safety_stock_override),
            ..self.clone()
        }
    }

    /// 取值范围校验
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.service_level_pct > 0.0 && self.service_level_pct < 100.0) {
            return Err(ConfigError::out_of_range(
                config_keys::SERVICE_LEVEL_PCT,
                self.service_level_pct,
                "(0, 100)",
            ));
        }
        if let Some(ss) = self.safety_stock_override {
            if !(ss.is_finite() && ss >= 0.0) {
                return Err(ConfigError::out_of_range(
                    config_keys::SAFETY_STOCK_OVERRIDE,
                    ss,
                    ">= 0",
                ));
            }
        }
        if self.operational_days_per_month == 0 {
            return Err(ConfigError::out_of_range(
                config_keys::OPERATIONAL_DAYS_PER_MONTH,
                0,
                ">= 1",
            ));
        }
        if self.consumption_days_per_month == Some(0) {
            return Err(ConfigError::out_of_range(
                config_keys::CONSUMPTION_DAYS_PER_MONTH,
                0,
                ">= 1",
            ));
        }
        if !(self.min_units_per_case.is_finite() && self.min_units_per_case >= 0.0) {
            return Err(ConfigError::out_of_range(
                config_keys::MIN_UNITS_PER_CASE,
                self.min_units_per_case,
                ">= 0",
            ));
        }
        Ok(())
    }
}

// ==========================================
// PlanningProfile - 批次运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningProfile {
    pub validation: ValidationThresholds,
    pub forecast: ForecastConfig,
    pub simulation: SimulationConfig,
    pub worker_count: Option<usize>,      // 并发工作数 (默认 = CPU 并行度)
    pub simulate_invalid_series: bool,    // 无效序列是否仍做推演
}

impl PlanningProfile {
    /// 从配置读取器构建
    ///
    /// 缺省项使用默认值,构建后执行范围校验
    pub async fn from_reader(reader: &dyn PlanningConfigReader) -> ConfigResult<Self> {
        let profile = Self {
            validation: ValidationThresholds {
                min_periods: reader.get_min_periods().await?,
                max_zero_fraction: reader.get_max_zero_fraction().await?,
                outlier_multiplier: reader.get_outlier_multiplier().await?,
            },
            forecast: ForecastConfig {
                alpha: reader.get_smoothing_alpha().await?,
                beta: reader.get_smoothing_beta().await?,
                gamma: reader.get_smoothing_gamma().await?,
                horizon_months: reader.get_forecast_horizon_months().await?,
                optimize_parameters: reader.get_optimize_parameters().await?,
            },
            simulation: SimulationConfig {
                service_level_pct: reader.get_service_level_pct().await?,
                safety_stock_override: reader.get_safety_stock_override().await?,
                lead_time_days: reader.get_lead_time_days().await?,
                operational_days_per_month: reader.get_operational_days_per_month().await?,
                consumption_days_per_month: reader.get_consumption_days_per_month().await?,
                min_units_per_case: reader.get_min_units_per_case().await?,
                start_month: reader.get_start_month().await?,
            },
            worker_count: reader.get_worker_count().await?,
            simulate_invalid_series: reader.get_simulate_invalid_series().await?,
        };

        profile.validate()?;
        Ok(profile)
    }

    /// 实际并发工作数
    pub fn effective_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// 全量范围校验
    pub fn validate(&self) -> ConfigResult<()> {
        let v = &self.validation;
        if !(0.0..=1.0).contains(&v.max_zero_fraction) {
            return Err(ConfigError::out_of_range(
                config_keys::MAX_ZERO_FRACTION,
                v.max_zero_fraction,
                "[0, 1]",
            ));
        }
        if !(v.outlier_multiplier.is_finite() && v.outlier_multiplier > 0.0) {
            return Err(ConfigError::out_of_range(
                config_keys::OUTLIER_MULTIPLIER,
                v.outlier_multiplier,
                "> 0",
            ));
        }

        let f = &self.forecast;
        for (key, value) in [
            (config_keys::SMOOTHING_ALPHA, f.alpha),
            (config_keys::SMOOTHING_BETA, f.beta),
            (config_keys::SMOOTHING_GAMMA, f.gamma),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::out_of_range(key, value, "(0, 1)"));
            }
        }
        if f.horizon_months == 0 {
            return Err(ConfigError::out_of_range(
                config_keys::FORECAST_HORIZON_MONTHS,
                0,
                ">= 1",
            ));
        }

        self.simulation.validate()?;

        if self.worker_count == Some(0) {
            return Err(ConfigError::out_of_range(config_keys::WORKER_COUNT, 0, ">= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let profile = PlanningProfile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.validation.min_periods, 12);
        assert_eq!(profile.simulation.lead_time_days, 20);
        assert_eq!(profile.simulation.consumption_days(), 22);
        assert!(!profile.forecast.optimize_parameters);
    }

    #[test]
    fn test_service_level_must_be_open_interval() {
        let mut profile = PlanningProfile::default();
        profile.simulation.service_level_pct = 100.0;
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));

        profile.simulation.service_level_pct = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_coefficients_must_be_open_interval() {
        let mut profile = PlanningProfile::default();
        profile.forecast.gamma = 1.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let profile: PlanningProfile =
            serde_json::from_str(r#"{"simulation": {"lead_time_days": 10}}"#).unwrap();
        assert_eq!(profile.simulation.lead_time_days, 10);
        assert_eq!(profile.simulation.operational_days_per_month, 22);
        assert_eq!(profile.forecast.alpha, 0.3);
    }

    #[test]
    fn test_product_overrides() {
        let config = SimulationConfig::default();
        let product = ProductInput {
            product_id: "P1".to_string(),
            description: String::new(),
            history: vec![],
            stock_on_hand: 0.0,
            units_in_transit: 0.0,
            case_size: 1.0,
            lead_time_days: Some(7),
            safety_stock: Some(15.0),
        };
        let merged = config.for_product(&product);
        assert_eq!(merged.lead_time_days, 7);
        assert_eq!(merged.safety_stock_override, Some(15.0));
        assert_eq!(merged.service_level_pct, 99.99);
    }
}
