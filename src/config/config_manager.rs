// ==========================================
// 需求预测与补货计划系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、快照与恢复
// 存储: JSON 键值文件 (key -> 标量值)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::planning_config_trait::PlanningConfigReader;
use crate::domain::types::first_of_month;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl ConfigManager {
    /// 创建空配置 (全部使用默认值)
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径,内容为 {"key": 标量值} 对象
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "配置文件已加载");
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(raw)?;
        let mut values = HashMap::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            values.insert(key, text);
        }
        debug!(count = values.len(), "配置项解析完成");
        Ok(Self {
            values: Arc::new(RwLock::new(values)),
        })
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockPoisoned(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    /// 写入配置值 (覆盖)
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| ConfigError::LockPoisoned(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 读取配置值,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 解析配置值,缺省时解析默认值
    fn parse_or_default<T>(&self, key: &str, default: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.get_config_or_default(key, default)?;
        parse_value(key, &value)
    }

    /// 解析可选配置值 (缺省或空字符串 -> None)
    fn parse_optional<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get_config_value(key)? {
            Some(value) if !value.trim().is_empty() => parse_value(key, &value).map(Some),
            _ => Ok(None),
        }
    }

    /// 获取所有配置的快照 (JSON, 按键排序)
    ///
    /// # 用途
    /// - 随批次报告记录运行配置
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockPoisoned(e.to_string()))?;
        let ordered: BTreeMap<&String, &String> = values.iter().collect();
        Ok(serde_json::to_string(&ordered)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名配置
    /// - 以 "__meta_" 开头的元信息键不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let snapshot: HashMap<String, String> = serde_json::from_str(snapshot_json)?;
        let mut values = self
            .values
            .write()
            .map_err(|e| ConfigError::LockPoisoned(e.to_string()))?;

        let mut count = 0;
        for (key, value) in snapshot {
            if key.starts_with("__meta_") {
                continue;
            }
            values.insert(key, value);
            count += 1;
        }
        Ok(count)
    }
}

/// 解析单个配置值
fn parse_value<T>(key: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// 解析月份 (YYYY-MM 或 YYYY-MM-DD),归一到当月 1 日
fn parse_month(key: &str, value: &str) -> ConfigResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d"))
        .map(first_of_month)
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: format!("期望 YYYY-MM: {}", e),
        })
}

// ==========================================
// 实现 PlanningConfigReader Trait
// ==========================================
#[async_trait]
impl PlanningConfigReader for ConfigManager {
    async fn get_min_periods(&self) -> ConfigResult<usize> {
        self.parse_or_default(config_keys::MIN_PERIODS, "12")
    }

    async fn get_max_zero_fraction(&self) -> ConfigResult<f64> {
        self.parse_or_default(config_keys::MAX_ZERO_FRACTION, "0.5")
    }

    async fn get_outlier_multiplier(&self) -> ConfigResult<f64> {
        self.parse_or_default(config_keys::OUTLIER_MULTIPLIER, "1.5")
    }

    async fn get_smoothing_alpha(&self) -> ConfigResult<f64> {
        self.parse_or_default(config_keys::SMOOTHING_ALPHA, "0.3")
    }

    async fn get_smoothing_beta(&self) -> ConfigResult<f64> {
        self.parse_or_default(config_keys::SMOOTHING_BETA, "0.1")
    }

    async fn get_smoothing_gamma(&self) -> ConfigResult<f64> {
        self.parse_or_default(config_keys::SMOOTHING_GAMMA, "0.2")
    }

    async fn get_forecast_horizon_months(&self) -> ConfigResult<usize> {
        self.parse_or_default(config_keys::FORECAST_HORIZON_MONTHS, "6")
    }

    async fn get_optimize_parameters(&self) -> ConfigResult<bool> {
        self.parse_or_default(config_keys::OPTIMIZE_PARAMETERS, "false")
    }

    async fn get_service_level_pct(&self) -> ConfigResult<f64> {
        self.parse_or_default(config_keys::SERVICE_LEVEL_PCT, "99.99")
    }

    async fn get_safety_stock_override(&self) -> ConfigResult<Option<f64>> {
        self.parse_optional(config_keys::SAFETY_STOCK_OVERRIDE)
    }

    async fn get_lead_time_days(&self) -> ConfigResult<u32> {
        self.parse_or_default(config_keys::LEAD_TIME_DAYS, "20")
    }

    async fn get_operational_days_per_month(&self) -> ConfigResult<u32> {
        self.parse_or_default(config_keys::OPERATIONAL_DAYS_PER_MONTH, "22")
    }

    async fn get_consumption_days_per_month(&self) -> ConfigResult<Option<u32>> {
        self.parse_optional(config_keys::CONSUMPTION_DAYS_PER_MONTH)
    }

    async fn get_min_units_per_case(&self) -> ConfigResult<f64> {
        self.parse_or_default(config_keys::MIN_UNITS_PER_CASE, "1")
    }

    async fn get_start_month(&self) -> ConfigResult<Option<NaiveDate>> {
        match self.get_config_value(config_keys::START_MONTH)? {
            Some(value) if !value.trim().is_empty() => {
                parse_month(config_keys::START_MONTH, &value).map(Some)
            }
            _ => Ok(None),
        }
    }

    async fn get_worker_count(&self) -> ConfigResult<Option<usize>> {
        self.parse_optional(config_keys::WORKER_COUNT)
    }

    async fn get_simulate_invalid_series(&self) -> ConfigResult<bool> {
        self.parse_or_default(config_keys::SIMULATE_INVALID_SERIES, "false")
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 序列校验
    pub const MIN_PERIODS: &str = "min_periods";
    pub const MAX_ZERO_FRACTION: &str = "max_zero_fraction";
    pub const OUTLIER_MULTIPLIER: &str = "outlier_multiplier";

    // 预测
    pub const SMOOTHING_ALPHA: &str = "smoothing_alpha";
    pub const SMOOTHING_BETA: &str = "smoothing_beta";
    pub const SMOOTHING_GAMMA: &str = "smoothing_gamma";
    pub const FORECAST_HORIZON_MONTHS: &str = "forecast_horizon_months";
    pub const OPTIMIZE_PARAMETERS: &str = "optimize_parameters";

    // 库存模拟
    pub const SERVICE_LEVEL_PCT: &str = "service_level_pct";
    pub const SAFETY_STOCK_OVERRIDE: &str = "safety_stock_override";
    pub const LEAD_TIME_DAYS: &str = "lead_time_days";
    pub const OPERATIONAL_DAYS_PER_MONTH: &str = "operational_days_per_month";
    pub const CONSUMPTION_DAYS_PER_MONTH: &str = "consumption_days_per_month";
    pub const MIN_UNITS_PER_CASE: &str = "min_units_per_case";
    pub const START_MONTH: &str = "start_month"; // YYYY-MM

    // 批次运行
    pub const WORKER_COUNT: &str = "worker_count";
    pub const SIMULATE_INVALID_SERIES: &str = "simulate_invalid_series";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let manager = ConfigManager::new();
        assert_eq!(manager.get_min_periods().await.unwrap(), 12);
        assert_eq!(manager.get_service_level_pct().await.unwrap(), 99.99);
        assert_eq!(manager.get_safety_stock_override().await.unwrap(), None);
        assert_eq!(manager.get_start_month().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scalar_values_are_parsed() {
        let manager = ConfigManager::from_json_str(
            r#"{"lead_time_days": 15, "optimize_parameters": true, "start_month": "2025-03", "worker_count": null}"#,
        )
        .unwrap();
        assert_eq!(manager.get_lead_time_days().await.unwrap(), 15);
        assert!(manager.get_optimize_parameters().await.unwrap());
        assert_eq!(
            manager.get_start_month().await.unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(manager.get_worker_count().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_value_is_reported() {
        let manager = ConfigManager::new();
        manager
            .set_config_value(config_keys::LEAD_TIME_DAYS, "abc")
            .unwrap();
        let err = manager.get_lead_time_days().await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_snapshot_round_trip_skips_meta_keys() {
        let manager = ConfigManager::new();
        manager.set_config_value(config_keys::MIN_PERIODS, "24").unwrap();
        let snapshot = manager.get_config_snapshot().unwrap();

        let restored = ConfigManager::new();
        let count = restored.restore_config_from_snapshot(&snapshot).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            restored.get_config_value(config_keys::MIN_PERIODS).unwrap(),
            Some("24".to_string())
        );

        let count = restored
            .restore_config_from_snapshot(r#"{"__meta_run_name": "x", "lead_time_days": "5"}"#)
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(restored.get_config_value("__meta_run_name").unwrap(), None);
    }
}
