// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置文件加载、类型化配置构建与范围校验
// ==========================================

use replenishment_aps::config::{
    config_keys, ConfigError, ConfigManager, PlanningConfigReader, PlanningProfile,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[tokio::test]
async fn test_profile_from_config_file() {
    let file = write_config(
        r#"{
            "min_periods": 18,
            "smoothing_alpha": 0.4,
            "optimize_parameters": true,
            "service_level_pct": 95,
            "lead_time_days": 14,
            "consumption_days_per_month": 30,
            "start_month": "2025-07",
            "worker_count": 4,
            "simulate_invalid_series": true
        }"#,
    );
    let manager = ConfigManager::from_json_file(file.path()).unwrap();
    let profile = PlanningProfile::from_reader(&manager).await.unwrap();

    assert_eq!(profile.validation.min_periods, 18);
    assert_eq!(profile.validation.max_zero_fraction, 0.5);
    assert_eq!(profile.forecast.alpha, 0.4);
    assert_eq!(profile.forecast.beta, 0.1);
    assert!(profile.forecast.optimize_parameters);
    assert_eq!(profile.simulation.service_level_pct, 95.0);
    assert_eq!(profile.simulation.lead_time_days, 14);
    assert_eq!(profile.simulation.consumption_days(), 30);
    assert_eq!(
        profile.simulation.start_month,
        chrono::NaiveDate::from_ymd_opt(2025, 7, 1)
    );
    assert_eq!(profile.effective_worker_count(), 4);
    assert!(profile.simulate_invalid_series);
}

#[tokio::test]
async fn test_empty_config_matches_defaults() {
    let file = write_config("{}");
    let manager = ConfigManager::from_json_file(file.path()).unwrap();
    let profile = PlanningProfile::from_reader(&manager).await.unwrap();
    assert_eq!(profile, PlanningProfile::default());
}

#[tokio::test]
async fn test_out_of_range_service_level_is_rejected() {
    let file = write_config(r#"{"service_level_pct": 100}"#);
    let manager = ConfigManager::from_json_file(file.path()).unwrap();
    let err = PlanningProfile::from_reader(&manager).await.unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == config_keys::SERVICE_LEVEL_PCT));
}

#[tokio::test]
async fn test_unparseable_value_is_rejected() {
    let manager = ConfigManager::new();
    manager
        .set_config_value(config_keys::OPERATIONAL_DAYS_PER_MONTH, "twenty")
        .unwrap();
    assert!(matches!(
        manager.get_operational_days_per_month().await,
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_missing_file_is_reported() {
    let err = ConfigManager::from_json_file("/nonexistent/planning.json").unwrap_err();
    assert!(matches!(err, ConfigError::FileRead { .. }));
}

#[test]
fn test_malformed_json_is_reported() {
    let file = write_config("[1, 2, 3]");
    let err = ConfigManager::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[tokio::test]
async fn test_snapshot_restore_between_managers() {
    let file = write_config(r#"{"lead_time_days": 9, "min_units_per_case": 3}"#);
    let source = ConfigManager::from_json_file(file.path()).unwrap();
    let snapshot = source.get_config_snapshot().unwrap();

    let target = ConfigManager::new();
    assert_eq!(target.restore_config_from_snapshot(&snapshot).unwrap(), 2);
    assert_eq!(target.get_lead_time_days().await.unwrap(), 9);
    assert_eq!(target.get_min_units_per_case().await.unwrap(), 3.0);
}
