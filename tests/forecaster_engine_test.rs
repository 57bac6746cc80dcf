// ==========================================
// SeasonalForecaster 引擎集成测试
// ==========================================
// 测试目标: 验证季节类型判定、预测长度/非负、降级兜底
// 覆盖范围: 加法/乘法模型, 配置预测月数, 非有限输入
// ==========================================

mod helpers;

use helpers::test_data_builder::{growing_multiplicative_values, month, seasonal_values};
use replenishment_aps::config::ForecastConfig;
use replenishment_aps::domain::{SeasonalType, Series, SmoothingParameters};
use replenishment_aps::engine::{determine_seasonality, fit, SeasonalForecaster};

fn create_test_series(values: Vec<f64>) -> Series {
    let months = (0..values.len())
        .map(|i| month(2022 + (i / 12) as i32, (i % 12) as u32 + 1))
        .collect();
    Series::new("P-FC", "预测测试", values, months)
}

#[test]
fn test_additive_forecast_shape() {
    let forecaster = SeasonalForecaster::default();
    let series = create_test_series(seasonal_values(36, 200.0, 40.0));
    let result = forecaster.forecast(&series, month(2025, 1));

    assert!(!result.degraded);
    assert_eq!(result.params.seasonal_type, SeasonalType::Additive);
    assert_eq!(result.forecasts.len(), 6);
    assert_eq!(result.fitted.len(), 36);
    assert_eq!(result.level.len(), 36);
    assert_eq!(result.trend.len(), 36);
    assert_eq!(result.seasonal.len(), 36);
    assert!(result.values().iter().all(|v| *v >= 0.0 && v.is_finite()));
    assert!(result.metrics.mape < 100.0);
}

#[test]
fn test_multiplicative_selected_for_growing_amplitude() {
    let forecaster = SeasonalForecaster::default();
    let series = create_test_series(growing_multiplicative_values(3));
    let result = forecaster.forecast(&series, month(2025, 1));

    assert_eq!(result.params.seasonal_type, SeasonalType::Multiplicative);
    assert!(!result.degraded);
    assert!(result.values().iter().all(|v| *v >= 0.0));
}

#[test]
fn test_flat_series_selects_additive() {
    assert_eq!(determine_seasonality(&[120.0; 36]), SeasonalType::Additive);
    assert_eq!(
        determine_seasonality(&growing_multiplicative_values(3)),
        SeasonalType::Multiplicative
    );
}

#[test]
fn test_forecast_is_deterministic() {
    let forecaster = SeasonalForecaster::default();
    let series = create_test_series(seasonal_values(30, 80.0, 15.0));
    let a = forecaster.forecast(&series, month(2024, 7));
    let b = forecaster.forecast(&series, month(2024, 7));
    assert_eq!(a, b);
}

#[test]
fn test_configured_horizon() {
    let forecaster = SeasonalForecaster::new(ForecastConfig {
        horizon_months: 9,
        ..ForecastConfig::default()
    });
    let series = create_test_series(seasonal_values(24, 80.0, 15.0));
    let result = forecaster.forecast(&series, month(2024, 1));

    assert_eq!(result.forecasts.len(), 9);
    assert_eq!(result.forecasts[8].label, "2024-09");
}

#[test]
fn test_non_finite_input_degrades() {
    let forecaster = SeasonalForecaster::default();
    let mut values = seasonal_values(24, 80.0, 15.0);
    values[5] = f64::NAN;
    let result = forecaster.forecast(&create_test_series(values.clone()), month(2024, 1));

    assert!(result.degraded);
    assert!(result.degradation_reason.is_some());
    let positives: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    let expected = positives.iter().sum::<f64>() / positives.len() as f64;
    assert!(result.values().iter().all(|v| (v - expected).abs() < 1e-9));
    assert_eq!(result.metrics.mape, 0.0);
}

#[test]
fn test_all_zero_fallback_is_zero() {
    let forecaster = SeasonalForecaster::default();
    let result = forecaster.forecast(&create_test_series(vec![0.0; 4]), month(2024, 1));
    assert!(result.degraded);
    assert_eq!(result.values(), vec![0.0; 6]);
}

#[test]
fn test_multiplicative_zero_level_uses_unit_seasonals() {
    let params = SmoothingParameters::new(0.3, 0.1, 0.2, SeasonalType::Multiplicative);
    let mut data = vec![0.0; 12];
    data.extend(seasonal_values(12, 30.0, 5.0));
    let model = fit(&data, &params).unwrap();

    assert!(model.seasonal[..1].iter().all(|s| *s == 1.0));
    assert!(model.fitted.iter().all(|v| v.is_finite()));
}

#[test]
fn test_history_comparison_aligns_with_months() {
    let forecaster = SeasonalForecaster::default();
    let series = create_test_series(seasonal_values(24, 80.0, 15.0));
    let result = forecaster.forecast(&series, month(2024, 1));
    let rows = result.historical_comparison(&series.months, &series.values);

    assert_eq!(rows.len(), 24);
    assert_eq!(rows[0].month, month(2022, 1));
    assert_eq!(rows[23].fitted, result.fitted[23]);
}
