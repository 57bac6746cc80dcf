// ==========================================
// 需求预测与补货计划系统 - 批量运行报告
// ==========================================
// 职责: 汇总单产品结果,生成批次统计
// ==========================================

use crate::config::PlanningProfile;
use crate::domain::product::ProductOutcome;
use crate::domain::types::SeasonalType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 参与平均 MAPE 统计的上限 (%)
pub const MAPE_REPORTING_CEILING: f64 = 100.0;

/// 准确率目标: 平均 MAPE <= 10%
pub const MAPE_ACCURACY_TARGET: f64 = 10.0;

// ==========================================
// BatchSummary - 批次统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_products: usize,
    pub valid_series: usize,
    pub invalid_series: usize,
    pub projected: usize,
    pub failed: usize,
    pub degraded_forecasts: usize,
    pub mean_mape: Option<f64>, // 统计 MAPE < 100 的预测 (降级预测计 0)
    pub accuracy_target_met: bool,
    pub additive_models: usize,
    pub multiplicative_models: usize,
}

impl BatchSummary {
    /// 按结果列表统计
    pub fn from_outcomes(outcomes: &[ProductOutcome]) -> Self {
        let mut summary = BatchSummary {
            total_products: outcomes.len(),
            ..Default::default()
        };
        let mut mapes = Vec::new();

        for outcome in outcomes {
            match outcome {
                ProductOutcome::Projected(report) => {
                    summary.projected += 1;
                    if report.is_valid {
                        summary.valid_series += 1;
                    } else {
                        summary.invalid_series += 1;
                    }
                    if let Some(forecast) = &report.forecast {
                        if forecast.degraded {
                            summary.degraded_forecasts += 1;
                        }
                        if forecast.metrics.mape < MAPE_REPORTING_CEILING {
                            mapes.push(forecast.metrics.mape);
                        }
                        match forecast.params.seasonal_type {
                            SeasonalType::Additive => summary.additive_models += 1,
                            SeasonalType::Multiplicative => summary.multiplicative_models += 1,
                        }
                    }
                }
                ProductOutcome::Invalid { .. } => summary.invalid_series += 1,
                ProductOutcome::Failed { series_valid, .. } => {
                    summary.failed += 1;
                    match series_valid {
                        Some(true) => summary.valid_series += 1,
                        Some(false) => summary.invalid_series += 1,
                        None => {}
                    }
                }
            }
        }

        if !mapes.is_empty() {
            let mean = mapes.iter().sum::<f64>() / mapes.len() as f64;
            summary.mean_mape = Some(mean);
            summary.accuracy_target_met = mean <= MAPE_ACCURACY_TARGET;
        }

        summary
    }
}

// ==========================================
// BatchReport - 批次报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: PlanningProfile, // 本次运行配置快照
    pub summary: BatchSummary,
    pub outcomes: Vec<ProductOutcome>, // 与输入顺序一致
}

impl BatchReport {
    pub fn new(profile: PlanningProfile, outcomes: Vec<ProductOutcome>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile,
            summary: BatchSummary::from_outcomes(&outcomes),
            outcomes,
        }
    }
}
