// ==========================================
// 需求预测与补货计划系统 - 批次编排器
// ==========================================
// 职责: 逐产品执行 校验 -> 清洗 -> 预测 -> 推演,汇总批次报告
// 并发: 有界工作池 (spawn_blocking + buffered),输出顺序与输入一致
// 红线: 单产品失败不影响其他产品
// ==========================================

use crate::config::PlanningProfile;
use crate::domain::batch::BatchReport;
use crate::domain::product::{Degradation, ProductInput, ProductOutcome, ProductReport};
use crate::domain::series::Series;
use crate::config::ForecastConfig;
use crate::domain::types::{add_months, months_between, FailureCategory};
use crate::engine::forecaster::SeasonalForecaster;
use crate::engine::replenishment::{ReplenishmentSimulator, PROJECTION_MONTHS};
use chrono::NaiveDate;
use crate::engine::series_validator::SeriesValidator;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

// ==========================================
// BatchOrchestrator - 批次编排器
// ==========================================
pub struct BatchOrchestrator {
    profile: Arc<PlanningProfile>,
}

impl BatchOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - profile: 本批次运行配置
    pub fn new(profile: PlanningProfile) -> Self {
        Self {
            profile: Arc::new(profile),
        }
    }

    pub fn profile(&self) -> &PlanningProfile {
        &self.profile
    }

    /// 执行批次
    ///
    /// # 返回
    /// BatchReport (outcomes 与输入顺序一致)
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn run(&self, products: Vec<ProductInput>) -> BatchReport {
        let workers = self.profile.effective_worker_count().max(1);
        info!(products = products.len(), workers, "开始批次运行");

        let outcomes: Vec<ProductOutcome> = stream::iter(products)
            .map(|product| {
                let profile = Arc::clone(&self.profile);
                let product_id = product.product_id.clone();
                let description = product.description.clone();
                async move {
                    match tokio::task::spawn_blocking(move || process_product(&profile, product))
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(join_error) => {
                            error!(product_id = %product_id, error = %join_error, "产品处理线程异常");
                            ProductOutcome::Failed {
                                product_id,
                                description,
                                category: FailureCategory::Simulation,
                                series_valid: None,
                                reason: format!("工作线程异常: {}", join_error),
                            }
                        }
                    }
                }
            })
            .buffered(workers)
            .collect()
            .await;

        let report = BatchReport::new((*self.profile).clone(), outcomes);
        info!(
            run_id = %report.run_id,
            projected = report.summary.projected,
            invalid = report.summary.invalid_series,
            failed = report.summary.failed,
            degraded = report.summary.degraded_forecasts,
            mean_mape = ?report.summary.mean_mape,
            "批次运行完成"
        );
        report
    }
}

/// 单产品处理流程 (同步,在工作线程中执行)
///
/// # 步骤
/// 1. 序列校验 (无效且未开启 simulate_invalid_series 时返回 Invalid)
/// 2. 确定推演起始月
/// 3. 有效序列: 清洗 + 预测 (首个预测月为历史末月的次月)
/// 4. 逐日推演
pub fn process_product(profile: &PlanningProfile, product: ProductInput) -> ProductOutcome {
    let validator = SeriesValidator::new(profile.validation.clone());
    let simulator = ReplenishmentSimulator::new(profile.simulation.clone());

    // 1. 校验
    let mut series = Series::from_history(&product.product_id, &product.description, &product.history);
    let is_valid = validator.validate(&mut series);
    let mut degradations = Vec::new();

    if !is_valid {
        let issue = series.invalid_reason.clone();
        match (profile.simulate_invalid_series, issue) {
            (false, Some(reason)) => {
                return ProductOutcome::Invalid {
                    product_id: product.product_id,
                    description: product.description,
                    reason,
                };
            }
            (_, issue) => degradations.push(Degradation {
                category: FailureCategory::Validation,
                reason: issue.map(|i| i.to_string()).unwrap_or_default(),
            }),
        }
    }

    // 2. 起始月
    let start_month = match simulator.projection_start(&product) {
        Ok(month) => month,
        Err(e) => {
            warn!(product_id = %product.product_id, error = %e, "无法确定推演起始月");
            return ProductOutcome::Failed {
                product_id: product.product_id,
                description: product.description,
                category: FailureCategory::Simulation,
                series_valid: Some(is_valid),
                reason: e.to_string(),
            };
        }
    };

    // 3. 清洗 + 预测
    let (cleaned_series, forecast) = if is_valid {
        let cleaned = validator.clean(&series);
        let forecast_start = cleaned
            .last_month()
            .and_then(|last| add_months(last, 1))
            .unwrap_or(start_month);
        let forecaster = SeasonalForecaster::new(covering_forecast_config(
            &profile.forecast,
            forecast_start,
            start_month,
        ));
        let forecast = forecaster.forecast(&cleaned, forecast_start);
        if forecast.degraded {
            degradations.push(Degradation {
                category: FailureCategory::Forecast,
                reason: forecast.degradation_reason.clone().unwrap_or_default(),
            });
        }
        (cleaned.values, Some(forecast))
    } else {
        (Vec::new(), None)
    };
    let history_fit = forecast
        .as_ref()
        .map(|f| f.historical_comparison(&series.months, &cleaned_series))
        .unwrap_or_default();

    // 4. 推演
    match simulator.simulate(&product, forecast.as_ref(), start_month) {
        Ok(projection) => ProductOutcome::Projected(Box::new(ProductReport {
            product_id: product.product_id,
            description: product.description,
            is_valid,
            invalid_reason: series.invalid_reason,
            cleaned_series,
            forecast,
            history_fit,
            projection,
            degradations,
        })),
        Err(e) => {
            error!(product_id = %product.product_id, error = %e, "库存推演失败");
            ProductOutcome::Failed {
                product_id: product.product_id,
                description: product.description,
                category: FailureCategory::Simulation,
                series_valid: Some(is_valid),
                reason: e.to_string(),
            }
        }
    }
}

/// 预测月数至少覆盖推演窗口
///
/// 推演起始月晚于首个预测月时,延长预测期使六个推演月都有预测值
fn covering_forecast_config(
    config: &ForecastConfig,
    forecast_start: NaiveDate,
    projection_start: NaiveDate,
) -> ForecastConfig {
    let offset = months_between(forecast_start, projection_start);
    let needed = offset.max(0) as usize + PROJECTION_MONTHS as usize;
    ForecastConfig {
        horizon_months: config.horizon_months.max(needed),
        ..config.clone()
    }
}
