// ==========================================
// 需求预测与补货计划系统 - 补货模拟引擎
// ==========================================
// 职责: 计算安全库存/再订货点,逐日推演六个月库存与补货
// 输入: 产品输入 + 预测结果(可选) + SimulationConfig
// 输出: ProductProjection
// 红线: 库存不为负; 订货量为箱规整数倍; 月初库存 = 上月期末
// ==========================================

use crate::config::SimulationConfig;
use crate::domain::forecast::ForecastResult;
use crate::domain::product::ProductInput;
use crate::domain::projection::{
    DayState, InventoryPolicy, MonthProjection, OpeningRecommendation, ProductProjection,
    ReorderAlert,
};
use crate::domain::types::{
    add_months, first_of_month, last_day_of_month, month_label, RiskTier, SafetyStockSource,
};
use crate::engine::error::{SimulationError, SimulationResult};
use crate::engine::order_queue::PendingOrderQueue;
use crate::engine::stats;
use chrono::{Datelike, Days, NaiveDate};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, instrument};

/// 推演月数
pub const PROJECTION_MONTHS: u32 = 6;

// ==========================================
// ReplenishmentSimulator - 补货模拟引擎
// ==========================================
pub struct ReplenishmentSimulator {
    config: SimulationConfig,
}

impl ReplenishmentSimulator {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 批次级模拟配置 (单产品覆写在推演时合并)
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// 推演起始月
    ///
    /// 优先使用配置的 start_month,否则取历史末月的次月
    pub fn projection_start(&self, product: &ProductInput) -> SimulationResult<NaiveDate> {
        if let Some(month) = self.config.start_month {
            return Ok(first_of_month(month));
        }
        let last = product
            .history
            .last()
            .map(|p| p.month)
            .ok_or_else(|| SimulationError::MissingStartMonth {
                product_id: product.product_id.clone(),
            })?;
        add_months(last, 1).ok_or_else(|| SimulationError::DateOverflow {
            base: last,
            offset: "1 月".to_string(),
        })
    }

    // ==========================================
    // 策略参数
    // ==========================================

    /// 基于原始历史计算补货策略参数
    ///
    /// # 说明
    /// - 平均月消耗为负时按 0 处理
    /// - 计算得到的安全库存下限为 0
    pub fn derive_policy(&self, product: &ProductInput) -> SimulationResult<InventoryPolicy> {
        let config = self.config.for_product(product);
        config
            .validate()
            .map_err(|e| SimulationError::InvalidConfig(e.to_string()))?;

        let values: Vec<f64> = product.history.iter().map(|p| p.value).collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::NonFiniteHistory {
                product_id: product.product_id.clone(),
            });
        }

        let operational_days = f64::from(config.operational_days_per_month);
        let lead_time = f64::from(config.lead_time_days);

        let average = stats::mean(&values).max(0.0);
        let daily = average / operational_days;
        let lead_time_consumption = daily * lead_time;
        let daily_std_dev = stats::sample_std_dev(&values) / operational_days.sqrt();
        let lead_time_std_dev = daily_std_dev * lead_time.sqrt();

        let (safety_stock, safety_stock_source, service_level_z) =
            match config.safety_stock_override {
                Some(manual) => (manual, SafetyStockSource::Manual, None),
                None => {
                    let z = service_level_z(config.service_level_pct)?;
                    (
                        (z * lead_time_std_dev).max(0.0),
                        SafetyStockSource::Computed,
                        Some(z),
                    )
                }
            };

        Ok(InventoryPolicy {
            lead_time_days: config.lead_time_days,
            operational_days_per_month: config.operational_days_per_month,
            consumption_days_per_month: config.consumption_days(),
            service_level_pct: config.service_level_pct,
            effective_case_size: effective_case_size(product.case_size, config.min_units_per_case),
            average_monthly_consumption: average,
            daily_consumption: daily,
            lead_time_consumption,
            daily_std_dev,
            lead_time_std_dev,
            service_level_z,
            safety_stock,
            safety_stock_source,
            reorder_point: lead_time_consumption + safety_stock,
            minimum_stock: average + safety_stock,
        })
    }

    /// 期初补货建议
    pub fn opening_recommendation(
        policy: &InventoryPolicy,
        stock_on_hand: f64,
    ) -> OpeningRecommendation {
        let stock = stock_on_hand.max(0.0);
        let case = policy.effective_case_size;
        let deficit = (policy.reorder_point - stock).max(0.0);
        let cases = (deficit / case).ceil();
        let daily = policy.daily_consumption;

        OpeningRecommendation {
            deficit,
            cases: cases as i64,
            units: cases * case,
            coverage_days: if daily > 0.0 { stock / daily } else { 0.0 },
            replenishment_frequency_days: if daily > 0.0 {
                policy.reorder_point / daily
            } else {
                0.0
            },
            alternative_projected_stock: (stock - policy.lead_time_consumption).max(0.0),
        }
    }

    // ==========================================
    // 逐日推演
    // ==========================================

    /// 六个月逐日推演
    ///
    /// # 参数
    /// - `product`: 产品输入
    /// - `forecast`: 预测结果 (无效序列时为 None)
    /// - `start_month`: 推演起始月
    ///
    /// # 每日步骤
    /// 1. 到货入库
    /// 2. 扣减当日消耗 (不低于 0)
    /// 3. 在库 + 在途 <= 再订货点时按箱规下单,再订货点随当月日消耗更新
    /// 4. 记录下单后的当日状态
    #[instrument(skip(self, product, forecast), fields(product_id = %product.product_id, start = %start_month))]
    pub fn simulate(
        &self,
        product: &ProductInput,
        forecast: Option<&ForecastResult>,
        start_month: NaiveDate,
    ) -> SimulationResult<ProductProjection> {
        let config = self.config.for_product(product);
        let policy = self.derive_policy(product)?;
        let opening = Self::opening_recommendation(&policy, product.stock_on_hand);

        let consumption_days = f64::from(config.consumption_days());
        let lead_days = config.lead_time_days;
        let lead_time = f64::from(lead_days);
        let case = policy.effective_case_size;
        let safety_stock = policy.safety_stock;
        let start_month = first_of_month(start_month);

        let mut queue = PendingOrderQueue::new();
        let mut on_hand = product.stock_on_hand.max(0.0);
        let mut reorder_point = policy.reorder_point;
        let mut months = Vec::with_capacity(PROJECTION_MONTHS as usize);

        for offset in 0..PROJECTION_MONTHS {
            let month = add_months(start_month, offset).ok_or_else(|| {
                SimulationError::DateOverflow {
                    base: start_month,
                    offset: format!("{} 月", offset),
                }
            })?;
            let end_date = last_day_of_month(month).ok_or(SimulationError::DateOverflow {
                base: month,
                offset: "月末".to_string(),
            })?;

            let (monthly_consumption, forecast_used) =
                self.monthly_consumption(month, product, forecast, &policy);
            let daily = monthly_consumption / consumption_days;
            let opening_stock = on_hand;
            let mut days = Vec::with_capacity(31);
            let mut alerts = Vec::new();

            for date in month.iter_days().take_while(|d| *d <= end_date) {
                let received: f64 = queue.receive_due(date).iter().map(|o| o.quantity).sum();
                on_hand = (on_hand + received - daily).max(0.0);
                let total = on_hand + queue.total_quantity();

                if total <= reorder_point {
                    let lead_time_consumption = daily * lead_time;
                    let new_reorder_point = lead_time_consumption + safety_stock;
                    let deficit = new_reorder_point - total + lead_time_consumption;
                    let cases = (deficit / case).ceil();
                    let units = cases * case;

                    if units > 0.0 {
                        let arrival_date = date
                            .checked_add_days(Days::new(u64::from(lead_days)))
                            .ok_or(SimulationError::DateOverflow {
                                base: date,
                                offset: format!("{} 天", lead_days),
                            })?;
                        queue.push(date, arrival_date, units);
                        alerts.push(ReorderAlert {
                            trigger_date: date,
                            arrival_date,
                            units,
                            cases: cases as i64,
                            lead_time_days: lead_days,
                        });
                        debug!(
                            product_id = %product.product_id,
                            date = %date,
                            total,
                            reorder_point,
                            units,
                            "触发补货"
                        );
                    }
                    reorder_point = new_reorder_point;
                }

                let in_transit = queue.total_quantity();
                let total_projected = on_hand + in_transit;
                if !total_projected.is_finite() {
                    return Err(SimulationError::NonFiniteState {
                        date,
                        field: "total_projected".to_string(),
                    });
                }
                days.push(DayState {
                    date,
                    on_hand,
                    in_transit,
                    total_projected,
                });
            }

            let closing_stock = on_hand;
            let in_transit = queue.total_quantity();
            months.push(MonthProjection {
                month,
                label: month_label(month),
                start_date: month,
                end_date,
                opening_stock,
                closing_stock,
                in_transit,
                total_projected: closing_stock + in_transit,
                monthly_consumption,
                daily_consumption: daily,
                forecast_used,
                reorder_point,
                safety_stock,
                safety_stock_source: policy.safety_stock_source,
                minimum_stock: policy.minimum_stock,
                coverage_days: if daily > 0.0 { closing_stock / daily } else { 0.0 },
                risk_tier: RiskTier::classify(closing_stock, safety_stock, reorder_point),
                days,
                alerts,
            });
        }

        debug!(
            product_id = %product.product_id,
            alerts = months.iter().map(|m| m.alerts.len()).sum::<usize>(),
            pending = queue.len(),
            "推演完成"
        );

        Ok(ProductProjection {
            product_id: product.product_id.clone(),
            description: product.description.clone(),
            stock_on_hand: product.stock_on_hand,
            units_in_transit: product.units_in_transit,
            start_month,
            policy,
            opening,
            months,
            pending_orders: queue.orders(),
        })
    }

    /// 当月消耗量
    ///
    /// 优先使用当月非零预测;否则取历史同月正值均值;再否则取整体平均
    ///
    /// # 返回
    /// (月消耗, 是否使用预测)
    fn monthly_consumption(
        &self,
        month: NaiveDate,
        product: &ProductInput,
        forecast: Option<&ForecastResult>,
        policy: &InventoryPolicy,
    ) -> (f64, bool) {
        if let Some(value) = forecast
            .and_then(|f| f.value_for(month))
            .filter(|v| *v != 0.0 && v.is_finite())
        {
            return (value.max(0.0), true);
        }

        let same_month: Vec<f64> = product
            .history
            .iter()
            .filter(|p| p.month.month() == month.month() && p.value > 0.0)
            .map(|p| p.value)
            .collect();
        if !same_month.is_empty() {
            return (stats::mean(&same_month), false);
        }

        (policy.average_monthly_consumption, false)
    }
}

impl Default for ReplenishmentSimulator {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

/// 服务水平对应的标准正态分位数
pub fn service_level_z(service_level_pct: f64) -> SimulationResult<f64> {
    if !(service_level_pct > 0.0 && service_level_pct < 100.0) {
        return Err(SimulationError::InvalidConfig(format!(
            "服务水平需在 (0, 100) 内: {}",
            service_level_pct
        )));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| SimulationError::InvalidConfig(e.to_string()))?;
    Ok(normal.inverse_cdf(service_level_pct / 100.0))
}

/// 有效箱规: <= 0 视为 1,且不低于箱规下限
pub fn effective_case_size(case_size: f64, min_units_per_case: f64) -> f64 {
    let case = if case_size > 0.0 { case_size } else { 1.0 };
    case.max(min_units_per_case)
}
