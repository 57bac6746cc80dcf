// ==========================================
// 需求预测与补货计划系统 - 库存推演领域模型
// ==========================================
// 职责: 在途订单、逐日状态、月度推演、补货策略参数
// 红线: 库存不为负; 订货量为箱规整数倍
// ==========================================

use crate::domain::types::{RiskTier, SafetyStockSource};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PendingOrder - 在途补货订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub sequence: u64,          // 触发序号 (同日到货按触发先后)
    pub triggered_on: NaiveDate, // 触发日期
    pub arrival_date: NaiveDate, // 预计到货日期
    pub quantity: f64,          // 订货数量
}

// ==========================================
// ReorderAlert - 补货提醒
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderAlert {
    pub trigger_date: NaiveDate, // 触发日期
    pub arrival_date: NaiveDate, // 预计到货日期
    pub units: f64,              // 订货件数
    pub cases: i64,              // 订货箱数
    pub lead_time_days: u32,     // 提前期 (天)
}

// ==========================================
// DayState - 单日库存状态 (下单后)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayState {
    pub date: NaiveDate,
    pub on_hand: f64,         // 在库
    pub in_transit: f64,      // 在途合计
    pub total_projected: f64, // 在库 + 在途
}

// ==========================================
// MonthProjection - 月度推演结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProjection {
    pub month: NaiveDate,  // 当月 1 日
    pub label: String,     // YYYY-MM
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    // ===== 库存 =====
    pub opening_stock: f64,   // 期初库存 (= 上月期末)
    pub closing_stock: f64,   // 期末库存
    pub in_transit: f64,      // 月末在途
    pub total_projected: f64, // 月末在库 + 在途

    // ===== 消耗 =====
    pub monthly_consumption: f64, // 当月消耗
    pub daily_consumption: f64,   // 日均消耗
    pub forecast_used: bool,      // 是否使用预测值

    // ===== 策略参数 =====
    pub reorder_point: f64,                   // 月末再订货点
    pub safety_stock: f64,                    // 安全库存
    pub safety_stock_source: SafetyStockSource,
    pub minimum_stock: f64,                   // 最低库存 (平均消耗 + 安全库存)

    // ===== 评估 =====
    pub coverage_days: f64, // 覆盖天数
    pub risk_tier: RiskTier,

    pub days: Vec<DayState>,
    pub alerts: Vec<ReorderAlert>,
}

// ==========================================
// InventoryPolicy - 补货策略聚合参数
// ==========================================
// 基于原始历史计算,整个推演期不变 (再订货点除外)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryPolicy {
    // ===== 配置回显 =====
    pub lead_time_days: u32,
    pub operational_days_per_month: u32,
    pub consumption_days_per_month: u32,
    pub service_level_pct: f64,
    pub effective_case_size: f64,

    // ===== 消耗 =====
    pub average_monthly_consumption: f64,
    pub daily_consumption: f64,
    pub lead_time_consumption: f64,

    // ===== 波动 =====
    pub daily_std_dev: f64,
    pub lead_time_std_dev: f64,
    pub service_level_z: Option<f64>, // 人工安全库存时为 None

    // ===== 阈值 =====
    pub safety_stock: f64,
    pub safety_stock_source: SafetyStockSource,
    pub reorder_point: f64,
    pub minimum_stock: f64,
}

// ==========================================
// OpeningRecommendation - 期初补货建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningRecommendation {
    pub deficit: f64,                      // 缺口 = max(ROP - 库存, 0)
    pub cases: i64,                        // 建议箱数
    pub units: f64,                        // 建议件数
    pub coverage_days: f64,                // 当前库存覆盖天数
    pub replenishment_frequency_days: f64, // 补货频率 (天)
    pub alternative_projected_stock: f64,  // 提前期后预计库存
}

// ==========================================
// ProductProjection - 单产品六个月推演
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProjection {
    pub product_id: String,
    pub description: String,
    pub stock_on_hand: f64,    // 期初在库
    pub units_in_transit: f64, // 输入在途 (仅回显)
    pub start_month: NaiveDate,
    pub policy: InventoryPolicy,
    pub opening: OpeningRecommendation,
    pub months: Vec<MonthProjection>,
    pub pending_orders: Vec<PendingOrder>, // 推演期末仍在途
}

impl ProductProjection {
    /// 推演期内全部补货提醒
    pub fn alerts(&self) -> impl Iterator<Item = &ReorderAlert> {
        self.months.iter().flat_map(|m| m.alerts.iter())
    }

    /// 推演期内最高风险等级
    pub fn worst_risk(&self) -> Option<RiskTier> {
        self.months.iter().map(|m| m.risk_tier).max()
    }
}
