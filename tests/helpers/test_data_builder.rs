// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use replenishment_aps::domain::{HistoryPoint, ProductInput};

/// 月份 (当月 1 日)
pub fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// 正弦季节序列: base + amplitude * sin(2π·月/12) + 固定扰动
pub fn seasonal_values(periods: usize, base: f64, amplitude: f64) -> Vec<f64> {
    let noise = [1.5, -1.0, 0.5, -2.0, 1.0, 0.0, -0.5, 2.0, -1.5, 1.0, 0.5, -1.0];
    (0..periods)
        .map(|i| {
            let phase = (i % 12) as f64 / 12.0 * std::f64::consts::TAU;
            base + amplitude * phase.sin() + noise[i % 12]
        })
        .collect()
}

/// 逐年放大的季节序列 (乘法季节)
pub fn growing_multiplicative_values(years: usize) -> Vec<f64> {
    let factors = [0.6, 0.8, 1.0, 1.2, 1.4, 1.3, 1.1, 0.9, 0.8, 0.9, 1.0, 1.0];
    (0..years * 12)
        .map(|i| 100.0 * (1.0 + 0.5 * (i / 12) as f64) * factors[i % 12])
        .collect()
}

// ==========================================
// ProductInput 构建器
// ==========================================

pub struct ProductBuilder {
    product_id: String,
    description: String,
    first_month: NaiveDate,
    values: Vec<f64>,
    stock_on_hand: f64,
    units_in_transit: f64,
    case_size: f64,
    lead_time_days: Option<u32>,
    safety_stock: Option<f64>,
}

impl ProductBuilder {
    pub fn new(product_id: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            description: format!("测试产品 {}", product_id),
            first_month: month(2023, 1),
            values: Vec::new(),
            stock_on_hand: 0.0,
            units_in_transit: 0.0,
            case_size: 1.0,
            lead_time_days: None,
            safety_stock: None,
        }
    }

    /// 历史起始月 (默认 2023-01)
    pub fn starting(mut self, year: i32, month_of_year: u32) -> Self {
        self.first_month = month(year, month_of_year);
        self
    }

    pub fn history(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    pub fn stock(mut self, stock: f64) -> Self {
        self.stock_on_hand = stock;
        self
    }

    pub fn in_transit(mut self, units: f64) -> Self {
        self.units_in_transit = units;
        self
    }

    pub fn case_size(mut self, case_size: f64) -> Self {
        self.case_size = case_size;
        self
    }

    pub fn lead_time(mut self, days: u32) -> Self {
        self.lead_time_days = Some(days);
        self
    }

    pub fn safety_stock(mut self, units: f64) -> Self {
        self.safety_stock = Some(units);
        self
    }

    pub fn build(self) -> ProductInput {
        let history = self
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let month = self
                    .first_month
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap();
                HistoryPoint::new(month, *v)
            })
            .collect();

        ProductInput {
            product_id: self.product_id,
            description: self.description,
            history,
            stock_on_hand: self.stock_on_hand,
            units_in_transit: self.units_in_transit,
            case_size: self.case_size,
            lead_time_days: self.lead_time_days,
            safety_stock: self.safety_stock,
        }
    }
}
