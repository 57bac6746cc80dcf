// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成批次输入 JSON 与示例配置
// 输出: tests/fixtures/datasets/*.json
// ==========================================

use chrono::{Months, NaiveDate};
use replenishment_aps::config::config_keys;
use replenishment_aps::domain::{HistoryPoint, ProductInput};
use serde_json::{json, Map};
use std::error::Error;
use std::fs;

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// 季节因子 (1-12 月)
const SEASONAL_FACTORS: [f64; 12] = [0.7, 0.8, 1.0, 1.1, 1.3, 1.4, 1.2, 1.0, 0.9, 0.9, 0.8, 0.9];

/// 构造按月历史 (起始 2023-01)
fn history(values: &[f64]) -> Vec<HistoryPoint> {
    let Some(first) = NaiveDate::from_ymd_opt(2023, 1, 1) else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            first
                .checked_add_months(Months::new(i as u32))
                .map(|month| HistoryPoint::new(month, *v))
        })
        .collect()
}

/// 生成单个产品 (确定性扰动)
fn generate_product(index: usize, months: usize) -> ProductInput {
    let base = 40.0 + (index % 17) as f64 * 12.5;
    let growth = 1.0 + (index % 5) as f64 * 0.02;
    let values: Vec<f64> = (0..months)
        .map(|i| {
            let noise = (((index * 31 + i * 17) % 11) as f64 - 5.0) * 0.02;
            let trend = growth.powi((i / 12) as i32);
            (base * SEASONAL_FACTORS[i % 12] * trend * (1.0 + noise) * 100.0).round() / 100.0
        })
        .collect();

    ProductInput {
        product_id: format!("SKU{:05}", index + 1),
        description: format!("测试产品 {}", index + 1),
        history: history(&values),
        stock_on_hand: (base * (0.5 + (index % 4) as f64 * 0.5)).round(),
        units_in_transit: 0.0,
        case_size: [1.0, 6.0, 12.0, 24.0][index % 4],
        lead_time_days: None,
        safety_stock: None,
    }
}

fn write_json<T: serde::Serialize>(name: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/{}", OUTPUT_DIR, name);
    fs::write(&path, serde_json::to_string_pretty(value)?)?;
    println!("✓ 已生成 {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 1. 正常批次 (20 个产品, 24 个月)
    let normal: Vec<ProductInput> = (0..20).map(|i| generate_product(i, 24)).collect();
    write_json("01_normal_batch.json", &normal)?;

    // 2. 大批次 (500 个产品, 36 个月)
    let large: Vec<ProductInput> = (0..500).map(|i| generate_product(i, 36)).collect();
    write_json("02_large_batch.json", &large)?;

    // 3. 无效序列 (期数不足 / 零值过多 / 无正值 / 常数)
    let mut invalid = vec![
        generate_product(0, 6),
        generate_product(1, 24),
        generate_product(2, 12),
        generate_product(3, 12),
    ];
    for (i, v) in invalid[1].history.iter_mut().enumerate() {
        if i % 3 != 0 {
            v.value = 0.0;
        }
    }
    for v in invalid[2].history.iter_mut() {
        v.value = -v.value;
    }
    for v in invalid[3].history.iter_mut() {
        v.value = 30.0;
    }
    write_json("03_invalid_series.json", &invalid)?;

    // 4. 边界情况 (零库存 / 零箱规 / 单产品覆写 / 异常尖峰)
    let mut edge = vec![
        generate_product(4, 24),
        generate_product(5, 24),
        generate_product(6, 24),
        generate_product(7, 24),
    ];
    edge[0].stock_on_hand = 0.0;
    edge[1].case_size = 0.0;
    edge[2].lead_time_days = Some(7);
    edge[2].safety_stock = Some(50.0);
    if let Some(point) = edge[3].history.get_mut(10) {
        point.value *= 25.0;
    }
    write_json("04_edge_cases.json", &edge)?;

    // 5. 示例配置
    let mut config = Map::new();
    config.insert(config_keys::MIN_PERIODS.to_string(), json!(12));
    config.insert(config_keys::SERVICE_LEVEL_PCT.to_string(), json!(99.5));
    config.insert(config_keys::LEAD_TIME_DAYS.to_string(), json!(20));
    config.insert(config_keys::OPERATIONAL_DAYS_PER_MONTH.to_string(), json!(22));
    config.insert(config_keys::OPTIMIZE_PARAMETERS.to_string(), json!(false));
    config.insert(config_keys::WORKER_COUNT.to_string(), json!(4));
    write_json("05_planning_config.json", &config)?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}
