// ==========================================
// 需求预测与补货计划系统 - 命令行入口
// ==========================================
// 用法: replenishment-aps <input.json> [config.json]
// 输出: 批次报告 (JSON, stdout)
// ==========================================

use anyhow::{Context, Result};
use replenishment_aps::config::{ConfigManager, PlanningProfile};
use replenishment_aps::domain::ProductInput;
use replenishment_aps::engine::BatchOrchestrator;
use replenishment_aps::{logging, APP_NAME, VERSION};

const USAGE: &str = "用法: replenishment-aps <input.json> [config.json]";

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let input_path = args.next().context(USAGE)?;

    // 加载配置 (未指定时使用默认值)
    let profile = match args.next() {
        Some(config_path) => {
            let manager = ConfigManager::from_json_file(&config_path)
                .with_context(|| format!("无法加载配置文件: {}", config_path))?;
            PlanningProfile::from_reader(&manager).await?
        }
        None => {
            let profile = PlanningProfile::default();
            profile.validate()?;
            profile
        }
    };

    // 读取批次输入
    let raw = std::fs::read_to_string(&input_path)
        .with_context(|| format!("无法读取输入文件: {}", input_path))?;
    let products: Vec<ProductInput> = serde_json::from_str(&raw)
        .with_context(|| format!("输入文件格式错误: {}", input_path))?;
    tracing::info!(count = products.len(), path = %input_path, "批次输入已加载");

    let report = BatchOrchestrator::new(profile).run(products).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
