// ==========================================
// 需求预测与补货计划系统 - 季节预测引擎
// ==========================================
// 职责: Holt-Winters 三次指数平滑拟合与前向预测
// 输入: 清洗后的月度序列 + ForecastConfig
// 输出: ForecastResult (拟合状态、预测值、误差指标)
// 红线: 拟合失败不中断,降级为正值平均预测
// ==========================================

use crate::config::ForecastConfig;
use crate::domain::forecast::{
    ForecastMetrics, ForecastResult, MonthlyForecast, SmoothingParameters,
};
use crate::domain::series::Series;
use crate::domain::types::{add_months, SeasonalType};
use crate::engine::error::{ForecastEngineResult, ForecastError};
use crate::engine::optimizer::{multi_start, SimplexConfig};
use crate::engine::stats;
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

/// 乘法季节判定阈值 (季节列标准差均值 / 序列均值)
pub const MULTIPLICATIVE_CV_THRESHOLD: f64 = 0.15;

/// 预测平滑权重: f[h] = 0.8 * f[h] + 0.2 * f[h-1]
const FORECAST_SMOOTHING: f64 = 0.8;

/// MAPE 计算时零实际值的替代值
const MAPE_ZERO_SUBSTITUTE: f64 = 1e-10;

/// 参数寻优起点 (alpha, beta, gamma)
const OPTIMIZER_STARTS: [[f64; 3]; 4] = [
    [0.3, 0.1, 0.1],
    [0.1, 0.1, 0.1],
    [0.5, 0.2, 0.2],
    [0.7, 0.3, 0.3],
];

// ==========================================
// FittedModel - 拟合状态
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub params: SmoothingParameters,
    pub level: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub fitted: Vec<f64>,
}

impl FittedModel {
    /// 前向预测
    ///
    /// # 参数
    /// - `periods`: 预测期数 (0 返回空)
    ///
    /// # 说明
    /// 季节分量取最后 m 个季节状态的第 h mod m 个;
    /// 结果截断为非负,并与上一期做 0.8/0.2 平滑
    pub fn predict(&self, periods: usize) -> ForecastEngineResult<Vec<f64>> {
        let m = self.params.seasonal_period;
        let n = self.seasonal.len();
        let last_level = self.level.last().copied().ok_or(ForecastError::EmptySeries)?;
        let last_trend = self.trend.last().copied().ok_or(ForecastError::EmptySeries)?;
        let tail = &self.seasonal[n.saturating_sub(m)..];

        let mut predictions: Vec<f64> = Vec::with_capacity(periods);
        for h in 1..=periods {
            let season = tail.get(h % m).copied().ok_or(
                ForecastError::InsufficientSeasonalHistory {
                    needed: m,
                    got: tail.len(),
                },
            )?;
            let base = last_level + h as f64 * last_trend;
            let raw = match self.params.seasonal_type {
                SeasonalType::Additive => base + season,
                SeasonalType::Multiplicative => base * season,
            };

            let mut value = raw.max(0.0);
            if let Some(&previous) = predictions.last() {
                value = FORECAST_SMOOTHING * value + (1.0 - FORECAST_SMOOTHING) * previous;
            }
            if !value.is_finite() {
                return Err(ForecastError::ComputationError(format!(
                    "第 {} 期预测值非有限",
                    h
                )));
            }
            predictions.push(value);
        }

        Ok(predictions)
    }
}

// ==========================================
// SeasonalForecaster - 季节预测引擎
// ==========================================
pub struct SeasonalForecaster {
    config: ForecastConfig,
}

impl SeasonalForecaster {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 预测配置 (平滑系数、预测月数、是否寻优)
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// 配置中的默认平滑参数
    pub fn default_parameters(&self, seasonal_type: SeasonalType) -> SmoothingParameters {
        SmoothingParameters::new(
            self.config.alpha,
            self.config.beta,
            self.config.gamma,
            seasonal_type,
        )
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单产品预测
    ///
    /// # 参数
    /// - `series`: 清洗后的序列
    /// - `first_month`: 第一个预测月
    ///
    /// # 返回
    /// ForecastResult; 拟合失败时返回降级结果 (degraded = true)
    #[instrument(skip(self, series), fields(product_id = %series.product_id, len = series.len()))]
    pub fn forecast(&self, series: &Series, first_month: NaiveDate) -> ForecastResult {
        match self.try_forecast(&series.values, first_month) {
            Ok(result) => {
                debug!(
                    product_id = %series.product_id,
                    seasonal_type = %result.params.seasonal_type,
                    mape = result.metrics.mape,
                    "预测完成"
                );
                result
            }
            Err(e) => {
                warn!(product_id = %series.product_id, error = %e, "预测拟合失败,使用平均值兜底");
                self.fallback_forecast(&series.values, first_month, &e.to_string())
            }
        }
    }

    /// 拟合 + 预测 + 指标
    pub fn try_forecast(
        &self,
        data: &[f64],
        first_month: NaiveDate,
    ) -> ForecastEngineResult<ForecastResult> {
        let seasonal_type = determine_seasonality(data);
        let params = if self.config.optimize_parameters {
            self.optimize_parameters(data, seasonal_type)
        } else {
            self.default_parameters(seasonal_type)
        };

        let model = fit(data, &params)?;
        let values = model.predict(self.config.horizon_months)?;
        let metrics = compute_metrics(data, &model.fitted);
        if ![metrics.mae, metrics.rmse, metrics.mape, metrics.mse]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ForecastError::ComputationError("误差指标非有限".to_string()));
        }

        let forecasts = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                add_months(first_month, i as u32)
                    .map(|month| MonthlyForecast::new(month, value))
                    .ok_or_else(|| ForecastError::ComputationError("预测月份越界".to_string()))
            })
            .collect::<ForecastEngineResult<Vec<_>>>()?;

        Ok(ForecastResult {
            params: model.params,
            fitted: model.fitted,
            level: model.level,
            trend: model.trend,
            seasonal: model.seasonal,
            forecasts,
            metrics,
            degraded: false,
            degradation_reason: None,
        })
    }

    /// 降级预测: 正值平均 (无正值时为 0) 重复 horizon 期
    pub fn fallback_forecast(
        &self,
        data: &[f64],
        first_month: NaiveDate,
        reason: &str,
    ) -> ForecastResult {
        let positives: Vec<f64> = data
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        let average = stats::mean(&positives);
        let n = data.len();

        let forecasts = (0..self.config.horizon_months)
            .filter_map(|i| add_months(first_month, i as u32))
            .map(|month| MonthlyForecast::new(month, average))
            .collect();

        ForecastResult {
            params: self.default_parameters(SeasonalType::Additive),
            fitted: vec![average; n],
            level: vec![average; n],
            trend: vec![0.0; n],
            seasonal: vec![0.0; n],
            forecasts,
            metrics: ForecastMetrics::default(),
            degraded: true,
            degradation_reason: Some(reason.to_string()),
        }
    }

    // ==========================================
    // 参数寻优
    // ==========================================

    /// 多起点有界 Nelder-Mead,最小化样本内 MSE
    ///
    /// 所有起点都不优于默认参数时保留默认参数
    pub fn optimize_parameters(
        &self,
        data: &[f64],
        seasonal_type: SeasonalType,
    ) -> SmoothingParameters {
        let baseline = self.default_parameters(seasonal_type);
        let objective = |p: &[f64]| {
            let params = SmoothingParameters::new(p[0], p[1], p[2], seasonal_type);
            fit(data, &params)
                .map(|model| compute_metrics(data, &model.fitted).mse)
                .unwrap_or(f64::INFINITY)
        };

        let baseline_mse = objective(&[baseline.alpha, baseline.beta, baseline.gamma]);
        let starts: Vec<Vec<f64>> = OPTIMIZER_STARTS.iter().map(|s| s.to_vec()).collect();

        match multi_start(objective, &starts, &SimplexConfig::default()) {
            Some(best) if best.value < baseline_mse && best.point.len() == 3 => {
                info!(
                    alpha = best.point[0],
                    beta = best.point[1],
                    gamma = best.point[2],
                    mse = best.value,
                    baseline_mse,
                    "参数寻优完成"
                );
                SmoothingParameters::new(best.point[0], best.point[1], best.point[2], seasonal_type)
            }
            _ => baseline,
        }
    }
}

impl Default for SeasonalForecaster {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

// ==========================================
// 拟合
// ==========================================

/// 季节类型判定
///
/// 不足两个完整周期时使用加法;否则按 (各季节位置总体标准差均值 / 截断序列均值)
/// 判定,超过阈值使用乘法
pub fn determine_seasonality(data: &[f64]) -> SeasonalType {
    let m = crate::domain::forecast::SEASONAL_PERIOD;
    let n = data.len();
    if n < 2 * m {
        return SeasonalType::Additive;
    }

    let seasons = n / m;
    let truncated = &data[..seasons * m];
    let column_std: Vec<f64> = (0..m)
        .map(|j| {
            let column: Vec<f64> = (0..seasons).map(|s| truncated[s * m + j]).collect();
            stats::population_std_dev(&column)
        })
        .collect();

    let overall_mean = stats::mean(truncated);
    let cv = if overall_mean != 0.0 {
        stats::mean(&column_std) / overall_mean
    } else {
        0.0
    };

    if cv > MULTIPLICATIVE_CV_THRESHOLD {
        SeasonalType::Multiplicative
    } else {
        SeasonalType::Additive
    }
}

/// Holt-Winters 拟合
///
/// # 说明
/// - 季节索引: t >= m 时取 t - m,否则取 t
/// - 零除数以 1 代替
/// - fitted 仅对 t >= 1 有定义,fitted[0] 保持 0 并计入误差指标
pub fn fit(data: &[f64], params: &SmoothingParameters) -> ForecastEngineResult<FittedModel> {
    let n = data.len();
    if n == 0 {
        return Err(ForecastError::EmptySeries);
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(ForecastError::NonFiniteInput { index });
    }

    let m = params.seasonal_period.max(1);
    let (alpha, beta, gamma) = (params.alpha, params.beta, params.gamma);
    let nonzero = |v: f64| if v != 0.0 { v } else { 1.0 };

    let mut level = vec![0.0; n];
    let mut trend = vec![0.0; n];
    let mut seasonal = vec![0.0; n];
    let mut fitted = vec![0.0; n];

    // 初始状态
    level[0] = if n >= m { stats::mean(&data[..m]) } else { data[0] };
    trend[0] = if n >= 2 * m {
        (stats::mean(&data[m..2 * m]) - stats::mean(&data[..m])) / m as f64
    } else {
        0.0
    };
    for i in 0..m.min(n) {
        seasonal[i] = match params.seasonal_type {
            SeasonalType::Additive => data[i] - level[0],
            SeasonalType::Multiplicative => {
                if level[0] != 0.0 {
                    data[i] / level[0]
                } else {
                    1.0
                }
            }
        };
    }

    for t in 1..n {
        let prev_level = level[t - 1];
        let prev_trend = trend[t - 1];
        let idx = if t >= m { t - m } else { t };
        let season = seasonal[idx];

        match params.seasonal_type {
            SeasonalType::Additive => {
                level[t] = alpha * (data[t] - season) + (1.0 - alpha) * (prev_level + prev_trend);
                seasonal[t] = gamma * (data[t] - level[t]) + (1.0 - gamma) * season;
                fitted[t] = prev_level + prev_trend + season;
            }
            SeasonalType::Multiplicative => {
                level[t] = alpha * (data[t] / nonzero(season))
                    + (1.0 - alpha) * (prev_level + prev_trend);
                seasonal[t] = gamma * (data[t] / nonzero(level[t])) + (1.0 - gamma) * season;
                fitted[t] = (prev_level + prev_trend) * season;
            }
        }
        trend[t] = beta * (level[t] - prev_level) + (1.0 - beta) * prev_trend;
    }

    if let Some(t) = level
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter().zip(fitted.iter()))
        .position(|((l, tr), (s, f))| !(l.is_finite() && tr.is_finite() && s.is_finite() && f.is_finite()))
    {
        return Err(ForecastError::ComputationError(format!(
            "第 {} 期拟合状态非有限",
            t
        )));
    }

    Ok(FittedModel {
        params: *params,
        level,
        trend,
        seasonal,
        fitted,
    })
}

/// 样本内误差指标
///
/// residual = actual - fitted; MAPE 中实际值为 0 时以 1e-10 代替
pub fn compute_metrics(actual: &[f64], fitted: &[f64]) -> ForecastMetrics {
    let n = actual.len().min(fitted.len());
    if n == 0 {
        return ForecastMetrics::default();
    }

    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut pct_sum = 0.0;
    for (&a, &f) in actual.iter().zip(fitted.iter()) {
        let residual = a - f;
        let safe_actual = if a == 0.0 { MAPE_ZERO_SUBSTITUTE } else { a };
        abs_sum += residual.abs();
        sq_sum += residual * residual;
        pct_sum += (residual / safe_actual).abs();
    }

    let count = n as f64;
    let mse = sq_sum / count;
    ForecastMetrics {
        mae: abs_sum / count,
        rmse: mse.sqrt(),
        mape: pct_sum / count * 100.0,
        mse,
    }
}
