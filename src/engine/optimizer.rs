// ==========================================
// 需求预测与补货计划系统 - 平滑参数寻优
// ==========================================
// 职责: 有界 Nelder-Mead 单纯形搜索 + 多起点寻优
// 输入: 目标函数 (样本内 MSE)、起点、取值边界
// 输出: 最优点与目标值
// ==========================================

use tracing::debug;

// ==========================================
// 寻优配置
// ==========================================
#[derive(Debug, Clone)]
pub struct SimplexConfig {
    pub max_iter: usize,
    pub tolerance: f64,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
    pub initial_step: f64,
    pub bounds: (f64, f64), // 各维统一边界
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            tolerance: 1e-8,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            initial_step: 0.05,
            bounds: (0.01, 0.99),
        }
    }
}

// ==========================================
// 寻优结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexResult {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

/// 有界 Nelder-Mead
///
/// 每次生成新顶点后截断到边界内;目标值为 NaN 时视为无穷大
pub fn nelder_mead<F>(objective: F, initial: &[f64], config: &SimplexConfig) -> SimplexResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    let eval = |p: &[f64]| {
        let v = objective(p);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let start = clamp_point(initial, config.bounds);
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(start.clone());
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += config.initial_step;
        if vertex[i] > config.bounds.1 {
            vertex[i] = start[i] - config.initial_step;
        }
        simplex.push(clamp_point(&vertex, config.bounds));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    while n > 0 && iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        if (values[worst] - values[best]).abs() < config.tolerance {
            break;
        }

        let centroid = centroid_excluding(&simplex, worst);

        // 反射
        let reflected = clamp_point(
            &blend(&centroid, &simplex[worst], -config.reflection),
            config.bounds,
        );
        let reflected_value = eval(&reflected);

        if reflected_value < values[best] {
            // 扩展
            let expanded = clamp_point(
                &blend(&centroid, &reflected, config.expansion),
                config.bounds,
            );
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        // 收缩
        let towards = if reflected_value < values[worst] {
            &reflected
        } else {
            &simplex[worst]
        };
        let contracted = clamp_point(
            &blend(&centroid, towards, config.contraction),
            config.bounds,
        );
        let contracted_value = eval(&contracted);
        if contracted_value < values[worst].min(reflected_value) {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // 整体缩小
        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            let shrunk = blend(&anchor, &simplex[i], config.shrink);
            simplex[i] = clamp_point(&shrunk, config.bounds);
            values[i] = eval(&simplex[i]);
        }
    }

    let best = (0..values.len())
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    SimplexResult {
        point: simplex.get(best).cloned().unwrap_or_default(),
        value: values.get(best).copied().unwrap_or(f64::INFINITY),
        iterations,
    }
}

/// 多起点寻优,返回目标值最小的结果
pub fn multi_start<F>(objective: F, starts: &[Vec<f64>], config: &SimplexConfig) -> Option<SimplexResult>
where
    F: Fn(&[f64]) -> f64,
{
    starts
        .iter()
        .map(|start| {
            let result = nelder_mead(&objective, start, config);
            debug!(
                start = ?start,
                value = result.value,
                iterations = result.iterations,
                "起点寻优完成"
            );
            result
        })
        .min_by(|a, b| a.value.total_cmp(&b.value))
}

/// anchor + t * (point - anchor)
fn blend(anchor: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    anchor
        .iter()
        .zip(point.iter())
        .map(|(a, p)| a + t * (p - a))
        .collect()
}

fn centroid_excluding(simplex: &[Vec<f64>], excluded: usize) -> Vec<f64> {
    let dims = simplex.first().map(|v| v.len()).unwrap_or(0);
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dims];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == excluded {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
            *c += v / count;
        }
    }
    centroid
}

fn clamp_point(point: &[f64], bounds: (f64, f64)) -> Vec<f64> {
    point.iter().map(|v| v.clamp(bounds.0, bounds.1)).collect()
}
