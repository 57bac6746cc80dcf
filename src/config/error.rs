// ==========================================
// 需求预测与补货计划系统 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 文件相关错误 =====
    #[error("配置文件读取失败 ({path}): {message}")]
    FileRead { path: String, message: String },

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    // ===== 取值错误 =====
    #[error("配置值无效 ({key}={value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置值超出范围 ({key}={value}): 期望 {expected}")]
    OutOfRange {
        key: String,
        value: String,
        expected: String,
    },

    // ===== 并发错误 =====
    #[error("锁获取失败: {0}")]
    LockPoisoned(String),
}

/// 配置层 Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn out_of_range(key: &str, value: impl ToString, expected: &str) -> Self {
        ConfigError::OutOfRange {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}
