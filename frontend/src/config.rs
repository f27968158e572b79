//! 客户端配置
//!
//! 浏览器中没有进程环境变量，所以配置在编译期通过 `option_env!` 注入，
//! 未提供时使用默认值。

use std::time::Duration;
use tracing::Level;

/// 这些是默认值，如果构建时没有设置对应的环境变量，则使用这些值
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_SESSION_STORAGE_KEY: &str = "ticketdesk.session";
const DEFAULT_TOAST_TIMEOUT_MS: u64 = 3000;
const DEFAULT_LOG_LEVEL: Level = Level::INFO;

/// 运行时配置结构体
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// 后端 API 根地址（不带结尾的 `/`）
    pub api_base_url: String,
    /// LocalStorage 中保存会话记录的键
    pub session_storage_key: String,
    /// 通知自动消失的时间
    pub toast_timeout: Duration,
    pub log_level: Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_storage_key: DEFAULT_SESSION_STORAGE_KEY.to_string(),
            toast_timeout: Duration::from_millis(DEFAULT_TOAST_TIMEOUT_MS),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl ClientConfig {
    /// 从构建环境读取配置
    pub fn from_build_env() -> Self {
        Self::from_vars(
            option_env!("TICKETDESK_API_URL"),
            option_env!("TICKETDESK_SESSION_KEY"),
            option_env!("TICKETDESK_TOAST_MS"),
            option_env!("TICKETDESK_LOG_LEVEL"),
        )
    }

    fn from_vars(
        api_url: Option<&str>,
        session_key: Option<&str>,
        toast_ms: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: non_empty(api_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),

            session_storage_key: non_empty(session_key)
                .map(str::to_string)
                .unwrap_or(defaults.session_storage_key),

            toast_timeout: non_empty(toast_ms)
                .and_then(|ms| ms.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.toast_timeout),

            // 无法识别的级别回退到默认值
            log_level: non_empty(log_level)
                .and_then(|lvl| lvl.parse::<Level>().ok())
                .unwrap_or(defaults.log_level),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
