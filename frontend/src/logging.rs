//! 日志初始化
//!
//! 浏览器中通过 `tracing-web` 写入控制台，本地（测试）环境写入 stderr。

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ClientConfig;

/// 安装全局 subscriber；重复调用时保持第一次的设置
pub fn init(config: &ClientConfig) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_target(false);

    #[cfg(target_arch = "wasm32")]
    let fmt_layer = fmt_layer.with_writer(tracing_web::MakeWebConsoleWriter::new());
    #[cfg(not(target_arch = "wasm32"))]
    let fmt_layer = fmt_layer.with_writer(std::io::stderr);

    let result = tracing_subscriber::registry()
        .with(LevelFilter::from_level(config.log_level))
        .with(fmt_layer)
        .try_init();

    if result.is_ok() {
        tracing::info!(level = %config.log_level, api = %config.api_base_url, "Logging initialized");
    }
}
