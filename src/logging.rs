//! 日志初始化
//!
//! 级别取自 `SLIDE_TRANSLATE_LOG_LEVEL`，默认 `info`。日志写到 stderr，
//! 标准输出留给命令结果。

use tracing_subscriber::EnvFilter;

use crate::env::{core::LogLevel, EnvVar};

/// 安装全局日志订阅器，重复调用时忽略
pub fn init_logging() {
    let level = LogLevel::get().unwrap_or_else(|e| {
        eprintln!("Warning: {}", e);
        "info".to_string()
    });

    let filter = EnvFilter::try_new(format!("slide_translate={level},{level}"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
