//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 幻灯片部件与文本标记
    pub const TEXT_MARKER: &str = "a:t";
    pub const SLIDE_PREFIX: &str = "ppt/slides/slide";
    pub const SLIDE_SUFFIX: &str = ".xml";

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "https://openapi.naver.com/v1/papago/n2mt";
    pub const DEFAULT_SOURCE_LANG: &str = "en";
    pub const DEFAULT_TARGET_LANG: &str = "ko";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_RETRY_ATTEMPTS: usize = 2;
    pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

    // 源文件大小上限
    pub const DEFAULT_MAX_ARCHIVE_BYTES: usize = 100 * 1024 * 1024;
    // 单个部件解压后的大小上限
    pub const DEFAULT_MAX_PART_BYTES: usize = 64 * 1024 * 1024;

    // 响应类型
    pub const PPTX_CONTENT_TYPE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "slide-translate.toml",
        ".slide-translate.toml",
        "slide-translate.json",
        "~/.config/slide-translate/config.toml",
        "/etc/slide-translate/config.toml",
    ];
}

/// 加载配置，失败时回退到默认值
pub fn load_translation_config() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.get_config().clone(),
        Err(e) => {
            tracing::warn!("加载翻译配置失败，使用默认配置: {}", e);
            TranslationConfig::default()
        }
    }
}
