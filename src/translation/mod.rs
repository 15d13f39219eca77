//! 翻译模块
//!
//! 提供幻灯片文本翻译功能，模块划分如下：
//! - **core**: 翻译客户端、部件翻译引擎和文稿翻译服务
//! - **pipeline**: 文本叶子定位
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use slide_translate::translation::{PackageTranslator, PapagoClient, TranslationConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslationConfig::default();
//! let client = PapagoClient::from_config(&config)?;
//!
//! let deck = std::fs::read("deck.pptx")?;
//! let translated = PackageTranslator::default()
//!     .translate_package(&deck, "en", "ko", &client)
//!     .await?;
//! std::fs::write("deck.ko.pptx", translated.bytes)?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 配置管理模块 - 翻译服务地址、凭据、语言和部件选择
pub mod config;

/// 核心翻译模块 - 客户端、部件引擎和文稿服务
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 文本处理管道模块 - 在文档树中定位文本叶子
pub mod pipeline;

// ============================================================================
// 核心API导出
// ============================================================================

pub use self::core::{
    IdentityClient, LeafRecord, PackageStats, PackageTranslator, PapagoClient, PartStats,
    PartTranslator, RetryPolicy, TranslatedPackage, TranslationClient,
};

pub use config::{constants, ConfigManager, TranslationConfig};

pub use error::{
    ErrorCategory, ErrorSeverity, PackageError, PackageResult, PartFailure, TranslationError,
    TranslationResult,
};

pub use pipeline::{TextLeaf, TextLocator};

// ============================================================================
// 便利函数
// ============================================================================

/// 用给定客户端翻译整个文稿，使用默认的部件选择规则
pub async fn translate_deck(
    bytes: &[u8],
    source_lang: &str,
    target_lang: &str,
    client: &dyn TranslationClient,
) -> PackageResult<TranslatedPackage> {
    PackageTranslator::default()
        .translate_package(bytes, source_lang, target_lang, client)
        .await
}
