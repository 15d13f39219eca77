//! # Slide Translate
//!
//! 翻译 PowerPoint (.pptx) 文稿中的幻灯片文本，其余内容保持不变。
//!
//! ## 模块组织
//!
//! - `parsers` - 幻灯片 XML 与文档树之间的编解码
//! - `package` - 压缩包读取、部件选择与重建
//! - `translation` - 文本定位、翻译客户端与全有或全无的文稿翻译
//! - `env` - 类型安全的环境变量
//! - `web` - Web服务器功能（可选）

pub mod env;
#[cfg(any(feature = "cli", feature = "web"))]
pub mod logging;
pub mod package;
pub mod parsers;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use package::{Package, PackageOptions};
pub use parsers::xml::{Mapping, Node, Scalar};
pub use translation::{
    translate_deck, IdentityClient, PackageError, PackageStats, PackageTranslator, PapagoClient,
    TranslationClient, TranslationConfig, TranslationError,
};
