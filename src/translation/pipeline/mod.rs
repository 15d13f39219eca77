//! 翻译管道模块
//!
//! 负责在文档树中定位需要翻译的文本叶子

pub mod collector;

// 重新导出主要类型
pub use collector::{TextLeaf, TextLocator};
