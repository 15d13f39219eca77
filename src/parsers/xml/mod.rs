//! 幻灯片 XML 编解码模块
//!
//! - `dom`: 文档树数据模型（标量 / 序列 / 映射）
//! - `parser`: XML 文本 → 文档树
//! - `serializer`: 文档树 → XML 文本
//!
//! 树的形态与 fast-xml-parser 的保序模式一致：每个元素是一个单字段映射，
//! 属性存放在 `:@` 字段中。

pub mod dom;
pub mod parser;
pub mod serializer;

use thiserror::Error;

pub use dom::{Mapping, Node, Scalar};
pub use parser::parse;
pub use serializer::serialize;

/// XML 编解码错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XmlError {
    #[error("XML语法错误: {0}")]
    Syntax(String),

    #[error("非UTF-8内容: {0}")]
    Encoding(String),

    #[error("无法解析的实体引用: {0}")]
    Entity(String),

    #[error("元素未闭合: <{0}>")]
    Unclosed(String),

    #[error("多余的结束标签: </{0}>")]
    UnexpectedEnd(String),
}

pub type XmlResult<T> = Result<T, XmlError>;

/// 从部件字节解析文档树，UTF-8 BOM 会被去掉
pub fn parse_bytes(bytes: &[u8]) -> XmlResult<Node> {
    let text = std::str::from_utf8(bytes).map_err(|e| XmlError::Encoding(e.to_string()))?;
    parse(text.strip_prefix('\u{feff}').unwrap_or(text))
}
