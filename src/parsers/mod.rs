//! # 解析器模块
//!
//! - `xml` - 幻灯片部件的XML解析、文档树模型与序列化

pub mod xml;

// Re-export commonly used items for convenience
pub use xml::{parse, parse_bytes, serialize, Mapping, Node, Scalar, XmlError, XmlResult};
