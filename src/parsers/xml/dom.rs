//! 文档树数据模型
//!
//! 幻灯片XML被表示为无模式的递归节点：标量、有序序列或有序映射。
//! 映射保留字段的插入顺序，以便序列化后结构与原文一致。

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// 属性映射所在的字段名
pub const ATTRIBUTES_KEY: &str = ":@";
/// 属性名前缀，保证属性名不会与元素名冲突
pub const ATTRIBUTE_PREFIX: &str = "@_";
/// 混合内容中的文本节点
pub const TEXT_KEY: &str = "#text";
/// CDATA 节点
pub const CDATA_KEY: &str = "#cdata";
/// 注释节点
pub const COMMENT_KEY: &str = "#comment";
/// 处理指令（包括XML声明）
pub const PI_KEY: &str = "#pi";
/// DOCTYPE 声明
pub const DOCTYPE_KEY: &str = "#doctype";

/// 标量值
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    /// 字符串标量的内容
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// 文档树节点
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    /// 创建字符串标量节点
    pub fn text(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    /// 字符串标量的内容，其他节点返回 `None`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(scalar) => scalar.as_str(),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// 是否为可继续遍历的容器节点
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Sequence(_) | Node::Mapping(_))
    }

    /// 按位置访问子节点：序列按下标，映射按字段位置
    pub fn child(&self, index: usize) -> Option<&Node> {
        match self {
            Node::Sequence(items) => items.get(index),
            Node::Mapping(mapping) => mapping.value_at(index),
            Node::Scalar(_) => None,
        }
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        match self {
            Node::Sequence(items) => items.get_mut(index),
            Node::Mapping(mapping) => mapping.value_at_mut(index),
            Node::Scalar(_) => None,
        }
    }

    /// 沿位置路径解析节点
    pub fn resolve(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &index| node.child(index))
    }

    pub fn resolve_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &index| node.child_mut(index))
    }
}

/// 拆除时逐层摘下子容器，深层嵌套的树不会耗尽调用栈
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut Node, pending: &mut Vec<Node>) {
    match node {
        Node::Sequence(items) => pending.extend(items.drain(..).filter(Node::is_container)),
        Node::Mapping(mapping) => pending.extend(
            mapping
                .fields
                .drain(..)
                .map(|(_, value)| value)
                .filter(Node::is_container),
        ),
        Node::Scalar(_) => {}
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Node::Mapping(mapping)
    }
}

/// 保持插入顺序的字段映射
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    fields: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单字段映射，常用于构造元素节点
    pub fn with_field(name: impl Into<String>, value: Node) -> Self {
        let mut mapping = Self::new();
        mapping.insert(name, value);
        mapping
    }

    /// 插入字段；同名字段已存在时原位替换，保持顺序
    pub fn insert(&mut self, name: impl Into<String>, value: Node) -> Option<Node> {
        let name = name.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn value_at(&self, index: usize) -> Option<&Node> {
        self.fields.get(index).map(|(_, value)| value)
    }

    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.fields.get_mut(index).map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &Node)> + ExactSizeIterator {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 元素映射的名称与内容（第一个非属性字段）
    pub fn element(&self) -> Option<(&str, &Node)> {
        self.iter().find(|(key, _)| *key != ATTRIBUTES_KEY)
    }

    /// 元素的属性映射
    pub fn attributes(&self) -> Option<&Mapping> {
        self.get(ATTRIBUTES_KEY).and_then(Node::as_mapping)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Number(n) => serializer.serialize_f64(*n),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Mapping(mapping) => mapping.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
