//! 文本叶子定位器
//!
//! 在文档树中查找所有标记字段（默认 `a:t`）下的字符串值。
//! 遍历使用显式工作栈，按文档顺序做前序深度优先：
//! 映射的字段按插入顺序访问，序列按下标访问。

use crate::parsers::xml::dom::{Mapping, Node, Scalar};
use crate::translation::config::constants;

/// 可寻址的文本叶子
///
/// 记录从根到所属映射的位置路径和字段位置，写回时重新解析路径，
/// 不持有对树的引用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    /// 从根到所属映射的位置路径
    pub path: Vec<usize>,
    /// 标记字段在映射中的位置
    pub field: usize,
}

impl TextLeaf {
    fn owner<'a>(&self, tree: &'a Node) -> Option<&'a Mapping> {
        tree.resolve(&self.path).and_then(Node::as_mapping)
    }

    /// 当前文本
    pub fn text<'a>(&self, tree: &'a Node) -> Option<&'a str> {
        self.owner(tree)
            .and_then(|mapping| mapping.value_at(self.field))
            .and_then(Node::as_str)
    }

    /// 覆写文本，只改动这一个字段
    ///
    /// 叶子已不指向字符串字段时返回 `false`，树保持不变。
    pub fn write(&self, tree: &mut Node, text: String) -> bool {
        let slot = match tree.resolve_mut(&self.path) {
            Some(Node::Mapping(mapping)) => mapping.value_at_mut(self.field),
            _ => None,
        };

        match slot {
            Some(Node::Scalar(scalar @ Scalar::String(_))) => {
                *scalar = Scalar::String(text);
                true
            }
            _ => false,
        }
    }
}

/// 待访问的工作项
enum Work<'a> {
    Visit(&'a Node, Vec<usize>),
    Marker(&'a Node, Vec<usize>, usize),
}

/// 文本叶子定位器
#[derive(Debug, Clone)]
pub struct TextLocator {
    marker: String,
}

impl Default for TextLocator {
    fn default() -> Self {
        Self::new(constants::TEXT_MARKER)
    }
}

impl TextLocator {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// 收集树中的全部文本叶子
    ///
    /// 空字符串或纯空白的值同样会被收集；是否翻译由调用方决定。
    /// 标记字段的值不是字符串时跳过该字段，不视为错误。
    /// 对未修改的树重复调用得到相同的结果。
    pub fn locate(&self, tree: &Node) -> Vec<TextLeaf> {
        let mut leaves = Vec::new();
        let mut stack = vec![Work::Visit(tree, Vec::new())];

        while let Some(work) = stack.pop() {
            match work {
                Work::Visit(Node::Sequence(items), path) => {
                    for (index, item) in items.iter().enumerate().rev() {
                        if item.is_container() {
                            stack.push(Work::Visit(item, child_path(&path, index)));
                        }
                    }
                }
                Work::Visit(Node::Mapping(mapping), path) => {
                    for (index, (key, value)) in mapping.iter().enumerate().rev() {
                        if key == self.marker {
                            stack.push(Work::Marker(value, path.clone(), index));
                        } else if value.is_container() {
                            stack.push(Work::Visit(value, child_path(&path, index)));
                        }
                    }
                }
                Work::Visit(Node::Scalar(_), _) => {}
                Work::Marker(value, path, field) => match value {
                    Node::Scalar(Scalar::String(_)) => leaves.push(TextLeaf { path, field }),
                    Node::Scalar(other) => {
                        tracing::debug!("跳过非字符串的 {} 字段: {:?} (位置 {:?})", self.marker, other, path);
                    }
                    container => {
                        tracing::debug!("{} 字段不是文本，继续向下查找 (位置 {:?})", self.marker, path);
                        stack.push(Work::Visit(container, child_path(&path, field)));
                    }
                },
            }
        }

        leaves
    }

    /// 按遍历顺序返回全部文本叶子的当前值
    pub fn texts<'a>(&self, tree: &'a Node) -> Vec<&'a str> {
        self.locate(tree)
            .iter()
            .filter_map(|leaf| leaf.text(tree))
            .collect()
    }
}

fn child_path(path: &[usize], index: usize) -> Vec<usize> {
    let mut child = Vec::with_capacity(path.len() + 1);
    child.extend_from_slice(path);
    child.push(index);
    child
}
