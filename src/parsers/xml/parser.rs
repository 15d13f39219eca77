//! XML 文本到文档树的解析
//!
//! 使用 quick-xml 的事件流和显式栈构建树，不使用递归，
//! 因此任意嵌套深度的部件都不会耗尽调用栈。

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::dom::{
    Mapping, Node, ATTRIBUTES_KEY, ATTRIBUTE_PREFIX, CDATA_KEY, COMMENT_KEY, DOCTYPE_KEY, PI_KEY,
    TEXT_KEY,
};
use super::{XmlError, XmlResult};

/// 元素内容片段：相邻的文本与实体引用被合并为一个片段
enum Content {
    Text(String),
    Node(Node),
}

/// 尚未闭合的元素
struct Frame {
    name: String,
    attributes: Option<Mapping>,
    children: Vec<Content>,
}

impl Frame {
    fn document() -> Self {
        Self {
            name: String::new(),
            attributes: None,
            children: Vec::new(),
        }
    }

    fn element(start: &BytesStart<'_>) -> XmlResult<Self> {
        let name = utf8(start.name().as_ref())?.to_string();

        let mut attributes = Mapping::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::Syntax(format!("元素 <{}> 的属性无效: {}", name, e)))?;
            let key = utf8(attr.key.as_ref())?;
            // 属性值保留转义形式，序列化时原样写回
            let value = utf8(&attr.value)?;
            attributes.insert(format!("{}{}", ATTRIBUTE_PREFIX, key), Node::text(value));
        }

        Ok(Self {
            name,
            attributes: if attributes.is_empty() {
                None
            } else {
                Some(attributes)
            },
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Content::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Content::Text(text.to_string()));
        }
    }

    fn push_node(&mut self, node: Node) {
        self.children.push(Content::Node(node));
    }

    /// 闭合元素：纯文本内容折叠为字符串标量，其余保留为有序序列
    fn finish(self) -> Node {
        let mut children = self.children;
        let value = match children.len() {
            0 => Node::text(""),
            1 if matches!(children[0], Content::Text(_)) => match children.pop() {
                Some(Content::Text(text)) => Node::text(text),
                _ => Node::text(""),
            },
            _ => Node::Sequence(children.into_iter().map(Content::into_node).collect()),
        };

        let mut mapping = Mapping::with_field(self.name, value);
        if let Some(attributes) = self.attributes {
            mapping.insert(ATTRIBUTES_KEY, attributes.into());
        }
        mapping.into()
    }

    fn finish_document(self) -> Node {
        Node::Sequence(self.children.into_iter().map(Content::into_node).collect())
    }
}

impl Content {
    fn into_node(self) -> Node {
        match self {
            Content::Text(text) => Mapping::with_field(TEXT_KEY, Node::text(text)).into(),
            Content::Node(node) => node,
        }
    }
}

fn utf8(bytes: &[u8]) -> XmlResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::Encoding(e.to_string()))
}

fn special(key: &str, bytes: &[u8]) -> XmlResult<Node> {
    Ok(Mapping::with_field(key, Node::text(utf8(bytes)?)).into())
}

fn current<'a>(open: &'a mut [Frame], document: &'a mut Frame) -> &'a mut Frame {
    match open.last_mut() {
        Some(frame) => frame,
        None => document,
    }
}

/// 将 XML 文本解析为文档树
pub fn parse(xml: &str) -> XmlResult<Node> {
    let mut reader = Reader::from_str(xml);
    let mut document = Frame::document();
    let mut open: Vec<Frame> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            XmlError::Syntax(format!("位置 {}: {}", reader.error_position(), e))
        })?;

        match event {
            Event::Start(e) => open.push(Frame::element(&e)?),
            Event::End(e) => {
                let frame = open.pop().ok_or_else(|| {
                    XmlError::UnexpectedEnd(String::from_utf8_lossy(e.name().as_ref()).into_owned())
                })?;
                let node = frame.finish();
                current(&mut open, &mut document).push_node(node);
            }
            Event::Empty(e) => {
                let node = Frame::element(&e)?.finish();
                current(&mut open, &mut document).push_node(node);
            }
            Event::Text(e) => {
                let raw = utf8(e.as_ref())?;
                let text = unescape(raw).map_err(|err| XmlError::Entity(err.to_string()))?;
                current(&mut open, &mut document).push_text(&text);
            }
            Event::GeneralRef(e) => {
                let name = utf8(e.as_ref())?;
                let reference = format!("&{};", name);
                let text = unescape(&reference).map_err(|_| XmlError::Entity(name.to_string()))?;
                current(&mut open, &mut document).push_text(&text);
            }
            Event::CData(e) => {
                current(&mut open, &mut document).push_node(special(CDATA_KEY, e.as_ref())?)
            }
            Event::Comment(e) => {
                current(&mut open, &mut document).push_node(special(COMMENT_KEY, e.as_ref())?)
            }
            Event::Decl(e) => current(&mut open, &mut document).push_node(special(PI_KEY, &e)?),
            Event::PI(e) => current(&mut open, &mut document).push_node(special(PI_KEY, &e)?),
            Event::DocType(e) => {
                current(&mut open, &mut document).push_node(special(DOCTYPE_KEY, e.as_ref())?)
            }
            Event::Eof => break,
        }
    }

    if let Some(frame) = open.last() {
        return Err(XmlError::Unclosed(frame.name.clone()));
    }

    Ok(document.finish_document())
}
