//! 文档树到 XML 文本的序列化

use quick_xml::escape::partial_escape;

use super::dom::{
    Mapping, Node, ATTRIBUTES_KEY, ATTRIBUTE_PREFIX, CDATA_KEY, COMMENT_KEY, DOCTYPE_KEY, PI_KEY,
    TEXT_KEY,
};

/// 待输出的工作项
enum Task<'a> {
    Visit(&'a Node),
    Entry {
        name: &'a str,
        value: &'a Node,
        attributes: Option<&'a Mapping>,
    },
    Close(&'a str),
}

/// 将文档树序列化为 XML 文本
///
/// 与解析一样使用显式工作栈。未被修改的子树会得到与原文结构、
/// 属性完全一致的输出。
pub fn serialize(tree: &Node) -> String {
    let mut out = String::new();
    let mut stack = vec![Task::Visit(tree)];

    while let Some(task) = stack.pop() {
        match task {
            Task::Visit(Node::Scalar(scalar)) => {
                out.push_str(&partial_escape(&scalar.to_string()));
            }
            Task::Visit(Node::Sequence(items)) => {
                stack.extend(items.iter().rev().map(Task::Visit));
            }
            Task::Visit(Node::Mapping(mapping)) => {
                let attributes = mapping.attributes();
                let entries: Vec<(&str, &Node)> = mapping
                    .iter()
                    .filter(|(name, _)| *name != ATTRIBUTES_KEY)
                    .collect();
                stack.extend(entries.into_iter().rev().map(|(name, value)| Task::Entry {
                    name,
                    value,
                    attributes,
                }));
            }
            Task::Entry {
                name,
                value,
                attributes,
            } => write_entry(&mut out, &mut stack, name, value, attributes),
            Task::Close(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }

    out
}

fn write_entry<'a>(
    out: &mut String,
    stack: &mut Vec<Task<'a>>,
    name: &'a str,
    value: &'a Node,
    attributes: Option<&'a Mapping>,
) {
    match name {
        TEXT_KEY => stack.push(Task::Visit(value)),
        CDATA_KEY => wrap_raw(out, "<![CDATA[", value, "]]>"),
        COMMENT_KEY => wrap_raw(out, "<!--", value, "-->"),
        PI_KEY => wrap_raw(out, "<?", value, "?>"),
        DOCTYPE_KEY => {
            out.push_str("<!DOCTYPE ");
            out.push_str(value.as_str().unwrap_or_default().trim_start());
            out.push('>');
        }
        _ => {
            out.push('<');
            out.push_str(name);
            if let Some(attributes) = attributes {
                write_attributes(out, attributes);
            }

            match value {
                Node::Scalar(scalar) => {
                    let text = scalar.to_string();
                    if text.is_empty() {
                        out.push_str("/>");
                    } else {
                        out.push('>');
                        out.push_str(&partial_escape(&text));
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                }
                Node::Sequence(items) if items.is_empty() => out.push_str("/>"),
                _ => {
                    out.push('>');
                    stack.push(Task::Close(name));
                    stack.push(Task::Visit(value));
                }
            }
        }
    }
}

fn wrap_raw(out: &mut String, open: &str, value: &Node, close: &str) {
    out.push_str(open);
    if let Node::Scalar(scalar) = value {
        out.push_str(&scalar.to_string());
    }
    out.push_str(close);
}

fn write_attributes(out: &mut String, attributes: &Mapping) {
    for (key, value) in attributes.iter() {
        let Node::Scalar(scalar) = value else {
            continue;
        };
        let name = key.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(key);
        let raw = scalar.to_string();
        // 原值以单引号包裹且含双引号时保持单引号
        let quote = if raw.contains('"') { '\'' } else { '"' };

        out.push(' ');
        out.push_str(name);
        out.push('=');
        out.push(quote);
        out.push_str(&raw);
        out.push(quote);
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    #[test]
    fn test_round_trip_slide_fragment() {
        let xml = concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<p:sld xmlns:a="urn:a" xmlns:p="urn:p"><p:cSld><p:spTree>"#,
            r#"<p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US" dirty="0"/>"#,
            r#"<a:t>Hello &amp; welcome</a:t></a:r><a:endParaRPr lang="en-US"/></a:p>"#,
            r#"</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        );

        let tree = parse(xml).unwrap();
        assert_eq!(serialize(&tree), xml);
    }

    #[test]
    fn test_special_nodes_round_trip() {
        let xml = "<!DOCTYPE note><root><!--c--><![CDATA[a < b]]><?pi data?>text</root>";
        let tree = parse(xml).unwrap();
        assert_eq!(serialize(&tree), xml);
    }

    #[test]
    fn test_text_is_escaped() {
        let tree = Node::Sequence(vec![Mapping::with_field("a:t", Node::text("1 < 2 & 3")).into()]);
        assert_eq!(serialize(&tree), "<a:t>1 &lt; 2 &amp; 3</a:t>");
    }

    #[test]
    fn test_single_quoted_attribute_is_preserved() {
        let xml = r#"<a title='say "hi"'/>"#;
        let tree = parse(xml).unwrap();
        assert_eq!(serialize(&tree), xml);
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let tree = parse("<a:t></a:t>").unwrap();
        assert_eq!(serialize(&tree), "<a:t/>");
    }
}
