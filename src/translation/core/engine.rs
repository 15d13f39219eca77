//! 单个部件的翻译引擎
//!
//! 对一个部件的文档树：
//! 1. 用 `TextLocator` 一次性收集全部文本叶子
//! 2. 按遍历顺序逐个调用翻译客户端，上一次调用返回后才发起下一次
//! 3. 成功后立即把译文写回叶子
//!
//! 空白文本不调用翻译服务，原样保留。任何一次调用失败都会立即中止，
//! 已写回的叶子不回滚，由上层丢弃整棵树。

use crate::parsers::xml::Node;
use crate::translation::core::client::TranslationClient;
use crate::translation::error::PartFailure;
use crate::translation::pipeline::TextLocator;

/// 单个部件的翻译统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartStats {
    /// 找到的文本叶子数
    pub leaves_found: usize,
    /// 已写回译文的叶子数
    pub leaves_translated: usize,
    /// 因空白而跳过的叶子数
    pub leaves_skipped_blank: usize,
    /// 发起的翻译调用次数
    pub provider_calls: usize,
}

/// 部件翻译器
#[derive(Debug, Clone, Default)]
pub struct PartTranslator {
    locator: TextLocator,
}

impl PartTranslator {
    pub fn new(locator: TextLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &TextLocator {
        &self.locator
    }

    /// 翻译一棵文档树中的全部文本叶子
    pub async fn translate_part(
        &self,
        tree: &mut Node,
        source_lang: &str,
        target_lang: &str,
        client: &dyn TranslationClient,
    ) -> Result<PartStats, PartFailure> {
        let leaves = self.locator.locate(tree);
        let mut stats = PartStats {
            leaves_found: leaves.len(),
            ..PartStats::default()
        };

        tracing::debug!("部件中找到 {} 个文本节点", leaves.len());

        for (index, leaf) in leaves.iter().enumerate() {
            let Some(text) = leaf.text(tree) else {
                continue;
            };

            if text.trim().is_empty() {
                stats.leaves_skipped_blank += 1;
                continue;
            }

            let text = text.to_string();
            stats.provider_calls += 1;

            let translated = client
                .translate(&text, source_lang, target_lang)
                .await
                .map_err(|source| PartFailure {
                    leaf_index: index,
                    text: text.clone(),
                    source,
                })?;

            tracing::debug!("文本节点 {}: {:?} -> {:?}", index, text, translated);
            if leaf.write(tree, translated) {
                stats.leaves_translated += 1;
            }
        }

        Ok(stats)
    }
}
