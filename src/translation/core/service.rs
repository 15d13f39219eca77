//! 演示文稿翻译服务
//!
//! 按压缩包顺序依次处理每个幻灯片部件：解析、翻译、序列化。
//! 只有全部部件成功后才重建压缩包；任一部件失败时整个操作失败，
//! 不会返回部分翻译的文稿。

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

use crate::package::{Package, PackageOptions, PartEntry};
use crate::parsers::xml::{self, Node};
use crate::translation::core::client::TranslationClient;
use crate::translation::core::engine::{PartStats, PartTranslator};
use crate::translation::error::{PackageError, PackageResult};
use crate::translation::pipeline::TextLocator;

/// 整个文稿的翻译统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PackageStats {
    pub parts_selected: usize,
    pub parts_translated: usize,
    pub leaves_found: usize,
    pub leaves_translated: usize,
    pub leaves_skipped_blank: usize,
    pub provider_calls: usize,
}

impl PackageStats {
    fn add_part(&mut self, part: &PartStats) {
        self.parts_translated += 1;
        self.leaves_found += part.leaves_found;
        self.leaves_translated += part.leaves_translated;
        self.leaves_skipped_blank += part.leaves_skipped_blank;
        self.provider_calls += part.provider_calls;
    }
}

/// 翻译后的文稿
#[derive(Debug, Clone)]
pub struct TranslatedPackage {
    pub bytes: Vec<u8>,
    pub stats: PackageStats,
}

/// 文本叶子的只读记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafRecord {
    pub part: String,
    pub index: usize,
    pub text: String,
}

/// 文稿翻译器
#[derive(Debug, Clone)]
pub struct PackageTranslator {
    options: PackageOptions,
    part_translator: PartTranslator,
}

impl Default for PackageTranslator {
    fn default() -> Self {
        Self::new(PackageOptions::default())
    }
}

impl PackageTranslator {
    pub fn new(options: PackageOptions) -> Self {
        let part_translator = PartTranslator::new(TextLocator::new(options.marker.clone()));
        Self {
            options,
            part_translator,
        }
    }

    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// 翻译整个文稿
    pub async fn translate_package(
        &self,
        bytes: &[u8],
        source_lang: &str,
        target_lang: &str,
        client: &dyn TranslationClient,
    ) -> PackageResult<TranslatedPackage> {
        let start_time = Instant::now();
        let mut package = Package::open(bytes)?;
        let parts = package.slide_parts(&self.options);

        tracing::info!(
            "开始翻译文稿: {} 个条目，{} 个幻灯片部件 ({} -> {})",
            package.len(),
            parts.len(),
            source_lang,
            target_lang
        );

        let mut stats = PackageStats {
            parts_selected: parts.len(),
            ..PackageStats::default()
        };
        let mut replacements = BTreeMap::new();

        for entry in &parts {
            let mut tree = self.read_tree(&mut package, entry)?;

            let part_stats = self
                .part_translator
                .translate_part(&mut tree, source_lang, target_lang, client)
                .await
                .map_err(|failure| {
                    tracing::error!("部件 {} 翻译失败，放弃整个文稿: {}", entry.path, failure);
                    PackageError::Translation {
                        part: entry.path.clone(),
                        failure,
                    }
                })?;

            tracing::info!(
                "部件 {} 完成: {} 个文本节点，翻译 {} 个，跳过空白 {} 个",
                entry.path,
                part_stats.leaves_found,
                part_stats.leaves_translated,
                part_stats.leaves_skipped_blank
            );

            stats.add_part(&part_stats);
            replacements.insert(entry.index, xml::serialize(&tree).into_bytes());
        }

        let bytes = package.rebuild(&replacements)?;

        tracing::info!(
            "文稿翻译完成: {} 个部件，{} 次翻译调用，耗时 {:?}",
            stats.parts_translated,
            stats.provider_calls,
            start_time.elapsed()
        );

        Ok(TranslatedPackage { bytes, stats })
    }

    /// 列出所有幻灯片部件中的文本叶子，不做翻译
    pub fn inspect(&self, bytes: &[u8]) -> PackageResult<Vec<LeafRecord>> {
        let mut package = Package::open(bytes)?;
        let locator = self.part_translator.locator();
        let mut records = Vec::new();

        for entry in package.slide_parts(&self.options) {
            let tree = self.read_tree(&mut package, &entry)?;
            records.extend(locator.texts(&tree).into_iter().enumerate().map(|(index, text)| {
                LeafRecord {
                    part: entry.path.clone(),
                    index,
                    text: text.to_string(),
                }
            }));
        }

        Ok(records)
    }

    fn read_tree(&self, package: &mut Package<'_>, entry: &PartEntry) -> PackageResult<Node> {
        let content = package.read(entry, self.options.max_part_bytes)?;
        xml::parse_bytes(&content).map_err(|source| PackageError::Parse {
            part: entry.path.clone(),
            source,
        })
    }
}
