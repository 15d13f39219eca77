//! 演示文稿压缩包的读取与重建
//!
//! `.pptx` 是由若干 XML 部件和二进制资源组成的 zip 包。这里负责：
//! - 按压缩包自身的顺序枚举部件
//! - 判断哪些部件是需要翻译的幻灯片
//! - 在替换选中部件的同时原样拷贝其余条目

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::translation::config::{constants, TranslationConfig};
use crate::translation::error::{PackageError, PackageResult};

/// 部件选择与文本标记设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// 文本叶子的字段名
    pub marker: String,
    /// 幻灯片部件路径前缀
    pub slide_prefix: String,
    /// 幻灯片部件路径后缀
    pub slide_suffix: String,
    /// 单个部件解压后的字节上限
    pub max_part_bytes: usize,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            marker: constants::TEXT_MARKER.to_string(),
            slide_prefix: constants::SLIDE_PREFIX.to_string(),
            slide_suffix: constants::SLIDE_SUFFIX.to_string(),
            max_part_bytes: constants::DEFAULT_MAX_PART_BYTES,
        }
    }
}

impl PackageOptions {
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            marker: config.text_marker.clone(),
            slide_prefix: config.slide_prefix.clone(),
            slide_suffix: config.slide_suffix.clone(),
            max_part_bytes: config.max_part_bytes,
        }
    }

    /// 部件路径是否为幻灯片文档
    ///
    /// `ppt/slides/_rels/slide1.xml.rels` 这类关系部件不会被选中。
    pub fn is_slide(&self, path: &str) -> bool {
        path.starts_with(&self.slide_prefix) && path.ends_with(&self.slide_suffix)
    }
}

/// 压缩包中的一个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartEntry {
    /// 在压缩包中的下标
    pub index: usize,
    /// 部件路径
    pub path: String,
}

/// 只读打开的演示文稿压缩包
pub struct Package<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Package<'a> {
    /// 打开压缩包
    pub fn open(bytes: &'a [u8]) -> PackageResult<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        tracing::debug!("打开压缩包: {} 个条目", archive.len());
        Ok(Self { archive })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// 按压缩包顺序列出所有条目
    pub fn entries(&self) -> Vec<PartEntry> {
        (0..self.archive.len())
            .filter_map(|index| {
                self.archive.name_for_index(index).map(|path| PartEntry {
                    index,
                    path: path.to_string(),
                })
            })
            .collect()
    }

    /// 按压缩包顺序列出被选中的幻灯片部件
    pub fn slide_parts(&self, options: &PackageOptions) -> Vec<PartEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| options.is_slide(&entry.path))
            .collect()
    }

    /// 读取条目解压后的内容
    ///
    /// 条目头声明的大小由上传方决定，不能用来预分配；实际解压量
    /// 同样受 `limit` 约束，超出时返回 `PackageError::Read`。
    pub fn read(&mut self, entry: &PartEntry, limit: usize) -> PackageResult<Vec<u8>> {
        let too_large = |size: u64| PackageError::Read {
            part: entry.path.clone(),
            message: format!("解压后大小 {} 字节超过上限 {} 字节", size, limit),
        };

        let file = self.archive.by_index(entry.index)?;
        let limit = limit as u64;
        if file.size() > limit {
            return Err(too_large(file.size()));
        }

        let mut content = Vec::new();
        file.take(limit + 1)
            .read_to_end(&mut content)
            .map_err(|e| PackageError::Read {
                part: entry.path.clone(),
                message: e.to_string(),
            })?;

        if content.len() as u64 > limit {
            return Err(too_large(content.len() as u64));
        }
        Ok(content)
    }

    /// 重建压缩包
    ///
    /// `replacements` 以条目下标为键。被替换的条目保留原压缩方式
    /// （Stored 仍为 Stored，其余写为 Deflated），其他条目按原始压缩数据拷贝。
    /// 输出中的条目顺序与输入一致。
    pub fn rebuild(mut self, replacements: &BTreeMap<usize, Vec<u8>>) -> PackageResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..self.archive.len() {
            match replacements.get(&index) {
                Some(content) => {
                    let (path, method) = {
                        let file = self.archive.by_index_raw(index)?;
                        (file.name().to_string(), file.compression())
                    };
                    let method = match method {
                        CompressionMethod::Stored => CompressionMethod::Stored,
                        _ => CompressionMethod::Deflated,
                    };

                    let options = SimpleFileOptions::default().compression_method(method);
                    writer.start_file(path.as_str(), options)?;
                    writer.write_all(content)?;
                    tracing::debug!("写入替换部件: {} ({} 字节)", path, content.len());
                }
                None => {
                    let file = self.archive.by_index_raw(index)?;
                    writer.raw_copy_file(file)?;
                }
            }
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}
