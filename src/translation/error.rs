//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制：
//! - `TranslationError`: 单次翻译调用及配置的错误
//! - `PartFailure`: 某个部件中某个文本叶子翻译失败
//! - `PackageError`: 整个演示文稿处理失败（全有或全无）

use std::fmt;

use thiserror::Error;

use crate::parsers::XmlError;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// 翻译服务返回非成功状态
    #[error("翻译服务错误 {status}: {body}")]
    Provider { status: u16, body: String },

    /// 网络错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    Timeout(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::Provider { status, .. } => *status >= 500,
            TranslationError::Network(_) => true,
            TranslationError::Timeout(_) => true,
            TranslationError::Config(_) => false,
            TranslationError::InvalidInput(_) => false,
            TranslationError::Serialization(_) => false,
            TranslationError::Internal(_) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::Provider { status, .. } if *status >= 500 => ErrorSeverity::Warning,
            TranslationError::Provider { .. } => ErrorSeverity::Error,
            TranslationError::Network(_) => ErrorSeverity::Warning,
            TranslationError::Timeout(_) => ErrorSeverity::Warning,
            TranslationError::Config(_) => ErrorSeverity::Critical,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::Serialization(_) => ErrorSeverity::Error,
            TranslationError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::Provider { .. } => ErrorCategory::Provider,
            TranslationError::Network(_) => ErrorCategory::Network,
            TranslationError::Timeout(_) => ErrorCategory::Timeout,
            TranslationError::Config(_) => ErrorCategory::Configuration,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::Serialization(_) => ErrorCategory::Serialization,
            TranslationError::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Provider,
    Network,
    Timeout,
    Configuration,
    Input,
    Serialization,
    Internal,
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::Serialization(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::Config(format!("TOML解析错误: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::Timeout(error.to_string())
        } else {
            TranslationError::Network(error.to_string())
        }
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 部件内某个文本叶子的翻译失败
///
/// 失败之前已写回的叶子不会回滚；上层会整体丢弃该部件。
#[derive(Error, Debug, Clone, PartialEq)]
#[error("第 {leaf_index} 个文本节点翻译失败: {source}")]
pub struct PartFailure {
    /// 失败叶子在遍历顺序中的下标
    pub leaf_index: usize,
    /// 失败叶子的原文
    pub text: String,
    #[source]
    pub source: TranslationError,
}

/// 演示文稿级别的错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackageError {
    /// 压缩包无法读取或写出
    #[error("压缩包错误: {0}")]
    Archive(String),

    /// 选中的部件无法解析
    #[error("部件 {part} 解析失败: {source}")]
    Parse {
        part: String,
        #[source]
        source: XmlError,
    },

    /// 部件内容读取失败
    #[error("部件 {part} 读取失败: {message}")]
    Read { part: String, message: String },

    /// 某个部件翻译失败，整个文稿被拒绝
    #[error("部件 {part} 翻译失败: {failure}")]
    Translation {
        part: String,
        #[source]
        failure: PartFailure,
    },
}

impl PackageError {
    /// 失败的部件路径
    pub fn part(&self) -> Option<&str> {
        match self {
            PackageError::Archive(_) => None,
            PackageError::Parse { part, .. }
            | PackageError::Read { part, .. }
            | PackageError::Translation { part, .. } => Some(part),
        }
    }

    /// 底层的翻译服务错误
    pub fn provider_error(&self) -> Option<&TranslationError> {
        match self {
            PackageError::Translation { failure, .. } => Some(&failure.source),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for PackageError {
    fn from(error: zip::result::ZipError) -> Self {
        PackageError::Archive(error.to_string())
    }
}

impl From<std::io::Error> for PackageError {
    fn from(error: std::io::Error) -> Self {
        PackageError::Archive(format!("IO错误: {}", error))
    }
}

pub type PackageResult<T> = Result<T, PackageError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::Config(msg.to_string())
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }
}
