//! Web 模块的数据类型定义

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::package::PackageOptions;
use crate::translation::config::TranslationConfig;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 翻译服务地址、超时、重试等设置；凭据来自请求
    pub translation: TranslationConfig,
    /// 部件选择规则
    pub package: PackageOptions,
    /// 下载源文件与调用翻译服务共用的HTTP客户端
    pub http: reqwest::Client,
    /// 单个请求的整体处理超时
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(translation: TranslationConfig, request_timeout: Duration) -> Self {
        Self {
            package: PackageOptions::from_config(&translation),
            translation,
            http: reqwest::Client::new(),
            request_timeout,
        }
    }
}

/// 翻译请求
///
/// 所有字段都按可选解析，缺失与空白由处理器统一报告。
#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(alias = "source_url")]
    pub file_url: Option<String>,
    pub source_lang: Option<String>,
    pub dest_lang: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// 字段齐全的翻译请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub file_url: String,
    pub source_lang: String,
    pub dest_lang: String,
    pub client_id: String,
    pub client_secret: String,
}

impl TranslateRequest {
    /// 全部字段非空时返回规整后的请求
    pub fn validate(self) -> Option<ValidatedRequest> {
        fn field(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Some(ValidatedRequest {
            file_url: field(self.file_url)?,
            source_lang: field(self.source_lang)?,
            dest_lang: field(self.dest_lang)?,
            client_id: field(self.client_id)?,
            client_secret: field(self.client_secret)?,
        })
    }
}

/// 处理器错误响应
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// 构造 `{ "error": message }` 错误响应
pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
}
