//! 翻译服务客户端
//!
//! `TranslationClient` 是翻译核心唯一依赖的外部接口：
//! 给定文本和语言对，返回译文或失败。
//!
//! - `PapagoClient`: 调用 Papago n2mt 接口，带客户端级别的重试
//! - `IdentityClient`: 原样返回输入，用于试运行和保真度检查

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::sleep;

use crate::translation::config::TranslationConfig;
use crate::translation::error::{helpers, TranslationError, TranslationResult};

/// 翻译客户端接口
///
/// 调用方保证传入的文本不是空白；客户端可以假设输入非空。
#[async_trait]
pub trait TranslationClient: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String>;
}

/// 原样返回输入的客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityClient;

#[async_trait]
impl TranslationClient for IdentityClient {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> TranslationResult<String> {
        Ok(text.to_string())
    }
}

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub enabled: bool,
    /// 首次请求之后最多再尝试的次数
    pub max_retries: usize,
    /// 线性退避的基础间隔
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            enabled: config.retry_enabled,
            max_retries: config.max_retry_attempts,
            backoff: config.retry_backoff(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    fn total_attempts(&self) -> usize {
        if self.enabled {
            self.max_retries + 1
        } else {
            1
        }
    }
}

#[derive(Deserialize)]
struct PapagoResponse {
    message: PapagoMessage,
}

#[derive(Deserialize)]
struct PapagoMessage {
    result: PapagoResult,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PapagoResult {
    translated_text: String,
}

/// 从成功响应中取出译文
fn parse_response(body: &str) -> TranslationResult<String> {
    let response: PapagoResponse = serde_json::from_str(body).map_err(|e| {
        TranslationError::Serialization(format!("无法读取翻译结果: {}", e))
    })?;
    Ok(response.message.result.translated_text)
}

/// Papago 翻译客户端
#[derive(Debug, Clone)]
pub struct PapagoClient {
    http: reqwest::Client,
    api_url: String,
    client_id: String,
    client_secret: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl PapagoClient {
    /// 使用配置中的凭据创建客户端
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        let (client_id, client_secret) = config.credentials().ok_or_else(|| {
            helpers::config_error("缺少翻译服务凭据 (client_id / client_secret)")
        })?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TranslationError::Internal(format!("创建HTTP客户端失败: {}", e)))?;

        Self::with_http_client(http, config, client_id, client_secret)
    }

    /// 复用已有的HTTP客户端，凭据由调用方提供
    pub fn with_http_client(
        http: reqwest::Client,
        config: &TranslationConfig,
        client_id: &str,
        client_secret: &str,
    ) -> TranslationResult<Self> {
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(helpers::validation_error("翻译服务凭据不能为空"));
        }

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            timeout: config.request_timeout(),
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// 单次请求，不重试
    async fn request(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("source", source_lang)
            .append_pair("target", target_lang)
            .append_pair("text", text)
            .finish();

        let response = self
            .http
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .body(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TranslationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }
}

#[async_trait]
impl TranslationClient for PapagoClient {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let total_attempts = self.retry.total_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.request(text, source_lang, target_lang).await {
                Ok(translated) => return Ok(translated),
                Err(e) if e.is_retryable() && attempt < total_attempts => {
                    let delay = self.retry.backoff * attempt as u32;
                    tracing::warn!(
                        "翻译请求失败，{}ms后重试 (尝试 {}/{}): {}",
                        delay.as_millis(),
                        attempt + 1,
                        total_attempts,
                        e
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    helpers::log_error(&e);
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_papago_response() {
        let body = r#"{"message":{"@type":"response","result":{"srcLangType":"en","tarLangType":"ko","translatedText":"안녕하세요"}}}"#;
        assert_eq!(parse_response(body).unwrap(), "안녕하세요");
    }

    #[test]
    fn test_unexpected_response_shape() {
        let result = parse_response(r#"{"errorCode":"024"}"#);
        assert!(matches!(result, Err(TranslationError::Serialization(_))));
    }

    #[test]
    fn test_credentials_required() {
        let config = TranslationConfig::default();
        assert!(matches!(
            PapagoClient::from_config(&config),
            Err(TranslationError::Config(_))
        ));

        let result =
            PapagoClient::with_http_client(reqwest::Client::new(), &config, "id", "  ");
        assert!(matches!(result, Err(TranslationError::InvalidInput(_))));
    }

    #[test]
    fn test_retry_attempts() {
        let mut config = TranslationConfig::default();
        config.max_retry_attempts = 3;
        assert_eq!(RetryPolicy::from_config(&config).total_attempts(), 4);

        config.retry_enabled = false;
        assert_eq!(RetryPolicy::from_config(&config).total_attempts(), 1);
        assert_eq!(RetryPolicy::disabled().total_attempts(), 1);
    }

    #[tokio::test]
    async fn test_identity_client() {
        let translated = IdentityClient.translate("Hello", "en", "en").await.unwrap();
        assert_eq!(translated, "Hello");
    }
}
