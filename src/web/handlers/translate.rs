//! 演示文稿翻译API处理器

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::translation::config::constants;
use crate::translation::core::{PackageTranslator, PapagoClient};
use crate::translation::error::PackageError;
use crate::web::types::{api_error, ApiError, AppState, TranslateRequest, ValidatedRequest};

/// 翻译 PPTX 处理器
///
/// 下载 `file_url` 指向的文稿，翻译全部幻灯片文本后返回新的文稿字节。
pub async fn translate_pptx(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = serde_json::from_slice::<TranslateRequest>(&body)
        .ok()
        .and_then(TranslateRequest::validate)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing fields"))?;

    let source = url::Url::parse(&request.file_url)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "file_url must be an http(s) URL"))?;

    tracing::info!(
        "收到翻译请求: {} ({} -> {})",
        source,
        request.source_lang,
        request.dest_lang
    );

    match tokio::time::timeout(state.request_timeout, process(&state, source, &request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("翻译请求超时: {}", request.file_url);
            Err(api_error(
                StatusCode::GATEWAY_TIMEOUT,
                format!("Request timed out after {}s", state.request_timeout.as_secs()),
            ))
        }
    }
}

/// 非 POST 请求
pub async fn method_not_allowed() -> ApiError {
    api_error(StatusCode::METHOD_NOT_ALLOWED, "POST only")
}

async fn process(
    state: &AppState,
    source: url::Url,
    request: &ValidatedRequest,
) -> Result<Response, ApiError> {
    let deck = fetch_deck(state, source).await?;

    let client = PapagoClient::with_http_client(
        state.http.clone(),
        &state.translation,
        &request.client_id,
        &request.client_secret,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let translator = PackageTranslator::new(state.package.clone());
    let translated = translator
        .translate_package(&deck, &request.source_lang, &request.dest_lang, &client)
        .await
        .map_err(|e| package_error(&e))?;

    tracing::info!(
        "翻译完成: {} 个部件，{} 次翻译调用，输出 {} 字节",
        translated.stats.parts_translated,
        translated.stats.provider_calls,
        translated.bytes.len()
    );

    Ok((
        [(header::CONTENT_TYPE, constants::PPTX_CONTENT_TYPE)],
        translated.bytes,
    )
        .into_response())
}

/// 下载源文稿，超过大小上限时提前中止
async fn fetch_deck(state: &AppState, source: url::Url) -> Result<Vec<u8>, ApiError> {
    let max_bytes = state.translation.max_archive_bytes;

    let mut response = state.http.get(source).send().await.map_err(|e| {
        tracing::warn!("下载源文稿失败: {}", e);
        api_error(StatusCode::BAD_REQUEST, format!("Fetch PPTX failed: {}", e))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Fetch PPTX failed {}", status.as_u16()),
        ));
    }

    let too_large = || {
        api_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("PPTX exceeds {} bytes", max_bytes),
        )
    };

    if response
        .content_length()
        .is_some_and(|length| length > max_bytes as u64)
    {
        return Err(too_large());
    }

    let mut deck = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| {
        api_error(StatusCode::BAD_REQUEST, format!("Fetch PPTX failed: {}", e))
    })? {
        if deck.len() + chunk.len() > max_bytes {
            return Err(too_large());
        }
        deck.extend_from_slice(&chunk);
    }

    tracing::debug!("已下载源文稿: {} 字节", deck.len());
    Ok(deck)
}

fn package_error(error: &PackageError) -> ApiError {
    tracing::error!("文稿翻译失败: {}", error);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}
