//! Web 路由定义

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::web::{handlers::*, types::AppState};

/// 创建路由
///
/// `/api/translate` 只接受 POST，其他方法在进入翻译逻辑之前即被拒绝。
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/translate",
        post(translate_pptx).fallback(method_not_allowed),
    )
}
