//! Web 服务器模块
//!
//! 提供 `POST /api/translate`：下载源文稿，翻译后返回新的 `.pptx`

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::translation::config::TranslationConfig;
use crate::translation::error::TranslationError;

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    translation: TranslationConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, translation: TranslationConfig) -> Self {
        Self {
            config,
            translation,
        }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> Result<(), TranslationError> {
        let app_state = Arc::new(AppState::new(
            self.translation.clone(),
            self.config.request_timeout,
        ));
        let app = create_router(app_state);

        let listener = tokio::net::TcpListener::bind(self.config.listen_address())
            .await
            .map_err(|e| TranslationError::Config(format!("Failed to bind server: {}", e)))?;

        tracing::info!(
            "Web server starting at http://{}",
            self.config.listen_address()
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TranslationError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
