//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use tokio::sync::Notify;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_session};
use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", request_id = %request_id, elapsed_ms, "{} {} {}", method, uri, status);

    response
}

/// UUID v4 request ids for `x-request-id`
#[derive(Clone, Copy, Default)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        http::HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the Axum router (without outer layers)
///
/// | 分组 | 中间件 |
/// |------|--------|
/// | health, session, filters | 无 |
/// | orders, editor, checkout | require_session |
/// | admin | require_admin |
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let customer = Router::new()
        .merge(crate::api::orders::router())
        .merge(crate::api::editor::router())
        .merge(crate::api::checkout::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let admin = crate::api::admin::router()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::<ServerState>::new()
        // Public APIs
        .merge(crate::api::health::router())
        .merge(crate::api::session::router())
        .merge(crate::api::editor::public_router())
        // Customer APIs
        .merge(customer)
        // Admin console
        .merge(admin)
}

/// Build the complete service: routes, state and tower-http layers
pub fn build_router(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_app(&state)
        .with_state(state)
        // Tower HTTP 中间件
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(XRequestId))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Serve until Ctrl-C
    ///
    /// After the signal, open connections (including event streams) get
    /// `SHUTDOWN_TIMEOUT_MS` to finish before the server stops waiting.
    pub async fn run(&self) -> Result<()> {
        let app = build_router(self.state.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("🧱 Tile Server listening on {}", addr);

        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let mut serve = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.notified().await })
                .await
        });

        tokio::select! {
            joined = &mut serve => {
                return joined.map_err(|e| ServerError::Internal(e.into()))?.map_err(Into::into);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                shutdown.notify_one();
            }
        }

        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        match tokio::time::timeout(grace, serve).await {
            Ok(joined) => joined.map_err(|e| ServerError::Internal(e.into()))??,
            Err(_) => tracing::warn!(
                timeout_ms = self.config.shutdown_timeout_ms,
                "Connections still open after shutdown timeout, exiting anyway"
            ),
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
