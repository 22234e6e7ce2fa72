//! 认证中间件

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentCustomer, SessionStore};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// 管理后台令牌请求头
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// 认证中间件 - 要求顾客登录
///
/// 用会话存储解析 `Authorization: Bearer <token>`，并把 [`CurrentCustomer`]
/// 注入请求扩展。
///
/// | 错误 | HTTP 状态 |
/// |------|-----------|
/// | 缺少 Authorization 头 | 401 NotAuthenticated |
/// | 令牌未知或格式错误 | 401 SessionInvalid |
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS 预检请求
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let customer = resolve(state.sessions(), req.headers(), req.uri())?;
    req.extensions_mut().insert(customer);
    Ok(next.run(req).await)
}

/// 管理员中间件 - 配置了 `ADMIN_TOKEN` 时校验 `X-Admin-Token`
///
/// 未配置令牌时后台不设防。
pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if let Some(expected) = state.config().admin_token.as_deref() {
        let given = req
            .headers()
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok());
        if given != Some(expected) {
            security_log!(
                "WARN",
                "admin_denied",
                uri = format!("{:?}", req.uri()),
                header_present = given.is_some()
            );
            return Err(AppError::new(ErrorCode::AdminRequired));
        }
    }

    Ok(next.run(req).await)
}

fn resolve(
    sessions: &SessionStore,
    headers: &http::HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentCustomer, AppError> {
    let header = match headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(header) => header,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::not_authenticated());
        }
    };

    let token = SessionStore::extract_from_header(header)
        .ok_or_else(|| AppError::with_message(ErrorCode::SessionInvalid, "Invalid authorization header"))?;

    sessions.resolve(token).ok_or_else(|| {
        security_log!("WARN", "session_unknown", uri = format!("{:?}", uri));
        AppError::new(ErrorCode::SessionInvalid)
    })
}

/// 处理函数直接以 [`CurrentCustomer`] 为参数
///
/// 优先复用 [`require_session`] 注入的值，路由未挂中间件时回退到解析请求头。
impl FromRequestParts<ServerState> for CurrentCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(customer) = parts.extensions.get::<CurrentCustomer>() {
            return Ok(customer.clone());
        }

        let customer = resolve(state.sessions(), &parts.headers, &parts.uri)?;
        parts.extensions.insert(customer.clone());
        Ok(customer)
    }
}
