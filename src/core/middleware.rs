//! 核心中间件模块

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::{any::Any, sync::Arc, time::Instant};
use tracing::{error, info, warn};

use super::error::{CoreError, ErrorResponse};

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let timestamp = chrono::Utc::now().to_rfc3339();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        "[{}] {} {} - {} - {}ms",
        timestamp,
        method,
        uri,
        status,
        duration.as_millis()
    );

    response
}

/// 认证门控
///
/// 未配置令牌时直接放行，配置后要求 `Authorization: Bearer <token>`。
#[derive(Clone, Default)]
pub struct AuthGate {
    token: Option<Arc<str>>,
}

impl AuthGate {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }

    /// 不做任何检查的放行门控
    pub fn pass_through() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    fn check(&self, authorization: Option<&str>) -> Result<(), CoreError> {
        let Some(expected) = self.token.as_deref() else {
            return Ok(());
        };

        match authorization.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) if token == expected => Ok(()),
            Some(_) => {
                warn!("认证失败: 令牌不匹配");
                Err(CoreError::Unauthorized)
            }
            None => {
                warn!("认证失败: 缺少 Bearer 令牌");
                Err(CoreError::Unauthorized)
            }
        }
    }
}

/// 认证中间件，只挂在写操作路由上
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    gate.check(authorization)?;

    Ok(next.run(req).await)
}

/// 把框架生成的无正文错误响应（如 405、408）改写为 `{"error": ...}`
///
/// 已带 `Content-Type` 的响应保持不变，405 的 `Allow` 头会保留。
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_bare_error = (status.is_client_error() || status.is_server_error())
        && !response.headers().contains_key(header::CONTENT_TYPE);

    if !is_bare_error {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Request failed");
    let mut rewritten = (status, Json(ErrorResponse::new(message))).into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        rewritten.headers_mut().insert(header::ALLOW, allow.clone());
    }

    rewritten
}

/// 处理器 panic 时的兜底响应
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("处理器发生 panic: {}", detail);

    CoreError::InternalServerError("Internal Server Error".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{self, StatusCode},
    };

    async fn error_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bare_timeout_gets_json_body() {
        let bare = http::Response::builder()
            .status(StatusCode::REQUEST_TIMEOUT)
            .body(Body::empty())
            .unwrap();

        let response = json_error_body(bare).await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            error_json(response).await,
            serde_json::json!({"error": "Request Timeout"})
        );
    }

    #[tokio::test]
    async fn test_bare_method_not_allowed_keeps_allow_header() {
        let bare = http::Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(header::ALLOW, "GET,PUT,DELETE")
            .body(Body::empty())
            .unwrap();

        let response = json_error_body(bare).await;

        assert_eq!(response.headers()[header::ALLOW], "GET,PUT,DELETE");
        assert_eq!(
            error_json(response).await,
            serde_json::json!({"error": "Method Not Allowed"})
        );
    }

    #[tokio::test]
    async fn test_json_errors_and_successes_pass_unchanged() {
        let not_found = CoreError::NotFound("Product not found".to_string()).into_response();
        let response = json_error_body(not_found).await;
        assert_eq!(
            error_json(response).await,
            serde_json::json!({"error": "Product not found"})
        );

        let ok = Response::new(Body::empty());
        let response = json_error_body(ok).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_pass_through_accepts_anything() {
        let gate = AuthGate::pass_through();
        assert!(!gate.is_enabled());
        assert!(gate.check(None).is_ok());
        assert!(gate.check(Some("garbage")).is_ok());
    }

    #[test]
    fn test_empty_token_disables_gate() {
        let gate = AuthGate::new(Some(String::new()));
        assert!(!gate.is_enabled());
    }

    #[test]
    fn test_token_required_when_configured() {
        let gate = AuthGate::new(Some("secret".to_string()));
        assert!(gate.check(Some("Bearer secret")).is_ok());
        assert!(matches!(
            gate.check(Some("Bearer wrong")),
            Err(CoreError::Unauthorized)
        ));
        assert!(matches!(gate.check(Some("secret")), Err(CoreError::Unauthorized)));
        assert!(matches!(gate.check(None), Err(CoreError::Unauthorized)));
    }
}
