//! 共享 HTTP 路由处理函数：注册、登录与健康检查。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    api::{
        error::ApiError,
        types::{MessageResponse, RegisterRequest, TokenResponse},
    },
    extract::{LoginPayload, ValidJson},
    gate::Gate,
};

/// 注册、登录与健康检查路由；服务可在其上再叠加业务路由。
pub fn auth_routes<S>(token_url: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<Gate>: FromRef<S>,
{
    login_routes(token_url).route("/register/", post(register_handler))
}

/// 仅登录与健康检查路由，供自带注册接口的服务使用；登录接口挂在 `token_url`。
pub fn login_routes<S>(token_url: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<Gate>: FromRef<S>,
{
    Router::new()
        .route("/healthz", get(healthz))
        .route(token_url, post(login_handler))
}

/// 健康检查接口。
pub async fn healthz() -> &'static str {
    "ok"
}

/// 注册接口：201 成功，400 用户名已存在。
pub async fn register_handler(
    State(gate): State<Arc<Gate>>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let account = gate.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "User {} registered successfully",
            account.username
        ))),
    ))
}

/// 登录接口：返回 bearer 令牌。
pub async fn login_handler(
    State(gate): State<Arc<Gate>>,
    LoginPayload(req): LoginPayload,
) -> Result<Json<TokenResponse>, ApiError> {
    gate.login(&req.username, &req.password).await.map(Json)
}
