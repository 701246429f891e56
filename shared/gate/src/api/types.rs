//! API 请求/响应类型。

use serde::{Deserialize, Serialize};

use crate::account::Role;

/// 注册请求。
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// 登录请求（JSON 或 OAuth2 表单）。
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录返回。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        }
    }
}

/// 仅含提示文案的通用成功响应。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 登录返回中的令牌类型。
pub const TOKEN_TYPE: &str = "bearer";
/// 默认 access token 有效期（分钟）。
pub const DEFAULT_TOKEN_TTL_MIN: u64 = 30;
/// 默认登录地址，会出现在 doctor 输出中。
pub const DEFAULT_TOKEN_URL: &str = "/login/";
/// 令牌校验失败时返回给客户端的统一文案。
pub const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";
/// 登录失败文案：不区分用户名不存在与密码错误。
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password";
/// 未携带 Bearer 头时的文案。
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Not authenticated";
