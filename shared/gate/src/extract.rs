//! axum 提取器：Bearer 令牌、当前账号、管理员账号、登录请求体与 JSON 请求体。

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
    },
};

use serde::de::DeserializeOwned;

use crate::{
    account::{Account, Role},
    api::{
        error::ApiError,
        types::{LoginRequest, NOT_AUTHENTICATED_MESSAGE},
    },
    gate::Gate,
};

/// `Authorization: Bearer <token>` 中的令牌原文。
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(AUTHORIZATION) else {
            return Err(ApiError::unauthorized(NOT_AUTHENTICATED_MESSAGE));
        };
        let raw = raw
            .to_str()
            .map_err(|_| ApiError::unauthorized(NOT_AUTHENTICATED_MESSAGE))?;
        parse_bearer(raw)
            .map(|token| Self(token.to_string()))
            .ok_or_else(|| ApiError::unauthorized(NOT_AUTHENTICATED_MESSAGE))
    }
}

/// 解析 Bearer 头；scheme 不区分大小写。
pub fn parse_bearer(raw: &str) -> Option<&str> {
    let (scheme, token) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// 已通过令牌校验的当前账号。
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
    Arc<Gate>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let gate = Arc::<Gate>::from_ref(state);
        gate.verify_token(&token).map(Self)
    }
}

/// 角色为 admin 的当前账号。
#[derive(Debug, Clone)]
pub struct AdminAccount(pub Account);

impl<S> FromRequestParts<S> for AdminAccount
where
    S: Send + Sync,
    Arc<Gate>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;
        Gate::require_role(account, Role::Admin).map(Self)
    }
}

/// 登录请求体：JSON 或 `application/x-www-form-urlencoded`（OAuth2 密码表单）。
#[derive(Debug, Clone)]
pub struct LoginPayload(pub LoginRequest);

impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(login) = Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|err| ApiError::validation(err.body_text()))?;
            return Ok(Self(login));
        }

        let ValidJson(login) = ValidJson::<LoginRequest>::from_request(req, state).await?;
        Ok(Self(login))
    }
}

/// JSON 请求体；缺字段、类型不符或语法错误统一映射为 400 校验错误。
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| ApiError::validation(err.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::Body,
        extract::{FromRequest, FromRequestParts},
        http::{
            Request, StatusCode,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
        response::IntoResponse,
    };

    use super::{AdminAccount, CurrentAccount, LoginPayload, ValidJson, parse_bearer};
    use crate::{
        account::Role,
        api::{error::ErrorKind, types::RegisterRequest},
        gate::Gate,
        store::MemoryStore,
        token::TokenSigner,
    };

    fn gate() -> Arc<Gate> {
        let signer = TokenSigner::new(b"extract-key".to_vec(), Duration::from_secs(600));
        Arc::new(Gate::new(Arc::new(MemoryStore::new()), signer, "users"))
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(parse_bearer("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("bearer   abc "), Some("abc"));
        assert_eq!(parse_bearer("Basic abc"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("abc"), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_header_is_unauthorized() {
        let gate = gate();
        let (mut parts, _) = Request::builder()
            .uri("/notes/")
            .body(())
            .expect("request")
            .into_parts();
        let err = CurrentAccount::from_request_parts(&mut parts, &gate)
            .await
            .expect_err("no header");
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn admin_extractor_rejects_customer_and_accepts_admin() {
        let gate = gate();
        for (name, role) in [("root", Role::Admin), ("carol", Role::Customer)] {
            gate.register(RegisterRequest {
                username: name.to_string(),
                password: "pw".to_string(),
                role: Some(role),
            })
            .await
            .expect("registration");
        }

        let customer_token = gate.issue_token("carol", None).expect("issue");
        let (mut parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {customer_token}"))
            .body(())
            .expect("request")
            .into_parts();
        let err = AdminAccount::from_request_parts(&mut parts, &gate)
            .await
            .expect_err("customer is not admin");
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let admin_token = gate.issue_token("root", None).expect("issue");
        let (mut parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {admin_token}"))
            .body(())
            .expect("request")
            .into_parts();
        let AdminAccount(account) = AdminAccount::from_request_parts(&mut parts, &gate)
            .await
            .expect("admin passes");
        assert_eq!(account.username, "root");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn login_payload_accepts_form_and_json() {
        let form = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=alice&password=pw123"))
            .expect("request");
        let LoginPayload(login) = LoginPayload::from_request(form, &())
            .await
            .expect("form body");
        assert_eq!(login.username, "alice");
        assert_eq!(login.password, "pw123");

        let json = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"bob","password":"pw"}"#))
            .expect("request");
        let LoginPayload(login) = LoginPayload::from_request(json, &())
            .await
            .expect("json body");
        assert_eq!(login.username, "bob");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn incomplete_json_body_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"bob"}"#))
            .expect("request");
        let err = ValidJson::<RegisterRequest>::from_request(req, &())
            .await
            .expect_err("password missing");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("password"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let req = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let err = LoginPayload::from_request(req, &())
            .await
            .expect_err("syntax error");
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
