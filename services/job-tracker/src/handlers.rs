//! 求职申请 HTTP 路由处理函数。

use axum::{Json, extract::State, http::StatusCode};
use fg_shared_gate::{
    ApiError,
    api::types::MessageResponse,
    extract::{CurrentAccount, ValidJson},
};

use crate::{state::AppState, types::JobApplication};

/// 新增求职申请（需令牌）。
pub(crate) async fn add_application_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ValidJson(application): ValidJson<JobApplication>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = state
        .add_application(&account.username, application)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// 当前用户的全部求职申请（需令牌）。
pub(crate) async fn list_applications_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Json<Vec<JobApplication>> {
    Json(state.list_applications(&account.username))
}
