//! 学生门户 HTTP 路由处理函数。

use axum::{Json, extract::State, http::StatusCode};
use fg_shared_gate::{
    ApiError,
    api::types::MessageResponse,
    extract::{CurrentAccount, ValidJson},
};

use crate::{
    state::AppState,
    types::{GradeReport, StudentRegisterRequest},
};

/// 学生注册接口。
pub(crate) async fn register_student_handler(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<StudentRegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = state.register_student(req).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// 当前学生的成绩与平均分（需令牌）。
pub(crate) async fn grades_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Json<GradeReport> {
    Json(state.grade_report(&account.username))
}
