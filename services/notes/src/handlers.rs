//! Notes HTTP 路由处理函数。

use axum::{Json, extract::State, http::StatusCode};
use fg_shared_gate::{
    ApiError,
    api::types::MessageResponse,
    extract::{CurrentAccount, ValidJson},
};

use crate::{state::AppState, types::Note};

/// 新增笔记（需令牌）。
pub(crate) async fn add_note_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ValidJson(note): ValidJson<Note>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = state.add_note(&account.username, note).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// 当前用户的全部笔记（需令牌）。
pub(crate) async fn list_notes_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Json<Vec<Note>> {
    Json(state.list_notes(&account.username))
}
