//! 笔记读写：只允许令牌持有者读写自己名下的笔记。

use fg_shared_gate::{
    ApiError,
    api::types::MessageResponse,
    store::{owned_list, push_owned},
};
use tracing::info;

use crate::{
    state::{AppState, NOTES_KEY},
    types::Note,
};

impl AppState {
    /// 追加一条笔记。
    pub(crate) async fn add_note(
        &self,
        owner: &str,
        note: Note,
    ) -> Result<MessageResponse, ApiError> {
        if note.title.trim().is_empty() {
            return Err(ApiError::validation("Note title must not be empty"));
        }

        let _guard = self.gate.lock_writes().await;
        let message = format!("Note '{}' added successfully", note.title);
        let count = push_owned(self.store(), NOTES_KEY, owner, note)?;
        info!("{owner} now has {count} note(s)");
        Ok(MessageResponse::new(message))
    }

    /// 读取当前用户的笔记；没有时为空列表。
    pub(crate) fn list_notes(&self, owner: &str) -> Vec<Note> {
        owned_list(self.store(), NOTES_KEY, owner)
    }
}
