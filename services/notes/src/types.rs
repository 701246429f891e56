//! Notes 请求/响应类型。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单条笔记，既是请求体也是存储记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Note {
    pub(crate) title: String,
    pub(crate) content: String,
    /// `YYYY-MM-DD`。
    pub(crate) date: NaiveDate,
}
