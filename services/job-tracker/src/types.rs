//! 求职申请请求/响应类型。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 单条求职申请，既是请求体也是存储记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct JobApplication {
    pub(crate) job_title: String,
    pub(crate) company: String,
    pub(crate) date_applied: NaiveDate,
    /// 自由文本，例如 `applied` / `interview` / `rejected`。
    pub(crate) status: String,
}
