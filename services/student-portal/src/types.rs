//! 学生门户请求/响应类型。

use serde::{Deserialize, Serialize};

/// 学生注册请求，可同时录入成绩。
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StudentRegisterRequest {
    pub(crate) username: String,
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) grades: Vec<f64>,
}

/// 成绩查询返回。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct GradeReport {
    pub(crate) username: String,
    pub(crate) grades: Vec<f64>,
    /// 保留两位小数；没有成绩时为 `null`。
    pub(crate) average: Option<f64>,
}
