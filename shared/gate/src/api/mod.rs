//! API 公共类型：错误映射与请求/响应结构。

pub mod error;
pub mod types;
