//! 账号记录与角色。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 账号角色；未设置角色的账号不匹配任何角色闸门。
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 持久化账号记录，按 username 存入账号集合。
///
/// 哈希字段在文件里沿用 `password` 这个键名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Account {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}
