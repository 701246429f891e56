//! Flatgate 共享鉴权库：四个服务共用的账号、密码、令牌与存储抽象。
//!
//! 各服务只需提供一组集合 key 与配置前缀，注册、登录、Bearer 校验与角色闸门全部复用本 crate。

pub mod account;
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod extract;
pub mod gate;
pub mod handlers;
pub mod logging;
pub mod password;
pub mod store;
pub mod token;

pub use account::{Account, Role};
pub use api::error::{ApiError, ErrorKind};
pub use config::{GateConfig, ServiceSpec};
pub use gate::Gate;
pub use store::{Collection, CollectionStore, JsonFileStore, MemoryStore};
pub use token::{TokenClaims, TokenError, TokenSigner};

/// 当前 unix 秒。
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
