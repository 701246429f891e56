//! 配置模块职责：
//! 1. 按服务前缀读取监听地址、数据目录、签名密钥与令牌参数，并提供默认值。
//! 2. 未显式配置签名密钥时，在数据目录生成并持久化一个随机密钥，保证重启后令牌仍可校验。

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, bail};

use crate::api::types::{DEFAULT_TOKEN_TTL_MIN, DEFAULT_TOKEN_URL};

/// 签名密钥文件名（位于数据目录下）。
const SIGNING_KEY_FILE: &str = "signing-key";
/// 共享路由已占用的路径。
const RESERVED_PATHS: [&str; 2] = ["/healthz", "/register/"];

/// 单个服务的静态描述。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSpec {
    /// 服务名，用于日志文件名与默认数据目录。
    pub name: &'static str,
    /// 二进制名，用于 CLI 帮助。
    pub binary: &'static str,
    /// 环境变量前缀，例如 `NOTES` 对应 `NOTES_ADDR`。
    pub env_prefix: &'static str,
    pub default_addr: &'static str,
    /// 账号集合 key。
    pub accounts_key: &'static str,
}

/// 签名密钥来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    File,
}

impl KeySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::File => "file",
        }
    }
}

/// 服务运行时配置。
#[derive(Clone)]
pub struct GateConfig {
    pub service: ServiceSpec,
    /// HTTP 监听地址。
    pub addr: String,
    /// 集合文件所在目录。
    pub data_dir: PathBuf,
    pub signing_key: String,
    pub signing_key_source: KeySource,
    /// access token 默认有效期。
    pub token_ttl: Duration,
    /// 登录地址。
    pub token_url: String,
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("service", &self.service.name)
            .field("addr", &self.addr)
            .field("data_dir", &self.data_dir)
            .field("signing_key", &"<redacted>")
            .field("signing_key_source", &self.signing_key_source)
            .field("token_ttl", &self.token_ttl)
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl GateConfig {
    /// 从进程环境变量构建配置。
    pub fn from_env(service: ServiceSpec) -> anyhow::Result<Self> {
        Self::from_lookup(service, |key| std::env::var(key).ok())
    }

    /// 从任意 key 查询函数构建配置。
    pub fn from_lookup<F>(service: ServiceSpec, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            lookup(&format!("{}_{suffix}", service.env_prefix))
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let addr = var("ADDR").unwrap_or_else(|| service.default_addr.to_string());
        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data").join(service.name));
        let token_ttl = var("TOKEN_TTL_MIN")
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|minutes| *minutes > 0)
            .map(|minutes| Duration::from_secs(minutes * 60))
            .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_TTL_MIN * 60));
        let token_url = match var("TOKEN_URL") {
            Some(raw) => normalize_token_url(&raw)?,
            None => DEFAULT_TOKEN_URL.to_string(),
        };

        let (signing_key, signing_key_source) = match var("SECRET_KEY") {
            Some(key) => (key, KeySource::Env),
            None => {
                let path = data_dir.join(SIGNING_KEY_FILE);
                let key = load_or_create_signing_key(&path)
                    .with_context(|| format!("prepare signing key: {}", path.display()))?;
                (key, KeySource::File)
            }
        };

        Ok(Self {
            service,
            addr,
            data_dir,
            signing_key,
            signing_key_source,
            token_ttl,
            token_url,
        })
    }
}

/// 登录路径必须以 `/` 开头，且不能占用共享的健康检查与注册路径。
fn normalize_token_url(raw: &str) -> anyhow::Result<String> {
    let path = if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    };
    if RESERVED_PATHS.contains(&path.as_str()) {
        bail!("token url {path} collides with a built-in route");
    }
    Ok(path)
}

/// 读取已持久化的签名密钥；不存在或为空时生成新密钥并落盘。
pub fn load_or_create_signing_key(path: &Path) -> anyhow::Result<String> {
    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read signing key failed: {}", path.display()))?;
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create data dir failed: {}", parent.display()))?;
    }
    let key = generate_signing_key_seed();
    fs::write(path, format!("{key}\n"))
        .with_context(|| format!("write signing key failed: {}", path.display()))?;
    Ok(key)
}

/// 生成服务自身 token 签名种子。
pub fn generate_signing_key_seed() -> String {
    format!(
        "fg_sk_{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}
