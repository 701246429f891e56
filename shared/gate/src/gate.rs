//! 凭证与令牌闸门：注册、登录、Bearer 校验与角色校验。
//!
//! 令牌无状态、不可提前吊销；校验时除签名与有效期外，还要求 subject 仍存在于账号集合中。

use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::{
    account::{Account, Role},
    api::{
        error::ApiError,
        types::{INVALID_LOGIN_MESSAGE, RegisterRequest, TokenResponse},
    },
    config::GateConfig,
    password,
    store::{CollectionStore, load_records, save_records},
    token::TokenSigner,
};

/// 共享闸门；各服务通过 `Arc<Gate>` 注入到 handler。
pub struct Gate {
    store: Arc<dyn CollectionStore>,
    signer: TokenSigner,
    accounts_key: String,
    /// 进程内串行化“读-改-写”，跨进程仍是整文件后写覆盖。
    write_lock: Mutex<()>,
}

impl Gate {
    pub fn new(
        store: Arc<dyn CollectionStore>,
        signer: TokenSigner,
        accounts_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            signer,
            accounts_key: accounts_key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 按服务配置装配闸门。
    pub fn from_config(config: &GateConfig, store: Arc<dyn CollectionStore>) -> Self {
        let signer = TokenSigner::new(config.signing_key.as_bytes().to_vec(), config.token_ttl);
        Self::new(store, signer, config.service.accounts_key)
    }

    pub fn store(&self) -> &dyn CollectionStore {
        self.store.as_ref()
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// 获取进程内写锁，持有期间完成一次集合的读-改-写。
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// 按用户名查找账号。
    pub fn find_account(&self, username: &str) -> Option<Account> {
        load_records::<Account>(self.store(), &self.accounts_key).remove(username)
    }

    /// 注册新账号；用户名已存在时拒绝，且不改动已有哈希。
    pub async fn register(&self, req: RegisterRequest) -> Result<Account, ApiError> {
        self.register_with(req, |_| Ok(())).await
    }

    /// 注册新账号，并在同一把写锁内执行 `persist_extra` 写入附属数据。
    ///
    /// `persist_extra` 失败时撤回刚写入的账号，调用方可以原样重试。
    /// 它运行在写锁内，不能再调用 [`Gate::lock_writes`]。
    pub async fn register_with<F>(
        &self,
        req: RegisterRequest,
        persist_extra: F,
    ) -> Result<Account, ApiError>
    where
        F: FnOnce(&Account) -> Result<(), ApiError>,
    {
        let username = normalize_username(&req.username).to_string();
        if username.is_empty() {
            return Err(ApiError::validation("Username must not be empty"));
        }
        if req.password.is_empty() {
            return Err(ApiError::validation("Password must not be empty"));
        }
        if self.find_account(&username).is_some() {
            return Err(ApiError::validation("Username already exists"));
        }

        let password_hash = hash_blocking(req.password).await?;

        let _guard = self.lock_writes().await;
        let mut accounts = load_records::<Account>(self.store(), &self.accounts_key);
        if accounts.contains_key(&username) {
            return Err(ApiError::validation("Username already exists"));
        }
        let account = Account {
            username: username.clone(),
            password_hash,
            role: req.role,
        };
        accounts.insert(username.clone(), account.clone());
        save_records(self.store(), &self.accounts_key, &accounts)?;

        if let Err(err) = persist_extra(&account) {
            accounts.remove(&username);
            if let Err(rollback) = save_records(self.store(), &self.accounts_key, &accounts) {
                error!("rollback of account {username} failed: {rollback}");
            }
            warn!("registration of {username} rolled back: {err}");
            return Err(err);
        }

        info!(
            "registered account {username} (role={})",
            account.role.map(Role::as_str).unwrap_or("none")
        );
        Ok(account)
    }

    /// 校验用户名与密码；任一不匹配都返回 `None`，不区分原因。
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, ApiError> {
        let Some(account) = self.find_account(normalize_username(username)) else {
            return Ok(None);
        };
        let matched = verify_blocking(password.to_string(), account.password_hash.clone()).await?;
        Ok(matched.then_some(account))
    }

    /// 登录：校验凭证并以默认有效期签发 bearer 令牌。
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let Some(account) = self.authenticate(username, password).await? else {
            warn!("login rejected for {username}");
            return Err(ApiError::unauthorized(INVALID_LOGIN_MESSAGE));
        };
        let token = self.issue_token(&account.username, None)?;
        info!("issued access token for {}", account.username);
        Ok(TokenResponse::bearer(token))
    }

    /// 为用户名签发令牌，`ttl` 为空时使用配置的默认有效期。
    pub fn issue_token(&self, username: &str, ttl: Option<Duration>) -> Result<String, ApiError> {
        let ttl = ttl.unwrap_or_else(|| self.signer.ttl());
        self.signer
            .issue_with_ttl(username, ttl)
            .map_err(|err| ApiError::internal(format!("issue access token failed: {err}")))
    }

    /// 校验 bearer 令牌并返回其 subject 对应的账号。
    pub fn verify_token(&self, token: &str) -> Result<Account, ApiError> {
        let claims = self.signer.decode(token).map_err(|err| {
            debug!("reject bearer token: {err}");
            ApiError::credentials()
        })?;
        self.find_account(&claims.sub).ok_or_else(|| {
            debug!("reject bearer token: subject {} not found", claims.sub);
            ApiError::credentials()
        })
    }

    /// 角色闸门：账号角色不匹配时返回 403。
    pub fn require_role(account: Account, role: Role) -> Result<Account, ApiError> {
        if account.has_role(role) {
            return Ok(account);
        }
        let message = match role {
            Role::Admin => "Admin access required".to_string(),
            other => format!("{} access required", other.as_str()),
        };
        Err(ApiError::forbidden(message))
    }
}

/// 注册与登录共用的用户名规范化：去掉首尾空白。
fn normalize_username(raw: &str) -> &str {
    raw.trim()
}

/// 在阻塞线程池中计算密码哈希。
async fn hash_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(|err| ApiError::internal(format!("hash task failed: {err}")))?
}

/// 在阻塞线程池中校验密码。
async fn verify_blocking(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || password::verify(&password, &hash))
        .await
        .map_err(|err| ApiError::internal(format!("verify task failed: {err}")))
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::Gate;
    use crate::{
        account::Role,
        api::{
            error::{ApiError, ErrorKind},
            types::RegisterRequest,
        },
        store::{CollectionStore, MemoryStore},
        token::TokenSigner,
        unix_now,
    };

    fn gate_with_store() -> (Gate, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let signer = TokenSigner::new(b"gate-test-key".to_vec(), Duration::from_secs(1800));
        (Gate::new(store.clone(), signer, "users"), store)
    }

    fn register_req(username: &str, password: &str, role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role,
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn duplicate_registration_keeps_first_hash() {
        let (gate, _) = gate_with_store();
        let first = gate
            .register(register_req("alice", "pw123", None))
            .await
            .expect("first registration");

        let err = gate
            .register(register_req("alice", "other", None))
            .await
            .expect_err("second registration must fail");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Username already exists");

        let stored = gate.find_account("alice").expect("account stored");
        assert_eq!(stored.password_hash, first.password_hash);
        assert!(gate.authenticate("alice", "pw123").await.expect("auth").is_some());
        assert!(gate.authenticate("alice", "other").await.expect("auth").is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_credentials_are_rejected() {
        let (gate, _) = gate_with_store();
        let err = gate
            .register(register_req("  ", "pw", None))
            .await
            .expect_err("blank username");
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = gate
            .register(register_req("bob", "", None))
            .await
            .expect_err("blank password");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn login_failures_are_uniform() {
        let (gate, _) = gate_with_store();
        gate.register(register_req("alice", "pw123", None))
            .await
            .expect("registration");

        let unknown = gate.login("nobody", "pw123").await.expect_err("unknown user");
        let wrong = gate.login("alice", "nope").await.expect_err("wrong password");
        assert_eq!(unknown.kind, ErrorKind::Unauthorized);
        assert_eq!(unknown.message, wrong.message);
        assert_eq!(unknown.kind, wrong.kind);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn login_token_verifies_to_account() {
        let (gate, _) = gate_with_store();
        gate.register(register_req("alice", "pw123", Some(Role::Customer)))
            .await
            .expect("registration");

        let token = gate.login("alice", "pw123").await.expect("login");
        assert_eq!(token.token_type, "bearer");
        let account = gate.verify_token(&token.access_token).expect("token valid");
        assert_eq!(account.username, "alice");
        assert_eq!(account.role, Some(Role::Customer));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn expired_token_is_unauthorized() {
        let (gate, _) = gate_with_store();
        gate.register(register_req("alice", "pw123", None))
            .await
            .expect("registration");

        let stale = gate
            .signer()
            .issue_at("alice", Duration::from_secs(60), unix_now() - 120)
            .expect("issue");
        let err = gate.verify_token(&stale).expect_err("expired");
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Could not validate credentials");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn token_for_missing_account_is_unauthorized() {
        let (gate, store) = gate_with_store();
        let token = gate.issue_token("ghost", None).expect("issue");
        assert_eq!(
            gate.verify_token(&token).expect_err("ghost").kind,
            ErrorKind::Unauthorized
        );

        gate.register(register_req("alice", "pw123", None))
            .await
            .expect("registration");
        let token = gate.issue_token("alice", None).expect("issue");
        assert!(gate.verify_token(&token).is_ok());

        store
            .save("users", &crate::store::Collection::new())
            .expect("wipe accounts");
        assert_eq!(
            gate.verify_token(&token).expect_err("deleted").kind,
            ErrorKind::Unauthorized
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn role_gate_distinguishes_admin() {
        let (gate, _) = gate_with_store();
        let admin = gate
            .register(register_req("root", "pw", Some(Role::Admin)))
            .await
            .expect("admin");
        let customer = gate
            .register(register_req("carol", "pw", Some(Role::Customer)))
            .await
            .expect("customer");
        let plain = gate
            .register(register_req("dave", "pw", None))
            .await
            .expect("plain");

        assert!(Gate::require_role(admin, Role::Admin).is_ok());
        let err = Gate::require_role(customer, Role::Admin).expect_err("customer");
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "Admin access required");
        assert_eq!(
            Gate::require_role(plain, Role::Admin)
                .expect_err("no role")
                .kind,
            ErrorKind::Forbidden
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn padded_username_registers_and_logs_in() {
        let (gate, _) = gate_with_store();
        let account = gate
            .register(register_req(" alice ", "pw123", None))
            .await
            .expect("registration");
        assert_eq!(account.username, "alice");

        let token = gate.login(" alice ", "pw123").await.expect("padded login");
        let verified = gate.verify_token(&token.access_token).expect("token valid");
        assert_eq!(verified.username, "alice");
        assert!(gate.login("alice", "pw123").await.is_ok());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_extra_write_rolls_back_account() {
        let (gate, _) = gate_with_store();
        let err = gate
            .register_with(register_req("alice", "pw123", None), |_| {
                Err(ApiError::storage("disk full"))
            })
            .await
            .expect_err("extra write fails");
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(gate.find_account("alice").is_none());

        let mut seen = None;
        gate.register_with(register_req("alice", "pw123", None), |account| {
            seen = Some(account.username.clone());
            Ok(())
        })
        .await
        .expect("retry succeeds");
        assert_eq!(seen.as_deref(), Some("alice"));
        assert!(gate.find_account("alice").is_some());
    }
}
