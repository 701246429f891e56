//! 学生门户应用装配：路由与监听。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use fg_shared_gate::{CollectionStore, Gate, GateConfig, JsonFileStore, handlers::login_routes};

use crate::{
    handlers::{grades_handler, register_student_handler},
    state::{AppState, SERVICE},
};

/// 入口：读取配置并启动 HTTP 路由。
pub(crate) async fn run() -> anyhow::Result<()> {
    let config = GateConfig::from_env(SERVICE)?;
    let store: Arc<dyn CollectionStore> = Arc::new(JsonFileStore::new(&config.data_dir));
    let state = AppState::new(Arc::new(Gate::from_config(&config, store)));
    let app = router(state, &config.token_url);
    fg_shared_gate::app::serve(app, &config.addr, SERVICE.name).await
}

/// 注册接口额外接收成绩，因此不复用共享的 `/register/`。
pub(crate) fn router(state: AppState, token_url: &str) -> Router {
    login_routes::<AppState>(token_url)
        .route("/register/", post(register_student_handler))
        .route("/grades/", get(grades_handler))
        .with_state(state)
}
