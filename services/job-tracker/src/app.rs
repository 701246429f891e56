//! 求职申请追踪应用装配：路由与监听。

use std::sync::Arc;

use axum::{Router, routing::get};
use fg_shared_gate::{CollectionStore, Gate, GateConfig, JsonFileStore, handlers::auth_routes};

use crate::{
    handlers::{add_application_handler, list_applications_handler},
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

pub(crate) fn router(state: AppState, token_url: &str) -> Router {
    auth_routes::<AppState>(token_url)
        .route(
            "/applications/",
            get(list_applications_handler).post(add_application_handler),
        )
        .with_state(state)
}
