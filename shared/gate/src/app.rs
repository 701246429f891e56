//! 服务装配：CORS、请求追踪与监听。

use anyhow::Context;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// 挂载公共中间件并在 `addr` 上启动服务。
pub async fn serve(router: Router, addr: &str, service_name: &str) -> anyhow::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = router.layer(TraceLayer::new_for_http()).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("{service_name} listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
