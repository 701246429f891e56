//! 购物车服务二进制入口：仅负责启动应用。

mod app;
mod cart;
mod catalog;
mod handlers;
mod state;
mod types;

use fg_shared_gate::cli::{self, CliDispatch};

#[tokio::main]
/// 启动购物车服务。
async fn main() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    match cli::dispatch(&args, state::SERVICE)? {
        CliDispatch::Run => {}
        CliDispatch::Exit => return Ok(()),
    }

    let _log_runtime = fg_shared_gate::logging::init(state::SERVICE.name)?;
    app::run().await
}
