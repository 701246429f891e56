//! 购物车共享状态。

use std::sync::Arc;

use axum::extract::FromRef;
use fg_shared_gate::{CollectionStore, Gate, ServiceSpec};

pub(crate) const SERVICE: ServiceSpec = ServiceSpec {
    name: "shopping-cart",
    binary: "fg-shopping-cart",
    env_prefix: "SHOPPING_CART",
    default_addr: "0.0.0.0:18082",
    accounts_key: "users",
};

/// 商品目录：product name -> product。
pub(crate) const PRODUCTS_KEY: &str = "products";
/// 购物车：username -> {product name -> item}。
pub(crate) const CART_KEY: &str = "cart";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) gate: Arc<Gate>,
}

impl AppState {
    pub(crate) fn new(gate: Arc<Gate>) -> Self {
        Self { gate }
    }

    pub(crate) fn store(&self) -> &dyn CollectionStore {
        self.gate.store()
    }
}

impl FromRef<AppState> for Arc<Gate> {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}
