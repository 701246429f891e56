//! Notes 共享状态。

use std::sync::Arc;

use axum::extract::FromRef;
use fg_shared_gate::{CollectionStore, Gate, ServiceSpec};

pub(crate) const SERVICE: ServiceSpec = ServiceSpec {
    name: "notes",
    binary: "fg-notes",
    env_prefix: "NOTES",
    default_addr: "0.0.0.0:18084",
    accounts_key: "users",
};

/// 笔记集合 key：username -> [note]。
pub(crate) const NOTES_KEY: &str = "notes";

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
