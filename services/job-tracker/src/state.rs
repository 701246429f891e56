//! 求职申请追踪共享状态。

use std::sync::Arc;

use axum::extract::FromRef;
use fg_shared_gate::{CollectionStore, Gate, ServiceSpec};

pub(crate) const SERVICE: ServiceSpec = ServiceSpec {
    name: "job-tracker",
    binary: "fg-job-tracker",
    env_prefix: "JOB_TRACKER",
    default_addr: "0.0.0.0:18083",
    accounts_key: "users",
};

/// 申请记录集合 key：username -> [application]。
pub(crate) const APPLICATIONS_KEY: &str = "applications";

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
