//! 学生门户共享状态。

use std::sync::Arc;

use axum::extract::FromRef;
use fg_shared_gate::{CollectionStore, Gate, ServiceSpec};

pub(crate) const SERVICE: ServiceSpec = ServiceSpec {
    name: "student-portal",
    binary: "fg-student-portal",
    env_prefix: "STUDENT_PORTAL",
    default_addr: "0.0.0.0:18081",
    accounts_key: "students",
};

/// 成绩集合 key：username -> [grade]。
pub(crate) const GRADES_KEY: &str = "grades";

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
