//! 求职申请读写。

use fg_shared_gate::{
    ApiError,
    api::types::MessageResponse,
    store::{owned_list, push_owned},
};
use tracing::info;

use crate::{
    state::{APPLICATIONS_KEY, AppState},
    types::JobApplication,
};

impl AppState {
    /// 追加一条求职申请到当前用户名下。
    pub(crate) async fn add_application(
        &self,
        owner: &str,
        application: JobApplication,
    ) -> Result<MessageResponse, ApiError> {
        if application.job_title.trim().is_empty() || application.company.trim().is_empty() {
            return Err(ApiError::validation(
                "Job title and company must not be empty",
            ));
        }

        let message = format!(
            "Job application for {} at {} added successfully",
            application.job_title, application.company
        );
        let _guard = self.gate.lock_writes().await;
        let count = push_owned(self.store(), APPLICATIONS_KEY, owner, application)?;
        info!("{owner} now tracks {count} application(s)");
        Ok(MessageResponse::new(message))
    }

    pub(crate) fn list_applications(&self, owner: &str) -> Vec<JobApplication> {
        owned_list(self.store(), APPLICATIONS_KEY, owner)
    }
}
