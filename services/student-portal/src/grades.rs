//! 学生注册与成绩查询。

use fg_shared_gate::{
    ApiError,
    api::types::{MessageResponse, RegisterRequest},
    store::{load_records, save_records},
};
use tracing::info;

use crate::{
    state::{AppState, GRADES_KEY},
    types::{GradeReport, StudentRegisterRequest},
};

impl AppState {
    /// 创建学生账户并写入其成绩；成绩写入失败时账户一并撤回。
    pub(crate) async fn register_student(
        &self,
        req: StudentRegisterRequest,
    ) -> Result<MessageResponse, ApiError> {
        if req.grades.iter().any(|grade| !grade.is_finite()) {
            return Err(ApiError::validation("Grades must be finite numbers"));
        }

        let grades = req.grades;
        let account = self
            .gate
            .register_with(
                RegisterRequest {
                    username: req.username,
                    password: req.password,
                    role: None,
                },
                |account| {
                    let mut all = load_records::<Vec<f64>>(self.store(), GRADES_KEY);
                    let count = grades.len();
                    all.insert(account.username.clone(), grades);
                    save_records(self.store(), GRADES_KEY, &all)?;
                    info!("stored {count} grade(s) for student {}", account.username);
                    Ok(())
                },
            )
            .await?;

        Ok(MessageResponse::new(format!(
            "Student {} registered successfully",
            account.username
        )))
    }

    /// 当前学生的成绩与平均分；未录入成绩时平均分为空。
    pub(crate) fn grade_report(&self, username: &str) -> GradeReport {
        let grades = load_records::<Vec<f64>>(self.store(), GRADES_KEY)
            .remove(username)
            .unwrap_or_default();
        GradeReport {
            username: username.to_string(),
            average: average(&grades),
            grades,
        }
    }
}

/// 平均分，保留两位小数。
fn average(grades: &[f64]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    let mean = grades.iter().sum::<f64>() / grades.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
