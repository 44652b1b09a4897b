use crate::{APIResponse, BaseClient};
use reqwest::StatusCode;
use salon_scheduler_api_structs::*;
use salon_scheduler_domain::{ReminderStatus, ReminderType, ID};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct GetUserRemindersInput {
    pub status: Option<ReminderStatus>,
    pub reminder_type: Option<ReminderType>,
}

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    fn appointment_path(appointment_id: ID, action: &str) -> String {
        format!("reminders/appointments/{}/{}", appointment_id, action)
    }

    pub async fn get_for_appointment(
        &self,
        appointment_id: ID,
    ) -> APIResponse<get_appointment_reminders::APIResponse> {
        self.base
            .get(
                Self::appointment_path(appointment_id, "reminders"),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_mine(
        &self,
        input: GetUserRemindersInput,
    ) -> APIResponse<get_user_reminders::APIResponse> {
        let mut filters = Vec::new();
        if let Some(status) = input.status {
            filters.push(format!("status={}", status.as_str()));
        }
        if let Some(reminder_type) = input.reminder_type {
            filters.push(format!("type={}", reminder_type.as_str()));
        }
        let mut path = String::from("reminders/user");
        if !filters.is_empty() {
            path = format!("{}?{}", path, filters.join("&"));
        }
        self.base.get(path, StatusCode::OK).await
    }

    pub async fn create_for_appointment(
        &self,
        appointment_id: ID,
    ) -> APIResponse<create_appointment_reminders::APIResponse> {
        self.base
            .post(
                (),
                Self::appointment_path(appointment_id, "reminders"),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn cancel_for_appointment(
        &self,
        appointment_id: ID,
    ) -> APIResponse<cancel_appointment_reminders::APIResponse> {
        self.base
            .delete(
                Self::appointment_path(appointment_id, "reminders"),
                StatusCode::OK,
            )
            .await
    }

    pub async fn send_test(
        &self,
        appointment_id: ID,
    ) -> APIResponse<send_test_reminder::APIResponse> {
        self.base
            .post(
                (),
                Self::appointment_path(appointment_id, "test"),
                StatusCode::OK,
            )
            .await
    }

    pub async fn resend(&self, reminder_id: ID) -> APIResponse<resend_reminder::APIResponse> {
        self.base
            .post(
                (),
                format!("reminders/{}/resend", reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn process_pending(&self) -> APIResponse<process_pending_reminders::APIResponse> {
        self.base
            .post((), "reminders/process-pending".into(), StatusCode::OK)
            .await
    }
}
