use crate::dtos::{ReminderDTO, ReminderSweepDTO};
use salon_scheduler_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RemindersResponse {
    pub reminders: Vec<ReminderDTO>,
}

impl RemindersResponse {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self {
            reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct AppointmentPathParams {
    pub appointment_id: ID,
}

pub mod get_appointment_reminders {
    use super::*;

    pub type PathParams = AppointmentPathParams;
    pub type APIResponse = RemindersResponse;
}

pub mod get_user_reminders {
    use super::*;

    #[derive(Deserialize, Serialize, Default)]
    pub struct QueryParams {
        pub status: Option<String>,
        #[serde(rename = "type")]
        pub reminder_type: Option<String>,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod create_appointment_reminders {
    use super::*;

    pub type PathParams = AppointmentPathParams;
    pub type APIResponse = RemindersResponse;
}

pub mod cancel_appointment_reminders {
    use super::*;

    pub type PathParams = AppointmentPathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub cancelled_count: u64,
    }
}

pub mod send_test_reminder {
    use super::*;

    pub type PathParams = AppointmentPathParams;
    pub type APIResponse = ReminderResponse;
}

pub mod resend_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod process_pending_reminders {
    use super::*;

    pub type APIResponse = ReminderSweepDTO;
}
