use salon_scheduler_domain::{
    DeliveryDetails, Reminder, ReminderContent, ReminderStatus, ReminderType, ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetailsDTO {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub sent_to: Option<String>,
    pub error_message: Option<String>,
}

impl DeliveryDetailsDTO {
    pub fn new(delivery: DeliveryDetails) -> Self {
        Self {
            email: delivery.email,
            phone: delivery.phone,
            sent_to: delivery.sent_to,
            error_message: delivery.error_message,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub appointment_id: ID,
    pub user_id: Option<ID>,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub scheduled_for: i64,
    pub sent_at: Option<i64>,
    pub status: ReminderStatus,
    pub content: ReminderContent,
    pub delivery_details: DeliveryDetailsDTO,
    pub retry_count: i64,
    pub max_retries: i64,
    pub next_retry_at: Option<i64>,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            appointment_id: reminder.appointment_id,
            user_id: reminder.user_id,
            reminder_type: reminder.reminder_type,
            scheduled_for: reminder.scheduled_for,
            sent_at: reminder.sent_at,
            status: reminder.status,
            content: reminder.content,
            delivery_details: DeliveryDetailsDTO::new(reminder.delivery),
            retry_count: reminder.retry_count,
            max_retries: reminder.max_retries,
            next_retry_at: reminder.next_retry_at,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}

/// Outcome of one reminder sweep
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSweepDTO {
    pub claimed: usize,
    pub sent: usize,
    pub retried: usize,
    pub failed: usize,
}
