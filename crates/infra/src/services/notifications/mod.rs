mod fake;
mod gateway;
mod log;

pub use fake::{FakeNotificationSender, SentNotification};
pub use gateway::HttpNotificationSender;
pub use log::LogNotificationSender;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification gateway could not be reached: {0}")]
    Network(String),
    #[error("Notification gateway timed out")]
    Timeout,
    #[error("Notification gateway rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers reminders over email and sms. Constructed once at startup
/// and shared through the context.
#[async_trait::async_trait]
pub trait INotificationSender: Send + Sync {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), NotificationError>;
    async fn send_sms(&self, message: &SmsMessage) -> Result<(), NotificationError>;
}
