use super::{EmailMessage, INotificationSender, NotificationError, SmsMessage};
use tracing::info;

/// Only logs the notifications. Used when no gateway is configured.
pub struct LogNotificationSender {}

#[async_trait::async_trait]
impl INotificationSender for LogNotificationSender {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        info!(
            "Email would be sent to {} with subject: {}",
            message.to, message.subject
        );
        Ok(())
    }

    async fn send_sms(&self, message: &SmsMessage) -> Result<(), NotificationError> {
        info!("SMS would be sent to {}: {}", message.to, message.body);
        Ok(())
    }
}
