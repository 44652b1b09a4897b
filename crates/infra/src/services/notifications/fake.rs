use super::{EmailMessage, INotificationSender, NotificationError, SmsMessage};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentNotification {
    Email(EmailMessage),
    Sms(SmsMessage),
}

impl SentNotification {
    pub fn recipient(&self) -> &str {
        match self {
            Self::Email(email) => &email.to,
            Self::Sms(sms) => &sms.to,
        }
    }
}

/// Records every delivered notification instead of sending it and can be
/// told to fail every delivery. Meant for tests.
#[derive(Default)]
pub struct FakeNotificationSender {
    sent: Mutex<Vec<SentNotification>>,
    failing: AtomicBool,
}

impl FakeNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, notification: SentNotification) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::Rejected {
                status: 503,
                body: "Gateway unavailable".into(),
            });
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

#[async_trait::async_trait]
impl INotificationSender for FakeNotificationSender {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        self.record(SentNotification::Email(message.clone()))
    }

    async fn send_sms(&self, message: &SmsMessage) -> Result<(), NotificationError> {
        self.record(SentNotification::Sms(message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_or_fails_deliveries() {
        let sender = FakeNotificationSender::new();
        let sms = SmsMessage {
            to: "9876543210".into(),
            body: "See you".into(),
        };
        assert!(sender.send_sms(&sms).await.is_ok());
        assert_eq!(sender.sent(), vec![SentNotification::Sms(sms.clone())]);

        sender.set_failing(true);
        assert!(sender.send_sms(&sms).await.is_err());
        assert_eq!(sender.sent().len(), 1);
    }
}
