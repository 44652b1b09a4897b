use salon_scheduler_domain::{DeliveryFailure, Reminder, ReminderType};
use salon_scheduler_infra::{EmailMessage, SalonContext, SmsMessage};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// Delivery failed and the reminder waits for another attempt
    Retrying,
    /// Delivery failed and no attempts are left
    Failed,
}

async fn send(reminder: &Reminder, ctx: &SalonContext) -> Result<String, String> {
    let recipient = reminder.recipient().map(String::from);
    match reminder.reminder_type {
        ReminderType::Email => {
            let to = recipient.ok_or("No email address to deliver the reminder to")?;
            let message = EmailMessage {
                to: to.clone(),
                subject: reminder.content.subject.clone().unwrap_or_default(),
                text: reminder.content.message.clone(),
            };
            ctx.notifications
                .send_email(&message)
                .await
                .map_err(|e| e.to_string())?;
            Ok(to)
        }
        ReminderType::Sms => {
            let to = recipient.ok_or("No phone number to deliver the reminder to")?;
            let message = SmsMessage {
                to: to.clone(),
                body: reminder.content.message.clone(),
            };
            ctx.notifications
                .send_sms(&message)
                .await
                .map_err(|e| e.to_string())?;
            Ok(to)
        }
        ReminderType::Push => Err("Push notifications are not supported".into()),
    }
}

/// Attempts delivery of a claimed reminder and stores the outcome.
///
/// The outcome is dropped when the claim was lost in the meantime, e.g. the
/// appointment was cancelled or a later sweep took over a stale claim. The
/// stored reminder is returned then.
pub async fn deliver(mut reminder: Reminder, ctx: &SalonContext) -> (Reminder, DeliveryOutcome) {
    let claimed_at = reminder.claimed_at;
    let res = send(&reminder, ctx).await;
    let now = ctx.sys.get_timestamp_millis();

    let outcome = match res {
        Ok(sent_to) => {
            reminder.mark_sent(&sent_to, now);
            info!(
                "Delivered {} reminder {} to {}",
                reminder.reminder_type, reminder.id, sent_to
            );
            DeliveryOutcome::Sent
        }
        Err(e) => match reminder.mark_failed(&e, now) {
            DeliveryFailure::Retrying { next_retry_at } => {
                warn!(
                    "Delivery of reminder {} failed (attempt {}), retrying at {}. Error: {}",
                    reminder.id, reminder.retry_count, next_retry_at, e
                );
                DeliveryOutcome::Retrying
            }
            DeliveryFailure::Exhausted => {
                error!(
                    "Delivery of reminder {} failed and no retries are left. Error: {}",
                    reminder.id, e
                );
                DeliveryOutcome::Failed
            }
        },
    };

    match ctx.repos.reminders.save_claimed(&reminder, claimed_at).await {
        Ok(true) => (),
        Ok(false) => {
            warn!(
                "Reminder {} changed while it was being delivered, discarding the outcome",
                reminder.id
            );
            if let Some(stored) = ctx.repos.reminders.find(&reminder.id).await {
                reminder = stored;
            }
        }
        Err(e) => error!(
            "Unable to store the delivery outcome of reminder {}: {:?}",
            reminder.id, e
        ),
    }

    (reminder, outcome)
}
