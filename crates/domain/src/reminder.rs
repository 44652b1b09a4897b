use crate::{
    reminder_content::{ReminderContent, ReminderTemplate},
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub const DEFAULT_MAX_RETRIES: i64 = 3;

/// Delay before the next delivery attempt after the `attempt`-th failure
pub fn backoff_minutes(attempt: i64) -> i64 {
    match attempt {
        i64::MIN..=1 => 5,
        2 => 15,
        _ => 30,
    }
}

pub fn backoff_millis(attempt: i64) -> i64 {
    backoff_minutes(attempt) * 60 * 1000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Email,
    Sms,
    Push,
}

impl ReminderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Push => "push",
        }
    }
}

impl Display for ReminderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid reminder type: {0}")]
pub struct InvalidReminderTypeError(pub String);

impl FromStr for ReminderType {
    type Err = InvalidReminderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "push" => Ok(Self::Push),
            _ => Err(InvalidReminderTypeError(s.to_string())),
        }
    }
}

/// `Processing` is held only while a reminder sweep owns the reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Processing,
    Sent,
    Failed,
    Cancelled,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid reminder status: {0}")]
pub struct InvalidReminderStatusError(pub String);

impl FromStr for ReminderStatus {
    type Err = InvalidReminderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(InvalidReminderStatusError(s.to_string())),
        }
    }
}

/// Where a `Reminder` is delivered and what happened on the last attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Address the reminder was actually delivered to
    pub sent_to: Option<String>,
    /// Error of the last failed delivery attempt
    pub error_message: Option<String>,
}

/// A `Reminder` is a single notification about an upcoming `Appointment`,
/// delivered over one channel at `scheduled_for`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub appointment_id: ID,
    /// Recipient account, `None` when the appointment was booked by a guest
    pub user_id: Option<ID>,
    pub reminder_type: ReminderType,
    pub scheduled_for: i64,
    pub sent_at: Option<i64>,
    pub status: ReminderStatus,
    pub content: ReminderContent,
    pub delivery: DeliveryDetails,
    pub retry_count: i64,
    pub max_retries: i64,
    /// Earliest time of the next delivery attempt after a failure
    pub next_retry_at: Option<i64>,
    /// Set when a reminder sweep claims the reminder
    pub claimed_at: Option<i64>,
    pub created: i64,
    pub updated: i64,
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReminderError {
    #[error("Only failed reminders can be resent")]
    NotFailed,
}

/// Result of recording a failed delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The reminder is pending again and will be retried at `next_retry_at`
    Retrying { next_retry_at: i64 },
    /// Retries are exhausted, the reminder is now `failed`
    Exhausted,
}

impl Reminder {
    pub fn new(
        appointment_id: ID,
        user_id: Option<ID>,
        reminder_type: ReminderType,
        scheduled_for: i64,
        content: ReminderContent,
        delivery: DeliveryDetails,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            appointment_id,
            user_id,
            reminder_type,
            scheduled_for,
            sent_at: None,
            status: ReminderStatus::Pending,
            content,
            delivery,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            next_retry_at: None,
            claimed_at: None,
            created: now,
            updated: now,
        }
    }

    pub fn template(&self) -> ReminderTemplate {
        self.content.template
    }

    /// Whether a sweep running at `now` should attempt delivery
    pub fn is_due(&self, now: i64) -> bool {
        self.status == ReminderStatus::Pending
            && self.scheduled_for <= now
            && self.next_retry_at.map(|at| at <= now).unwrap_or(true)
    }

    /// Whether a previous sweep claimed this reminder more than `lease_millis` ago
    /// without recording an outcome
    pub fn is_stale_claim(&self, now: i64, lease_millis: i64) -> bool {
        self.status == ReminderStatus::Processing
            && self
                .claimed_at
                .map(|at| at <= now - lease_millis)
                .unwrap_or(true)
    }

    pub fn claim(&mut self, now: i64) {
        self.status = ReminderStatus::Processing;
        self.claimed_at = Some(now);
        self.updated = now;
    }

    /// The address delivery should go to for this reminder's channel
    pub fn recipient(&self) -> Option<&str> {
        let address = match self.reminder_type {
            ReminderType::Email => self.delivery.email.as_deref(),
            ReminderType::Sms => self.delivery.phone.as_deref(),
            ReminderType::Push => None,
        };
        address.filter(|a| !a.is_empty())
    }

    pub fn mark_sent(&mut self, sent_to: &str, now: i64) {
        self.status = ReminderStatus::Sent;
        self.sent_at = Some(now);
        self.delivery.sent_to = Some(sent_to.to_string());
        self.delivery.error_message = None;
        self.next_retry_at = None;
        self.claimed_at = None;
        self.updated = now;
    }

    /// Records a failed delivery attempt.
    ///
    /// While retries remain the reminder goes back to `pending` and waits out the
    /// backoff for its attempt number. After that it becomes `failed` and keeps
    /// its `retry_count` and `next_retry_at`.
    pub fn mark_failed(&mut self, error_message: &str, now: i64) -> DeliveryFailure {
        self.delivery.error_message = Some(error_message.to_string());
        self.claimed_at = None;
        self.updated = now;

        if self.retry_count < self.max_retries {
            self.retry_count += 1;
            let next_retry_at = now + backoff_millis(self.retry_count);
            self.status = ReminderStatus::Pending;
            self.next_retry_at = Some(next_retry_at);
            DeliveryFailure::Retrying { next_retry_at }
        } else {
            self.status = ReminderStatus::Failed;
            DeliveryFailure::Exhausted
        }
    }

    /// Makes a `failed` reminder deliverable again right away
    pub fn reset_for_resend(&mut self, now: i64) -> Result<(), ReminderError> {
        if self.status != ReminderStatus::Failed {
            return Err(ReminderError::NotFailed);
        }
        self.status = ReminderStatus::Pending;
        self.retry_count = 0;
        self.scheduled_for = now;
        self.next_retry_at = None;
        self.claimed_at = None;
        self.updated = now;
        Ok(())
    }

    /// Cancels the reminder if it is still waiting for delivery, claimed or not.
    /// Returns whether it did.
    pub fn cancel(&mut self, now: i64) -> bool {
        if !matches!(
            self.status,
            ReminderStatus::Pending | ReminderStatus::Processing
        ) {
            return false;
        }
        self.status = ReminderStatus::Cancelled;
        self.claimed_at = None;
        self.updated = now;
        true
    }

    /// Whether this reminder already serves the same appointment, channel and
    /// template as `other` and has not been cancelled
    pub fn duplicates(&self, other: &Reminder) -> bool {
        self.status != ReminderStatus::Cancelled
            && self.appointment_id == other.appointment_id
            && self.reminder_type == other.reminder_type
            && self.template() == other.template()
    }
}
