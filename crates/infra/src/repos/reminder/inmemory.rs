use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_scheduler_domain::{Reminder, ReminderStatus, ReminderType, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn bulk_insert(&self, reminders: &[Reminder]) -> anyhow::Result<()> {
        for reminder in reminders {
            insert(reminder, &self.reminders);
        }
        Ok(())
    }

    async fn insert_missing(&self, reminders: &[Reminder]) -> anyhow::Result<Vec<Reminder>> {
        let mut stored = self.reminders.lock().unwrap();
        let mut inserted = Vec::new();
        for reminder in reminders {
            if stored.iter().any(|r| r.duplicates(reminder)) {
                continue;
            }
            stored.push(reminder.clone());
            inserted.push(reminder.clone());
        }
        Ok(inserted)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn save_claimed(
        &self,
        reminder: &Reminder,
        claimed_at: Option<i64>,
    ) -> anyhow::Result<bool> {
        let mut stored = self.reminders.lock().unwrap();
        let claimed = stored.iter_mut().find(|r| {
            r.id == reminder.id
                && r.status == ReminderStatus::Processing
                && r.claimed_at == claimed_at
        });
        match claimed {
            Some(r) => {
                *r = reminder.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_appointment(&self, appointment_id: &ID) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| r.appointment_id == *appointment_id);
        reminders.sort_by_key(|r| r.scheduled_for);
        reminders
    }

    async fn find_by_user(
        &self,
        user_id: &ID,
        status: Option<ReminderStatus>,
        reminder_type: Option<ReminderType>,
    ) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| {
            r.user_id.as_ref() == Some(user_id)
                && status.map(|s| r.status == s).unwrap_or(true)
                && reminder_type.map(|t| r.reminder_type == t).unwrap_or(true)
        });
        reminders.sort_by_key(|r| std::cmp::Reverse(r.scheduled_for));
        reminders
    }

    async fn claim_due(&self, now: i64, lease_millis: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut claimed = update_many(
            &self.reminders,
            |r| r.is_due(now) || r.is_stale_claim(now, lease_millis),
            |r| r.claim(now),
        );
        claimed.sort_by_key(|r| r.scheduled_for);
        Ok(claimed)
    }

    async fn claim_for_resend(
        &self,
        reminder_id: &ID,
        now: i64,
    ) -> anyhow::Result<Option<Reminder>> {
        let claimed = update_many(
            &self.reminders,
            |r| r.id == *reminder_id && r.status == ReminderStatus::Failed,
            |r| {
                if r.reset_for_resend(now).is_ok() {
                    r.claim(now);
                }
            },
        );
        Ok(claimed.into_iter().next())
    }

    async fn cancel_pending_for_appointment(
        &self,
        appointment_id: &ID,
        now: i64,
    ) -> anyhow::Result<u64> {
        let cancelled = update_many(
            &self.reminders,
            |r| {
                r.appointment_id == *appointment_id
                    && matches!(
                        r.status,
                        ReminderStatus::Pending | ReminderStatus::Processing
                    )
            },
            |r| {
                r.cancel(now);
            },
        );
        Ok(cancelled.len() as u64)
    }
}
