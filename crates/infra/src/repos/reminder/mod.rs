mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use salon_scheduler_domain::{Reminder, ReminderStatus, ReminderType, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn bulk_insert(&self, reminders: &[Reminder]) -> anyhow::Result<()>;
    /// Inserts the reminders that no live reminder of the same appointment,
    /// channel and template exists for yet, and returns the inserted ones.
    /// Check and insert are atomic.
    async fn insert_missing(&self, reminders: &[Reminder]) -> anyhow::Result<Vec<Reminder>>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Stores the outcome of a delivery attempt, but only while the reminder
    /// is still held by the claim made at `claimed_at`. Returns whether it was stored.
    async fn save_claimed(
        &self,
        reminder: &Reminder,
        claimed_at: Option<i64>,
    ) -> anyhow::Result<bool>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Reminders of the appointment ordered by `scheduled_for`
    async fn find_by_appointment(&self, appointment_id: &ID) -> Vec<Reminder>;
    /// Reminders of the user, latest `scheduled_for` first
    async fn find_by_user(
        &self,
        user_id: &ID,
        status: Option<ReminderStatus>,
        reminder_type: Option<ReminderType>,
    ) -> Vec<Reminder>;
    /// Atomically moves every due reminder, and every claim older than
    /// `lease_millis`, to `processing` and returns them. A reminder is
    /// returned by at most one concurrent call.
    async fn claim_due(&self, now: i64, lease_millis: i64) -> anyhow::Result<Vec<Reminder>>;
    /// Atomically resets a `failed` reminder for another round of attempts and
    /// claims it. `None` when the reminder is not `failed`.
    async fn claim_for_resend(
        &self,
        reminder_id: &ID,
        now: i64,
    ) -> anyhow::Result<Option<Reminder>>;
    /// Cancels the reminders of the appointment that still wait for delivery,
    /// including claimed ones, and returns how many were cancelled
    async fn cancel_pending_for_appointment(
        &self,
        appointment_id: &ID,
        now: i64,
    ) -> anyhow::Result<u64>;
}
