mod inmemory;
mod postgres;

use chrono::NaiveDate;
pub use inmemory::InMemoryAppointmentRepo;
pub use postgres::PostgresAppointmentRepo;
use salon_scheduler_domain::{Appointment, ID};

/// Outcome of `IAppointmentRepo::insert_if_slot_free`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAppointmentResult {
    Inserted,
    /// An active appointment already occupies the slot for a conflicting stylist
    SlotTaken,
    /// The confirmation code is already in use, nothing was inserted
    DuplicateCode,
}

#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    /// Checks for a conflicting active appointment and inserts the given one
    /// as a single atomic operation
    async fn insert_if_slot_free(
        &self,
        appointment: &Appointment,
    ) -> anyhow::Result<InsertAppointmentResult>;
    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()>;
    async fn find(&self, appointment_id: &ID) -> Option<Appointment>;
    async fn find_by_code(&self, confirmation_code: &str) -> Option<Appointment>;
    /// Appointments owned by the user in chronological order
    async fn find_by_user(&self, user_id: &ID) -> Vec<Appointment>;
    /// Pending and confirmed appointments at the given date
    async fn find_active_on(&self, date: NaiveDate) -> Vec<Appointment>;
}
