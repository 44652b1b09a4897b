mod appointment;
mod base;
mod reminder;
mod status;

use appointment::AppointmentClient;
pub use appointment::{BookAppointmentInput, GetAvailableSlotsInput};
pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
pub use reminder::GetUserRemindersInput;
use reminder::ReminderClient;
pub use salon_scheduler_api_structs::dtos::*;
pub use salon_scheduler_api_structs::get_available_slots::APIResponse as AvailableSlots;
pub use salon_scheduler_domain::{
    AppointmentStatus, ReminderStatus, ReminderTemplate, ReminderType, Service, SlotTime, Stylist,
    ID,
};
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use salon_scheduler_api_structs::dtos::AppointmentDTO as Appointment;
pub use salon_scheduler_api_structs::dtos::ReminderDTO as Reminder;
pub use salon_scheduler_api_structs::dtos::ReminderSweepDTO as ReminderSweep;

/// Salon Scheduler SDK
///
/// The SDK contains methods for interacting with the salon scheduler
/// server API.
#[derive(Clone)]
pub struct SalonSDK {
    pub appointment: AppointmentClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl SalonSDK {
    /// Client for anonymous requests
    pub fn new<T: Into<String>>(address: T) -> Self {
        Self::create(BaseClient::new(address.into()))
    }

    /// Client that authenticates every request with the given bearer token
    pub fn with_token<T: Into<String>, K: Into<String>>(address: T, token: K) -> Self {
        let mut base = BaseClient::new(address.into());
        base.set_token(token.into());
        Self::create(base)
    }

    fn create(base: BaseClient) -> Self {
        let base = Arc::new(base);
        let appointment = AppointmentClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            appointment,
            reminder,
            status,
        }
    }
}
