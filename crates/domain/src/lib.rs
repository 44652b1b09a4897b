mod appointment;
mod catalog;
pub mod date;
mod reminder;
mod reminder_content;
mod shared;
mod slot;
mod user;

pub use appointment::{
    generate_confirmation_code, is_valid_email, is_valid_phone, Appointment, AppointmentDetails,
    AppointmentStatus, BookingRequest, BookingValidationError, CancelAppointmentError,
    InvalidAppointmentStatusError, ValidBooking, CANCELLATION_LEAD_TIME_MILLIS,
    MAX_CUSTOMER_NAME_LEN, MAX_NOTES_LEN,
};
pub use catalog::{CatalogError, Service, ServiceDetails, Stylist};
pub use reminder::{
    backoff_millis, backoff_minutes, DeliveryDetails, DeliveryFailure, Reminder, ReminderError,
    InvalidReminderStatusError, InvalidReminderTypeError, ReminderStatus, ReminderType,
    DEFAULT_MAX_RETRIES,
};
pub use reminder_content::{
    delivery_details, render, render_email, render_sms, BusinessProfile, ReminderContent,
    ReminderPolicy, ReminderRule, ReminderTemplate,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use slot::{get_available_slots, BookedSlot, InvalidSlotTimeError, SlotTime, TIME_SLOTS};
pub use user::{InvalidUserRoleError, User, UserRole};
