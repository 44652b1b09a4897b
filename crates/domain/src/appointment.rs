use crate::{
    catalog::{CatalogError, Service, Stylist},
    date::{format_long_date, is_within_booking_window, local_timestamp_millis, parse_date},
    shared::entity::{Entity, ID},
    slot::SlotTime,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use salon_scheduler_utils::create_random_base36;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Minimum notice required to cancel an appointment
pub const CANCELLATION_LEAD_TIME_MILLIS: i64 = 1000 * 60 * 60 * 24;
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether an appointment with this status occupies its slot
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid status. Must be one of: pending, confirmed, completed, cancelled")]
pub struct InvalidAppointmentStatusError;

impl FromStr for AppointmentStatus {
    type Err = InvalidAppointmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(InvalidAppointmentStatusError),
        }
    }
}

/// Denormalized snapshot of the catalog entries an `Appointment` was booked with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub service_name: String,
    /// Display price, e.g. `₹500`
    pub service_price: String,
    pub service_duration: i64,
    pub stylist_name: String,
    pub total_amount: i64,
}

impl AppointmentDetails {
    pub fn new(service: Service, stylist: Stylist) -> Self {
        let service_details = service.details();
        Self {
            service_name: service_details.name.to_string(),
            service_price: service_details.display_price(),
            service_duration: service_details.duration_minutes,
            stylist_name: stylist.display_name().to_string(),
            total_amount: service_details.price,
        }
    }

    /// Resolves the catalog entries from raw ids
    pub fn resolve(service_id: &str, stylist_id: &str) -> Result<Self, CatalogError> {
        let service = service_id.parse::<Service>()?;
        let stylist = stylist_id.parse::<Stylist>()?;
        Ok(Self::new(service, stylist))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: ID,
    /// Human facing identifier, e.g. `AP12345678K3ZQ`
    pub confirmation_code: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service: Service,
    pub appointment_date: NaiveDate,
    pub appointment_time: SlotTime,
    pub stylist: Stylist,
    pub notes: String,
    pub status: AppointmentStatus,
    /// Owner of the booking, `None` for guest bookings
    pub user_id: Option<ID>,
    /// Timestamp in millis of when the booking was made
    pub booking_date: i64,
    pub details: AppointmentDetails,
    pub updated: i64,
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CancelAppointmentError {
    #[error("Appointment is already cancelled")]
    AlreadyCancelled,
    #[error("Cannot cancel completed appointment")]
    Completed,
    #[error("Appointments can only be cancelled at least 24 hours in advance")]
    TooLate,
}

impl Appointment {
    /// The instant (millis) the appointment starts, `tz` being the salon's timezone
    pub fn start_timestamp(&self, tz: &Tz) -> i64 {
        local_timestamp_millis(self.appointment_date, &self.appointment_time, tz)
    }

    pub fn formatted_date(&self) -> String {
        format_long_date(&self.appointment_date)
    }

    pub fn formatted_time(&self) -> String {
        self.appointment_time.to_string()
    }

    pub fn is_owned_by(&self, user_id: &ID) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }

    /// Checks that the customer may still cancel at `now`
    pub fn ensure_cancellable(&self, now: i64, tz: &Tz) -> Result<(), CancelAppointmentError> {
        match self.status {
            AppointmentStatus::Cancelled => return Err(CancelAppointmentError::AlreadyCancelled),
            AppointmentStatus::Completed => return Err(CancelAppointmentError::Completed),
            _ => (),
        }
        if self.start_timestamp(tz) - now < CANCELLATION_LEAD_TIME_MILLIS {
            return Err(CancelAppointmentError::TooLate);
        }
        Ok(())
    }

    /// Whether `other` would occupy the same slot as this appointment
    pub fn conflicts_with(&self, other: &Appointment) -> bool {
        self.id != other.id
            && other.status.is_active()
            && self.appointment_date == other.appointment_date
            && self.appointment_time == other.appointment_time
            && self.stylist.conflicts_with(&other.stylist)
    }
}

/// `AP` + last 8 digits of the millisecond timestamp + 4 uppercase base-36 characters.
///
/// Not unique by construction, collisions are detected by the store.
pub fn generate_confirmation_code(timestamp_millis: i64) -> String {
    let millis = format!("{:08}", timestamp_millis.rem_euclid(100_000_000));
    format!("AP{}{}", millis, create_random_base36(4))
}

/// An unvalidated booking request as submitted by a customer
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
    /// Defaults to `any` when absent
    pub stylist: Option<String>,
    pub notes: Option<String>,
}

/// A booking request that passed every input rule
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: Service,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub stylist: Stylist,
    pub notes: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BookingValidationError {
    #[error("Please provide all required fields")]
    MissingFields,
    #[error("Please provide a valid email address")]
    InvalidEmail,
    #[error("Please provide a valid 10-digit phone number")]
    InvalidPhone,
    #[error("Please select a valid service")]
    InvalidService,
    #[error("Invalid date format: `{0}`")]
    MalformedDate(String),
    #[error("Appointment date must be between tomorrow and 30 days from now")]
    DateOutOfRange,
    #[error("Please select a valid time slot (e.g., 10:00 AM, 2:30 PM)")]
    InvalidTime,
    #[error("Name cannot exceed 100 characters")]
    NameTooLong,
    #[error("Notes cannot exceed 500 characters")]
    NotesTooLong,
    #[error("Invalid stylist: {0}")]
    InvalidStylist(String),
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

impl BookingRequest {
    /// Validates the request, reporting the first rule that fails.
    ///
    /// `today` is the current date in the salon's timezone.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidBooking, BookingValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();
        let service = self.service.trim();
        let date = self.date.trim();
        let time = self.time.trim();
        if [name, email, phone, service, date, time]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(BookingValidationError::MissingFields);
        }

        if !is_valid_email(email) {
            return Err(BookingValidationError::InvalidEmail);
        }
        if !is_valid_phone(phone) {
            return Err(BookingValidationError::InvalidPhone);
        }
        let service = service
            .parse::<Service>()
            .map_err(|_| BookingValidationError::InvalidService)?;

        let date = parse_date(date)
            .map_err(|_| BookingValidationError::MalformedDate(date.to_string()))?;
        if !is_within_booking_window(date, today) {
            return Err(BookingValidationError::DateOutOfRange);
        }

        let time = time
            .parse::<SlotTime>()
            .map_err(|_| BookingValidationError::InvalidTime)?;

        if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
            return Err(BookingValidationError::NameTooLong);
        }
        let notes = self.notes.as_deref().unwrap_or_default().trim();
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(BookingValidationError::NotesTooLong);
        }

        let stylist = match self.stylist.as_deref().map(str::trim) {
            None | Some("") => Stylist::Any,
            Some(stylist) => stylist
                .parse::<Stylist>()
                .map_err(|_| BookingValidationError::InvalidStylist(stylist.to_string()))?,
        };

        Ok(ValidBooking {
            name: name.to_string(),
            email: email.to_lowercase(),
            phone: phone.to_string(),
            service,
            date,
            time,
            stylist,
            notes: notes.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use chrono_tz::UTC;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn valid_request() -> BookingRequest {
        BookingRequest {
            name: "Asha Rao".into(),
            email: "Asha.Rao@Example.com".into(),
            phone: "9876543210".into(),
            service: "haircut".into(),
            date: "2026-10-21".into(),
            time: "10:00 AM".into(),
            stylist: Some("priya".into()),
            notes: Some("  first visit ".into()),
        }
    }

    fn appointment_at(date: NaiveDate, time: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Default::default(),
            confirmation_code: generate_confirmation_code(0),
            customer_name: "Asha Rao".into(),
            customer_email: "asha@example.com".into(),
            customer_phone: "9876543210".into(),
            service: Service::Facial,
            appointment_date: date,
            appointment_time: time.parse().unwrap(),
            stylist: Stylist::Meera,
            notes: String::new(),
            status,
            user_id: None,
            booking_date: 0,
            details: AppointmentDetails::new(Service::Facial, Stylist::Meera),
            updated: 0,
        }
    }

    #[test]
    fn accepts_valid_request() {
        let booking = valid_request().validate(today()).unwrap();
        assert_eq!(booking.email, "asha.rao@example.com");
        assert_eq!(booking.service, Service::Haircut);
        assert_eq!(booking.stylist, Stylist::Priya);
        assert_eq!(booking.time.to_string(), "10:00 AM");
        assert_eq!(booking.notes, "first visit");
    }

    #[test]
    fn defaults_stylist_to_any() {
        let mut req = valid_request();
        req.stylist = None;
        assert_eq!(req.validate(today()).unwrap().stylist, Stylist::Any);
    }

    #[test]
    fn validates_in_order() {
        let mut req = valid_request();
        req.email = "not-an-email".into();
        req.phone = "123".into();
        assert_eq!(
            req.validate(today()),
            Err(BookingValidationError::InvalidEmail)
        );

        let mut req = valid_request();
        req.name = "   ".into();
        req.email = "bad".into();
        assert_eq!(
            req.validate(today()),
            Err(BookingValidationError::MissingFields)
        );

        let mut req = valid_request();
        req.phone = "98765-4321".into();
        req.service = "massage".into();
        assert_eq!(
            req.validate(today()),
            Err(BookingValidationError::InvalidPhone)
        );

        let mut req = valid_request();
        req.service = "massage".into();
        req.date = "garbage".into();
        assert_eq!(
            req.validate(today()),
            Err(BookingValidationError::InvalidService)
        );

        let mut req = valid_request();
        req.date = "garbage".into();
        req.time = "25:00".into();
        assert_eq!(
            req.validate(today()),
            Err(BookingValidationError::MalformedDate("garbage".into()))
        );

        let mut req = valid_request();
        req.time = "25:00".into();
        req.stylist = Some("nobody".into());
        assert_eq!(
            req.validate(today()),
            Err(BookingValidationError::InvalidTime)
        );

        let mut req = valid_request();
        req.stylist = Some("nobody".into());
        assert_eq!(
            req.validate(today()),
            Err(BookingValidationError::InvalidStylist("nobody".into()))
        );
    }

    #[test]
    fn enforces_booking_window() {
        let cases = vec![
            (0, false),
            (1, true),
            (30, true),
            (31, false),
            (-1, false),
        ];
        for (offset, ok) in cases {
            let mut req = valid_request();
            req.date = (today() + Duration::days(offset))
                .format("%Y-%m-%d")
                .to_string();
            let res = req.validate(today());
            if ok {
                assert!(res.is_ok(), "offset {}", offset);
            } else {
                assert_eq!(res, Err(BookingValidationError::DateOutOfRange), "offset {}", offset);
            }
        }
    }

    #[test]
    fn enforces_text_limits() {
        let mut req = valid_request();
        req.name = "a".repeat(101);
        assert_eq!(req.validate(today()), Err(BookingValidationError::NameTooLong));

        let mut req = valid_request();
        req.notes = Some("n".repeat(501));
        assert_eq!(req.validate(today()), Err(BookingValidationError::NotesTooLong));

        let mut req = valid_request();
        req.notes = Some("n".repeat(500));
        assert!(req.validate(today()).is_ok());
    }

    #[test]
    fn validates_contact_patterns() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
        assert!(is_valid_phone("0123456789"));
        assert!(!is_valid_phone("012345678"));
        assert!(!is_valid_phone("01234567890"));
        assert!(!is_valid_phone("01234s6789"));
    }

    #[test]
    fn generates_confirmation_codes() {
        let code = generate_confirmation_code(1_760_000_123_456);
        assert_eq!(code.len(), 14);
        assert!(code.starts_with("AP00123456"));
        assert!(code[10..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));

        assert!(generate_confirmation_code(42).starts_with("AP00000042"));
    }

    #[test]
    fn derives_details_from_catalog() {
        let details = AppointmentDetails::resolve("bridal", "kavita").unwrap();
        assert_eq!(details.service_name, "Bridal Package");
        assert_eq!(details.service_price, "₹5000");
        assert_eq!(details.service_duration, 240);
        assert_eq!(details.stylist_name, "Kavita Verma");
        assert_eq!(details.total_amount, 5000);

        assert_eq!(
            AppointmentDetails::resolve("spa", "kavita"),
            Err(CatalogError::InvalidService("spa".into()))
        );
        assert_eq!(
            AppointmentDetails::resolve("bridal", "rahul"),
            Err(CatalogError::InvalidStylist("rahul".into()))
        );
    }

    #[test]
    fn enforces_cancellation_lead_time() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        let appointment = appointment_at(date, "10:00 AM", AppointmentStatus::Pending);
        let start = Utc
            .with_ymd_and_hms(2026, 10, 21, 10, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(appointment.start_timestamp(&UTC), start);

        let hour = 1000 * 60 * 60;
        assert_eq!(
            appointment.ensure_cancellable(start - 23 * hour, &UTC),
            Err(CancelAppointmentError::TooLate)
        );
        assert!(appointment.ensure_cancellable(start - 25 * hour, &UTC).is_ok());
        assert!(appointment.ensure_cancellable(start - 24 * hour, &UTC).is_ok());

        let cancelled = appointment_at(date, "10:00 AM", AppointmentStatus::Cancelled);
        assert_eq!(
            cancelled.ensure_cancellable(start - 48 * hour, &UTC),
            Err(CancelAppointmentError::AlreadyCancelled)
        );
        let completed = appointment_at(date, "10:00 AM", AppointmentStatus::Completed);
        assert_eq!(
            completed.ensure_cancellable(start - 48 * hour, &UTC),
            Err(CancelAppointmentError::Completed)
        );
    }

    #[test]
    fn detects_slot_conflicts() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        let a = appointment_at(date, "10:00 AM", AppointmentStatus::Pending);
        let mut b = appointment_at(date, "10:00 AM", AppointmentStatus::Confirmed);
        assert!(a.conflicts_with(&b));

        b.stylist = Stylist::Priya;
        assert!(!a.conflicts_with(&b));
        b.stylist = Stylist::Any;
        assert!(a.conflicts_with(&b));

        b.status = AppointmentStatus::Cancelled;
        assert!(!a.conflicts_with(&b));

        let c = appointment_at(date, "10:30 AM", AppointmentStatus::Pending);
        assert!(!a.conflicts_with(&c));
        assert!(!a.conflicts_with(&a.clone()));
    }

    #[test]
    fn parses_statuses() {
        assert_eq!(
            "confirmed".parse::<AppointmentStatus>(),
            Ok(AppointmentStatus::Confirmed)
        );
        assert!("done".parse::<AppointmentStatus>().is_err());
        assert!(AppointmentStatus::Pending.is_active());
        assert!(!AppointmentStatus::Completed.is_active());
    }
}
