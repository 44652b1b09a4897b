use chrono::{Duration, Utc};
use salon_scheduler_sdk::BookAppointmentInput;

/// The date `days` from today in UTC as `YYYY-MM-DD`
pub fn days_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn booking_input(days: i64, time: &str, stylist: &str) -> BookAppointmentInput {
    BookAppointmentInput {
        name: "Asha Rao".into(),
        email: "Asha@Example.com".into(),
        phone: "9876543210".into(),
        service: "haircut".into(),
        date: days_from_today(days),
        time: time.into(),
        stylist: Some(stylist.into()),
        notes: Some("First visit".into()),
    }
}
