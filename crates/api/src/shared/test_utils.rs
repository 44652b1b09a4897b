use super::auth::Claims;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use salon_scheduler_domain::{BookingRequest, ID};
use salon_scheduler_infra::{FakeNotificationSender, SalonContext, StaticTimeSys};
use std::sync::Arc;

pub const HOUR: i64 = 1000 * 60 * 60;
pub const MINUTE: i64 = 1000 * 60;

pub struct TestContext {
    pub ctx: SalonContext,
    pub sys: Arc<StaticTimeSys>,
    pub sender: Arc<FakeNotificationSender>,
}

/// 2026-10-19 06:00 UTC
pub fn now() -> i64 {
    Utc.with_ymd_and_hms(2026, 10, 19, 6, 0, 0)
        .unwrap()
        .timestamp_millis()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub fn days_from_today(days: i64) -> String {
    (today() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// Inmemory context in UTC with a frozen clock and a recording notification sender
pub async fn setup() -> TestContext {
    let mut ctx = SalonContext::create_inmemory();
    ctx.config.timezone = chrono_tz::UTC;
    let sys = Arc::new(StaticTimeSys::new(now()));
    ctx.sys = sys.clone();
    let sender = Arc::new(FakeNotificationSender::new());
    ctx.notifications = sender.clone();

    TestContext { ctx, sys, sender }
}

pub fn booking_request(date: &str, time: &str, stylist: &str) -> BookingRequest {
    BookingRequest {
        name: "Asha Rao".into(),
        email: "asha@example.com".into(),
        phone: "9876543210".into(),
        service: "haircut".into(),
        date: date.into(),
        time: time.into(),
        stylist: Some(stylist.into()),
        notes: None,
    }
}

pub fn create_token(user_id: &ID, secret: &str) -> String {
    let claims = Claims {
        exp: (Utc::now().timestamp() + 60 * 60) as usize,
        user_id: user_id.to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
