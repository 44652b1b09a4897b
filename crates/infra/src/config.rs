use chrono_tz::Tz;
use salon_scheduler_domain::{BusinessProfile, ReminderPolicy};
use salon_scheduler_utils::create_random_secret;
use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Base url of the email / sms gateway. Notifications are only logged when absent.
    pub gateway_url: Option<String>,
    pub gateway_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to verify the bearer tokens of users
    pub jwt_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// Timezone of the salon. Defines "today", the booking window and
    /// when an appointment actually starts.
    pub timezone: Tz,
    /// How often the reminder sweep runs
    pub reminder_sweep_interval_secs: u64,
    /// How long a sweep may hold a claimed reminder before another sweep
    /// is allowed to pick it up again
    pub reminder_claim_lease_millis: i64,
    pub reminder_policy: ReminderPolicy,
    pub business: BusinessProfile,
    pub notifications: NotificationConfig,
    /// Exposes the test reminder route, only meant for development
    pub enable_test_reminders: bool,
}

fn parse_or_default<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display,
{
    match value {
        None => default,
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    name, value, default
                );
                default
            }
        },
    }
}

impl Config {
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from the given variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                info!("Did not find JWT_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(32);
                info!("Secret for verifying tokens was generated and set to: {}", secret);
                secret
            }
        };

        let port = parse_or_default("PORT", lookup("PORT"), 5000);
        let timezone = parse_or_default("SALON_TIMEZONE", lookup("SALON_TIMEZONE"), Tz::Asia__Kolkata);
        let reminder_sweep_interval_secs = parse_or_default(
            "REMINDER_SWEEP_INTERVAL_SECS",
            lookup("REMINDER_SWEEP_INTERVAL_SECS"),
            300u64,
        )
        .max(1);
        let reminder_claim_lease_secs = parse_or_default(
            "REMINDER_CLAIM_LEASE_SECS",
            lookup("REMINDER_CLAIM_LEASE_SECS"),
            600i64,
        );

        let defaults = BusinessProfile::default();
        let business = BusinessProfile {
            name: lookup("SALON_NAME").unwrap_or(defaults.name),
            address: lookup("SALON_ADDRESS").unwrap_or(defaults.address),
            phone: lookup("SALON_PHONE").unwrap_or(defaults.phone),
            email: lookup("SALON_EMAIL").unwrap_or(defaults.email),
        };

        let gateway_url = lookup("NOTIFICATION_GATEWAY_URL").filter(|url| !url.is_empty());
        if gateway_url.is_none() {
            warn!("NOTIFICATION_GATEWAY_URL is not set. Reminders will only be logged.");
        }
        let notifications = NotificationConfig {
            gateway_url,
            gateway_key: lookup("NOTIFICATION_GATEWAY_KEY").unwrap_or_default(),
            timeout_secs: parse_or_default(
                "NOTIFICATION_TIMEOUT_SECS",
                lookup("NOTIFICATION_TIMEOUT_SECS"),
                10u64,
            ),
        };

        let enable_test_reminders = lookup("SALON_ENV")
            .map(|env| env == "development")
            .unwrap_or(false);

        Self {
            jwt_secret,
            port,
            timezone,
            reminder_sweep_interval_secs,
            reminder_claim_lease_millis: reminder_claim_lease_secs * 1000,
            reminder_policy: ReminderPolicy::default(),
            business,
            notifications,
            enable_test_reminders,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
