use crate::{
    appointment::Appointment,
    date::format_short_date,
    reminder::{DeliveryDetails, Reminder, ReminderType},
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const HOUR_MILLIS: i64 = 1000 * 60 * 60;

/// The kind of a reminder. Decides the wording and, in a `ReminderPolicy`,
/// how long before the appointment the reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderTemplate {
    #[serde(rename = "24h")]
    DayBefore,
    #[serde(rename = "2h")]
    TwoHoursBefore,
    /// Reserved, not part of the default policy
    #[serde(rename = "30m")]
    ThirtyMinutesBefore,
}

impl ReminderTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayBefore => "24h",
            Self::TwoHoursBefore => "2h",
            Self::ThirtyMinutesBefore => "30m",
        }
    }

    pub fn lead_time_millis(&self) -> i64 {
        match self {
            Self::DayBefore => 24 * HOUR_MILLIS,
            Self::TwoHoursBefore => 2 * HOUR_MILLIS,
            Self::ThirtyMinutesBefore => HOUR_MILLIS / 2,
        }
    }

    fn lead_phrase(&self) -> &'static str {
        match self {
            Self::DayBefore => "tomorrow",
            Self::TwoHoursBefore => "in 2 hours",
            Self::ThirtyMinutesBefore => "in 30 minutes",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "24h" => Some(Self::DayBefore),
            "2h" => Some(Self::TwoHoursBefore),
            "30m" => Some(Self::ThirtyMinutesBefore),
            _ => None,
        }
    }
}

impl Display for ReminderTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderContent {
    /// Only email reminders have a subject
    pub subject: Option<String>,
    pub message: String,
    pub template: ReminderTemplate,
}

/// Contact details of the salon rendered into reminders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            name: "Durga Salon".into(),
            address: "123 Beauty Street, City Center".into(),
            phone: "+91 98765 43210".into(),
            email: "info@durgasalon.com".into(),
        }
    }
}

pub fn render_email(
    appointment: &Appointment,
    template: ReminderTemplate,
    profile: &BusinessProfile,
) -> ReminderContent {
    let time = appointment.formatted_time();
    let subject = match template {
        ReminderTemplate::DayBefore => format!(
            "Reminder: Your appointment at {} tomorrow at {}",
            profile.name, time
        ),
        _ => format!(
            "Reminder: Your appointment at {} {}",
            profile.name,
            template.lead_phrase()
        ),
    };

    let details = format!(
        "Appointment Details:\n\
         - Date: {}\n\
         - Time: {}\n\
         - Service: {}\n\
         - Appointment ID: {}\n\n\
         Please arrive 10 minutes before your scheduled time.",
        appointment.formatted_date(),
        time,
        appointment.details.service_name,
        appointment.confirmation_code
    );

    let message = match template {
        ReminderTemplate::DayBefore => format!(
            "Dear {customer},\n\n\
             This is a friendly reminder about your upcoming appointment at {salon}.\n\n\
             {details}\n\n\
             Important Notes:\n\
             - Bring any relevant medical history or allergy information\n\
             - Payment will be collected at the salon\n\
             - If you need to reschedule, please call us at least 24 hours in advance\n\n\
             Contact Information:\n\
             {salon}\n\
             {address}\n\
             Phone: {phone}\n\
             Email: {email}\n\n\
             We look forward to seeing you!\n\n\
             Best regards,\n\
             Team {salon}",
            customer = appointment.customer_name,
            salon = profile.name,
            details = details,
            address = profile.address,
            phone = profile.phone,
            email = profile.email,
        ),
        _ => format!(
            "Dear {customer},\n\n\
             Your appointment at {salon} is {lead}!\n\n\
             {details}\n\n\
             See you soon!\n\n\
             Best regards,\n\
             Team {salon}",
            customer = appointment.customer_name,
            salon = profile.name,
            lead = template.lead_phrase(),
            details = details,
        ),
    };

    ReminderContent {
        subject: Some(subject),
        message,
        template,
    }
}

pub fn render_sms(
    appointment: &Appointment,
    template: ReminderTemplate,
    profile: &BusinessProfile,
) -> ReminderContent {
    let closing = match template {
        ReminderTemplate::ThirtyMinutesBefore => "Please arrive soon.",
        _ => "Please arrive 10 min early.",
    };
    let message = format!(
        "{}: Your {} appointment is {} ({} at {}). {} ID: {}",
        profile.name,
        appointment.details.service_name,
        template.lead_phrase(),
        format_short_date(&appointment.appointment_date),
        appointment.formatted_time(),
        closing,
        appointment.confirmation_code
    );

    ReminderContent {
        subject: None,
        message,
        template,
    }
}

pub fn render(
    appointment: &Appointment,
    reminder_type: ReminderType,
    template: ReminderTemplate,
    profile: &BusinessProfile,
) -> ReminderContent {
    match reminder_type {
        ReminderType::Email => render_email(appointment, template, profile),
        ReminderType::Sms | ReminderType::Push => render_sms(appointment, template, profile),
    }
}

/// One reminder a `ReminderPolicy` creates for every appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderRule {
    pub reminder_type: ReminderType,
    pub template: ReminderTemplate,
}

/// Which reminders are created for an appointment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPolicy {
    pub rules: Vec<ReminderRule>,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                ReminderRule {
                    reminder_type: ReminderType::Email,
                    template: ReminderTemplate::DayBefore,
                },
                ReminderRule {
                    reminder_type: ReminderType::Sms,
                    template: ReminderTemplate::TwoHoursBefore,
                },
            ],
        }
    }
}

impl ReminderPolicy {
    /// Builds the reminders for an appointment starting at `appointment_start`.
    /// Rules whose fire time is not after `now` are skipped.
    pub fn reminders_for(
        &self,
        appointment: &Appointment,
        appointment_start: i64,
        profile: &BusinessProfile,
        now: i64,
    ) -> Vec<Reminder> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let scheduled_for = appointment_start - rule.template.lead_time_millis();
                if scheduled_for <= now {
                    return None;
                }
                Some(Reminder::new(
                    appointment.id,
                    appointment.user_id,
                    rule.reminder_type,
                    scheduled_for,
                    render(appointment, rule.reminder_type, rule.template, profile),
                    delivery_details(appointment),
                    now,
                ))
            })
            .collect()
    }
}

pub fn delivery_details(appointment: &Appointment) -> DeliveryDetails {
    DeliveryDetails {
        email: Some(appointment.customer_email.clone()),
        phone: Some(appointment.customer_phone.clone()),
        sent_to: None,
        error_message: None,
    }
}
