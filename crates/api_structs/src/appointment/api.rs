use crate::dtos::AppointmentDTO;
use chrono::NaiveDate;
use salon_scheduler_domain::{Appointment, SlotTime, Stylist, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub message: String,
    pub appointment: AppointmentDTO,
}

impl AppointmentResponse {
    pub fn new(message: &str, appointment: Appointment) -> Self {
        Self {
            message: message.to_string(),
            appointment: AppointmentDTO::new(appointment),
        }
    }
}

pub mod book_appointment {
    use super::*;

    /// Every field is optional on the wire so that missing fields are
    /// reported as a validation error
    #[derive(Serialize, Deserialize, Debug, Default, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub email: String,
        #[serde(default)]
        pub phone: String,
        #[serde(default)]
        pub service: String,
        #[serde(default)]
        pub date: String,
        #[serde(default)]
        pub time: String,
        #[serde(default)]
        pub stylist: Option<String>,
        #[serde(default)]
        pub notes: Option<String>,
    }

    pub type APIResponse = AppointmentResponse;
}

pub mod get_available_slots {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        #[serde(default)]
        pub date: String,
        pub stylist: Option<String>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub date: NaiveDate,
        pub stylist: Stylist,
        pub available_slots: Vec<SlotTime>,
        pub booked_slots: Vec<SlotTime>,
    }
}

pub mod get_appointment_by_code {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub code: String,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub appointment: AppointmentDTO,
    }

    impl APIResponse {
        pub fn new(appointment: Appointment) -> Self {
            Self {
                appointment: AppointmentDTO::new(appointment),
            }
        }
    }
}

pub mod get_user_appointments {
    use super::*;

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub appointments: Vec<AppointmentDTO>,
    }

    impl APIResponse {
        pub fn new(appointments: Vec<Appointment>) -> Self {
            Self {
                appointments: appointments.into_iter().map(AppointmentDTO::new).collect(),
            }
        }
    }
}

pub mod cancel_appointment {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub appointment_id: ID,
    }

    pub type APIResponse = AppointmentResponse;
}

pub mod update_appointment_status {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub appointment_id: ID,
    }

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub status: String,
    }

    pub type APIResponse = AppointmentResponse;
}
