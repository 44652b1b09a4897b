use crate::{APIResponse, BaseClient};
use reqwest::StatusCode;
use salon_scheduler_api_structs::*;
use salon_scheduler_domain::{Stylist, ID};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppointmentClient {
    base: Arc<BaseClient>,
}

#[derive(Debug, Clone, Default)]
pub struct BookAppointmentInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
    pub stylist: Option<String>,
    pub notes: Option<String>,
}

pub struct GetAvailableSlotsInput {
    /// `YYYY-MM-DD`
    pub date: String,
    pub stylist: Option<Stylist>,
}

impl AppointmentClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn book(
        &self,
        input: BookAppointmentInput,
    ) -> APIResponse<book_appointment::APIResponse> {
        let body = book_appointment::RequestBody {
            name: input.name,
            email: input.email,
            phone: input.phone,
            service: input.service,
            date: input.date,
            time: input.time,
            stylist: input.stylist,
            notes: input.notes,
        };
        self.base
            .post(body, "appointments/book".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get_available_slots(
        &self,
        input: GetAvailableSlotsInput,
    ) -> APIResponse<get_available_slots::APIResponse> {
        let mut path = format!("appointments/available-slots?date={}", input.date);
        if let Some(stylist) = input.stylist {
            path = format!("{}&stylist={}", path, stylist);
        }
        self.base.get(path, StatusCode::OK).await
    }

    pub async fn get_by_code(
        &self,
        code: &str,
    ) -> APIResponse<get_appointment_by_code::APIResponse> {
        self.base
            .get(format!("appointments/code/{}", code), StatusCode::OK)
            .await
    }

    pub async fn get_mine(&self) -> APIResponse<get_user_appointments::APIResponse> {
        self.base
            .get("appointments/user".into(), StatusCode::OK)
            .await
    }

    pub async fn cancel(
        &self,
        appointment_id: ID,
    ) -> APIResponse<cancel_appointment::APIResponse> {
        self.base
            .put(
                (),
                format!("appointments/cancel/{}", appointment_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn update_status(
        &self,
        appointment_id: ID,
        status: &str,
    ) -> APIResponse<update_appointment_status::APIResponse> {
        let body = update_appointment_status::RequestBody {
            status: status.to_string(),
        };
        self.base
            .put(
                body,
                format!("appointments/status/{}", appointment_id),
                StatusCode::OK,
            )
            .await
    }
}
