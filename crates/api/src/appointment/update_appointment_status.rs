use super::subscribers::CancelRemindersOnStatusCancelled;
use crate::error::SalonError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::update_appointment_status::*;
use salon_scheduler_domain::{Appointment, AppointmentStatus, ID};
use salon_scheduler_infra::SalonContext;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::InvalidStatus(status) => {
            SalonError::BadClientData(format!("Invalid status: {}", status))
        }
        UseCaseError::NotFound(appointment_id) => SalonError::NotFound(format!(
            "The appointment with id: {}, was not found.",
            appointment_id
        )),
        UseCaseError::StorageError => SalonError::InternalError,
    }
}

pub async fn update_appointment_status_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    protect_admin_route(&http_req, &ctx).await?;

    let usecase = UpdateAppointmentStatusUseCase {
        appointment_id: path_params.appointment_id,
        status: body.0.status,
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| {
            HttpResponse::Ok().json(APIResponse::new(
                "Appointment status updated successfully",
                appointment,
            ))
        })
        .map_err(handle_error)
}

/// Administrative status change. Any of the four statuses can be set
/// regardless of the current one.
#[derive(Debug)]
pub struct UpdateAppointmentStatusUseCase {
    pub appointment_id: ID,
    pub status: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    InvalidStatus(String),
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateAppointmentStatusUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let status = self
            .status
            .trim()
            .parse::<AppointmentStatus>()
            .map_err(|_| UseCaseError::InvalidStatus(self.status.clone()))?;

        let mut appointment = ctx
            .repos
            .appointments
            .find(&self.appointment_id)
            .await
            .ok_or(UseCaseError::NotFound(self.appointment_id))?;

        appointment.status = status;
        appointment.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .appointments
            .save(&appointment)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(appointment)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CancelRemindersOnStatusCancelled)]
    }
}
