use crate::error::SalonError;
use crate::shared::{
    auth::{protect_route, user_can_access_appointment},
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::cancel_appointment_reminders::*;
use salon_scheduler_domain::ID;
use salon_scheduler_infra::SalonContext;
use tracing::info;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::StorageError => SalonError::InternalError,
    }
}

pub async fn cancel_appointment_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_route(&http_req, &ctx).await?;
    let appointment = user_can_access_appointment(&user, &path_params.appointment_id, &ctx).await?;

    let usecase = CancelRemindersUseCase {
        appointment_id: appointment.id,
    };
    execute(usecase, &ctx)
        .await
        .map(|cancelled_count| HttpResponse::Ok().json(APIResponse { cancelled_count }))
        .map_err(handle_error)
}

/// Cancels every pending reminder of the appointment
#[derive(Debug)]
pub struct CancelRemindersUseCase {
    pub appointment_id: ID,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelRemindersUseCase {
    type Response = u64;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let cancelled = ctx
            .repos
            .reminders
            .cancel_pending_for_appointment(&self.appointment_id, now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if cancelled > 0 {
            info!(
                "Cancelled {} reminders of appointment {}",
                cancelled, self.appointment_id
            );
        }
        Ok(cancelled)
    }
}
