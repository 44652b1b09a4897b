use crate::error::SalonError;
use crate::shared::{
    auth::{protect_route, user_can_access_appointment},
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::get_appointment_reminders::*;
use salon_scheduler_domain::{Reminder, ID};
use salon_scheduler_infra::SalonContext;

pub async fn get_appointment_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_route(&http_req, &ctx).await?;
    let appointment = user_can_access_appointment(&user, &path_params.appointment_id, &ctx).await?;

    let usecase = GetAppointmentRemindersUseCase {
        appointment_id: appointment.id,
    };
    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(|_| SalonError::InternalError)
}

#[derive(Debug)]
pub struct GetAppointmentRemindersUseCase {
    pub appointment_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAppointmentRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = ();

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx
            .repos
            .reminders
            .find_by_appointment(&self.appointment_id)
            .await)
    }
}
