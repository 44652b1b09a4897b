use crate::error::SalonError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::get_user_appointments::*;
use salon_scheduler_domain::{Appointment, ID};
use salon_scheduler_infra::SalonContext;

pub async fn get_user_appointments_controller(
    http_req: HttpRequest,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetUserAppointmentsUseCase { user_id: user.id };
    execute(usecase, &ctx)
        .await
        .map(|appointments| HttpResponse::Ok().json(APIResponse::new(appointments)))
        .map_err(|_| SalonError::InternalError)
}

#[derive(Debug)]
pub struct GetUserAppointmentsUseCase {
    pub user_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserAppointmentsUseCase {
    type Response = Vec<Appointment>;

    type Error = ();

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.appointments.find_by_user(&self.user_id).await)
    }
}
