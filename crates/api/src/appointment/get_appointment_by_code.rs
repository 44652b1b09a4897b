use crate::error::SalonError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::get_appointment_by_code::*;
use salon_scheduler_domain::Appointment;
use salon_scheduler_infra::SalonContext;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::NotFound(code) => SalonError::NotFound(format!(
            "The appointment with confirmation code: {}, was not found.",
            code
        )),
    }
}

pub async fn get_appointment_by_code_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let usecase = GetAppointmentByCodeUseCase {
        code: path_params.code.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| HttpResponse::Ok().json(APIResponse::new(appointment)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetAppointmentByCodeUseCase {
    pub code: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    NotFound(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAppointmentByCodeUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let code = self.code.trim().to_uppercase();
        ctx.repos
            .appointments
            .find_by_code(&code)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.code.clone()))
    }
}
