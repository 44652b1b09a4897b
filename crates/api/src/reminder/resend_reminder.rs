use super::delivery::deliver;
use crate::error::SalonError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::resend_reminder::*;
use salon_scheduler_domain::{Reminder, ReminderError, ID};
use salon_scheduler_infra::SalonContext;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::NotFound(reminder_id) => SalonError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
        UseCaseError::InvalidState(e) => SalonError::BadClientData(e.to_string()),
        UseCaseError::StorageError => SalonError::InternalError,
    }
}

pub async fn resend_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = ResendReminderUseCase {
        reminder_id: path_params.reminder_id,
        user_id: user.id,
    };
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

/// Makes a `failed` reminder deliverable again and delivers it right away
#[derive(Debug)]
pub struct ResendReminderUseCase {
    pub reminder_id: ID,
    /// Owner of the reminder's appointment
    pub user_id: ID,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidState(ReminderError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ResendReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;
        match ctx.repos.appointments.find(&reminder.appointment_id).await {
            Some(appointment) if appointment.is_owned_by(&self.user_id) => (),
            _ => return Err(UseCaseError::NotFound(self.reminder_id)),
        }

        let now = ctx.sys.get_timestamp_millis();
        let reminder = ctx
            .repos
            .reminders
            .claim_for_resend(&self.reminder_id, now)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::InvalidState(ReminderError::NotFailed))?;

        let (reminder, _) = deliver(reminder, ctx).await;
        Ok(reminder)
    }
}
