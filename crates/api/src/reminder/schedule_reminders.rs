use crate::error::SalonError;
use crate::shared::{
    auth::{protect_route, user_can_access_appointment},
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::create_appointment_reminders::*;
use salon_scheduler_domain::{Appointment, Reminder};
use salon_scheduler_infra::SalonContext;
use tracing::info;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::StorageError => SalonError::InternalError,
    }
}

pub async fn create_appointment_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_route(&http_req, &ctx).await?;
    let appointment = user_can_access_appointment(&user, &path_params.appointment_id, &ctx).await?;

    let usecase = ScheduleRemindersUseCase { appointment };
    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Created().json(APIResponse::new(reminders)))
        .map_err(handle_error)
}

/// Creates the reminders the configured `ReminderPolicy` prescribes for the
/// appointment. A rule is skipped when its fire time has passed or when the
/// appointment already has a live reminder for it, so running this again is
/// harmless.
#[derive(Debug)]
pub struct ScheduleRemindersUseCase {
    pub appointment: Appointment,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleRemindersUseCase {
    /// The reminders that were created
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        if !self.appointment.status.is_active() {
            return Ok(Vec::new());
        }

        let now = ctx.sys.get_timestamp_millis();
        let start = self.appointment.start_timestamp(&ctx.config.timezone);
        let candidates = ctx.config.reminder_policy.reminders_for(
            &self.appointment,
            start,
            &ctx.config.business,
            now,
        );
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let reminders = ctx
            .repos
            .reminders
            .insert_missing(&candidates)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if reminders.is_empty() {
            return Ok(reminders);
        }

        info!(
            "Scheduled {} reminders for appointment {}",
            reminders.len(),
            self.appointment.confirmation_code
        );
        Ok(reminders)
    }
}
