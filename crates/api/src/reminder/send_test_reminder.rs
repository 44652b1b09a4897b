use super::delivery::deliver;
use crate::error::SalonError;
use crate::shared::{
    auth::{protect_route, user_can_access_appointment},
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::send_test_reminder::*;
use salon_scheduler_domain::{
    delivery_details, render_email, Appointment, Reminder, ReminderTemplate, ReminderType,
};
use salon_scheduler_infra::SalonContext;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::StorageError => SalonError::InternalError,
    }
}

pub async fn send_test_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    if !ctx.config.enable_test_reminders {
        return Err(SalonError::NotFound(
            "Test reminders are only available in development".into(),
        ));
    }
    let user = protect_route(&http_req, &ctx).await?;
    let appointment = user_can_access_appointment(&user, &path_params.appointment_id, &ctx).await?;

    let usecase = SendTestReminderUseCase { appointment };
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

/// Creates a day-before email reminder for the appointment and delivers it now
#[derive(Debug)]
pub struct SendTestReminderUseCase {
    pub appointment: Appointment,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendTestReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let content = render_email(
            &self.appointment,
            ReminderTemplate::DayBefore,
            &ctx.config.business,
        );
        let mut reminder = Reminder::new(
            self.appointment.id,
            self.appointment.user_id,
            ReminderType::Email,
            now,
            content,
            delivery_details(&self.appointment),
            now,
        );
        // Claimed before it is stored so that a concurrent sweep leaves it alone
        reminder.claim(now);
        ctx.repos
            .reminders
            .bulk_insert(&[reminder.clone()])
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let (reminder, _) = deliver(reminder, ctx).await;
        Ok(reminder)
    }
}
