use super::subscribers::CancelRemindersOnCancellation;
use crate::error::SalonError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::cancel_appointment::*;
use salon_scheduler_domain::{Appointment, AppointmentStatus, CancelAppointmentError, ID};
use salon_scheduler_infra::SalonContext;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::NotFound(appointment_id) => SalonError::NotFound(format!(
            "The appointment with id: {}, was not found.",
            appointment_id
        )),
        UseCaseError::InvalidState(e) | UseCaseError::TooLate(e) => {
            SalonError::BadClientData(e.to_string())
        }
        UseCaseError::StorageError => SalonError::InternalError,
    }
}

pub async fn cancel_appointment_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = CancelAppointmentUseCase {
        appointment_id: path_params.appointment_id,
        user_id: user.id,
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| {
            HttpResponse::Ok().json(APIResponse::new(
                "Appointment cancelled successfully",
                appointment,
            ))
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct CancelAppointmentUseCase {
    pub appointment_id: ID,
    pub user_id: ID,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidState(CancelAppointmentError),
    TooLate(CancelAppointmentError),
    StorageError,
}

impl From<CancelAppointmentError> for UseCaseError {
    fn from(e: CancelAppointmentError) -> Self {
        match e {
            CancelAppointmentError::TooLate => Self::TooLate(e),
            e => Self::InvalidState(e),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelAppointmentUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let mut appointment = match ctx.repos.appointments.find(&self.appointment_id).await {
            Some(appointment) if appointment.is_owned_by(&self.user_id) => appointment,
            _ => return Err(UseCaseError::NotFound(self.appointment_id)),
        };

        let now = ctx.sys.get_timestamp_millis();
        appointment.ensure_cancellable(now, &ctx.config.timezone)?;

        appointment.status = AppointmentStatus::Cancelled;
        appointment.updated = now;
        ctx.repos
            .appointments
            .save(&appointment)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(appointment)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CancelRemindersOnCancellation)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::appointment::book_appointment::BookAppointmentUseCase;
    use crate::shared::test_utils::{booking_request, days_from_today, setup, TestContext, HOUR};
    use salon_scheduler_domain::ReminderStatus;

    async fn book(ctx: &SalonContext, user_id: ID, days: i64, time: &str) -> Appointment {
        let usecase = BookAppointmentUseCase {
            request: booking_request(&days_from_today(days), time, "any"),
            user_id: Some(user_id),
        };
        execute(usecase, ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn cancels_appointment_and_its_pending_reminders() {
        let TestContext { ctx, .. } = setup().await;
        let user_id = ID::default();
        let appointment = book(&ctx, user_id, 3, "10:00 AM").await;

        let usecase = CancelAppointmentUseCase {
            appointment_id: appointment.id,
            user_id,
        };
        let cancelled = execute(usecase, &ctx).await.unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        let stored = ctx.repos.appointments.find(&appointment.id).await.unwrap();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
        let reminders = ctx
            .repos
            .reminders
            .find_by_appointment(&appointment.id)
            .await;
        assert!(!reminders.is_empty());
        assert!(reminders
            .iter()
            .all(|r| r.status == ReminderStatus::Cancelled));

        let usecase = CancelAppointmentUseCase {
            appointment_id: appointment.id,
            user_id,
        };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidState(
                CancelAppointmentError::AlreadyCancelled
            ))
        );
    }

    #[actix_web::test]
    async fn enforces_lead_time() {
        let TestContext { ctx, sys, .. } = setup().await;
        let user_id = ID::default();
        // Tomorrow at 10:00 AM UTC, 28 hours after the test clock
        let appointment = book(&ctx, user_id, 1, "10:00 AM").await;

        // 23 hours before the appointment
        sys.advance(5 * HOUR);
        let usecase = CancelAppointmentUseCase {
            appointment_id: appointment.id,
            user_id,
        };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::TooLate(CancelAppointmentError::TooLate))
        );

        // 25 hours before the appointment
        sys.advance(-2 * HOUR);
        let usecase = CancelAppointmentUseCase {
            appointment_id: appointment.id,
            user_id,
        };
        assert!(execute(usecase, &ctx).await.is_ok());
    }

    #[actix_web::test]
    async fn completed_appointments_can_not_be_cancelled() {
        let TestContext { ctx, .. } = setup().await;
        let user_id = ID::default();
        let mut appointment = book(&ctx, user_id, 3, "10:00 AM").await;
        appointment.status = AppointmentStatus::Completed;
        ctx.repos.appointments.save(&appointment).await.unwrap();

        let usecase = CancelAppointmentUseCase {
            appointment_id: appointment.id,
            user_id,
        };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidState(CancelAppointmentError::Completed))
        );
    }

    #[actix_web::test]
    async fn only_the_owner_can_cancel() {
        let TestContext { ctx, .. } = setup().await;
        let appointment = book(&ctx, ID::default(), 3, "10:00 AM").await;

        let other_user = ID::default();
        let usecase = CancelAppointmentUseCase {
            appointment_id: appointment.id,
            user_id: other_user,
        };
        assert_eq!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NotFound(appointment.id))
        );
        let stored = ctx.repos.appointments.find(&appointment.id).await.unwrap();
        assert_eq!(stored.status, AppointmentStatus::Pending);
    }
}
