use super::{
    book_appointment::BookAppointmentUseCase, cancel_appointment::CancelAppointmentUseCase,
    update_appointment_status::UpdateAppointmentStatusUseCase,
};
use crate::reminder::{
    cancel_reminders::CancelRemindersUseCase, schedule_reminders::ScheduleRemindersUseCase,
};
use crate::shared::usecase::{execute, Subscriber};
use salon_scheduler_domain::{Appointment, AppointmentStatus};
use salon_scheduler_infra::SalonContext;

pub struct ScheduleRemindersOnBooking;

#[async_trait::async_trait(?Send)]
impl Subscriber<BookAppointmentUseCase> for ScheduleRemindersOnBooking {
    async fn notify(&self, e: &Appointment, ctx: &SalonContext) {
        let schedule_reminders = ScheduleRemindersUseCase {
            appointment: e.clone(),
        };

        // Sideeffect, ignore result
        let _ = execute(schedule_reminders, ctx).await;
    }
}

pub struct CancelRemindersOnCancellation;

#[async_trait::async_trait(?Send)]
impl Subscriber<CancelAppointmentUseCase> for CancelRemindersOnCancellation {
    async fn notify(&self, e: &Appointment, ctx: &SalonContext) {
        let cancel_reminders = CancelRemindersUseCase {
            appointment_id: e.id,
        };

        // Sideeffect, ignore result
        let _ = execute(cancel_reminders, ctx).await;
    }
}

pub struct CancelRemindersOnStatusCancelled;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateAppointmentStatusUseCase> for CancelRemindersOnStatusCancelled {
    async fn notify(&self, e: &Appointment, ctx: &SalonContext) {
        if e.status != AppointmentStatus::Cancelled {
            return;
        }
        let cancel_reminders = CancelRemindersUseCase {
            appointment_id: e.id,
        };

        // Sideeffect, ignore result
        let _ = execute(cancel_reminders, ctx).await;
    }
}
