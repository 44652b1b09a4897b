use super::delivery::{deliver, DeliveryOutcome};
use crate::error::SalonError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use futures::future::join_all;
use salon_scheduler_api_structs::process_pending_reminders::*;
use salon_scheduler_infra::SalonContext;
use tracing::info;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::StorageError => SalonError::InternalError,
    }
}

pub async fn process_pending_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    protect_admin_route(&http_req, &ctx).await?;

    execute(ProcessPendingRemindersUseCase, &ctx)
        .await
        .map(|summary| {
            HttpResponse::Ok().json(APIResponse {
                claimed: summary.claimed,
                sent: summary.sent,
                retried: summary.retried,
                failed: summary.failed,
            })
        })
        .map_err(handle_error)
}

/// One sweep over the reminder store: claims every due reminder and
/// delivers the claimed reminders concurrently.
///
/// Overlapping sweeps are safe since a reminder is only claimed once.
#[derive(Debug)]
pub struct ProcessPendingRemindersUseCase;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub claimed: usize,
    pub sent: usize,
    pub retried: usize,
    pub failed: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessPendingRemindersUseCase {
    type Response = SweepSummary;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let claimed = ctx
            .repos
            .reminders
            .claim_due(now, ctx.config.reminder_claim_lease_millis)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut summary = SweepSummary {
            claimed: claimed.len(),
            ..Default::default()
        };
        if claimed.is_empty() {
            return Ok(summary);
        }

        let deliveries = claimed.into_iter().map(|reminder| deliver(reminder, ctx));
        for (_, outcome) in join_all(deliveries).await {
            match outcome {
                DeliveryOutcome::Sent => summary.sent += 1,
                DeliveryOutcome::Retrying => summary.retried += 1,
                DeliveryOutcome::Failed => summary.failed += 1,
            }
        }

        info!(
            "Reminder sweep done. Claimed: {}, sent: {}, retried: {}, failed: {}",
            summary.claimed, summary.sent, summary.retried, summary.failed
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::appointment::book_appointment::BookAppointmentUseCase;
    use crate::shared::test_utils::{booking_request, days_from_today, setup, HOUR, MINUTE};
    use salon_scheduler_domain::{Appointment, ReminderStatus, ReminderType};
    use salon_scheduler_infra::SentNotification;

    async fn book(ctx: &SalonContext, days: i64, time: &str) -> Appointment {
        let usecase = BookAppointmentUseCase {
            request: booking_request(&days_from_today(days), time, "any"),
            user_id: None,
        };
        execute(usecase, ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn only_due_reminders_are_delivered() {
        let test = setup().await;
        let ctx = &test.ctx;
        let appointment = book(ctx, 2, "10:00 AM").await;
        let start = appointment.start_timestamp(&ctx.config.timezone);

        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary, SweepSummary::default());

        test.sys.set(start - 24 * HOUR);
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(
            summary,
            SweepSummary {
                claimed: 1,
                sent: 1,
                ..Default::default()
            }
        );
        let sent = test.sender.sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0], SentNotification::Email(_)));

        test.sys.set(start - 2 * HOUR + MINUTE);
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary.sent, 1);
        let sent = test.sender.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].recipient(), "9876543210");

        let reminders = ctx.repos.reminders.find_by_appointment(&appointment.id).await;
        assert!(reminders.iter().all(|r| r.status == ReminderStatus::Sent));

        // Nothing left to deliver
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary.claimed, 0);
    }

    #[actix_web::test]
    async fn failed_deliveries_are_retried_after_the_backoff() {
        let test = setup().await;
        let ctx = &test.ctx;
        let appointment = book(ctx, 2, "10:00 AM").await;
        let start = appointment.start_timestamp(&ctx.config.timezone);

        test.sender.set_failing(true);
        test.sys.set(start - 24 * HOUR);
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary.retried, 1);

        // Still inside the backoff window
        test.sys.advance(4 * MINUTE);
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary.claimed, 0);

        test.sender.set_failing(false);
        test.sys.advance(MINUTE);
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary.sent, 1);

        let email = ctx
            .repos
            .reminders
            .find_by_appointment(&appointment.id)
            .await
            .into_iter()
            .find(|r| r.reminder_type == ReminderType::Email)
            .unwrap();
        assert_eq!(email.status, ReminderStatus::Sent);
        assert_eq!(email.retry_count, 1);
    }

    #[actix_web::test]
    async fn one_failing_reminder_does_not_stop_the_batch() {
        let test = setup().await;
        let ctx = &test.ctx;
        let first = book(ctx, 2, "10:00 AM").await;
        book(ctx, 2, "11:00 AM").await;

        // Break the email address of the first appointment's reminders
        for mut reminder in ctx.repos.reminders.find_by_appointment(&first.id).await {
            reminder.delivery.email = None;
            ctx.repos.reminders.save(&reminder).await.unwrap();
        }

        let start = first.start_timestamp(&ctx.config.timezone);
        test.sys.set(start - 23 * HOUR);
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(
            summary,
            SweepSummary {
                claimed: 2,
                sent: 1,
                retried: 1,
                failed: 0,
            }
        );
    }

    #[actix_web::test]
    async fn claimed_reminders_are_not_sent_twice() {
        let test = setup().await;
        let ctx = &test.ctx;
        let appointment = book(ctx, 2, "10:00 AM").await;
        let start = appointment.start_timestamp(&ctx.config.timezone);
        test.sys.set(start - 24 * HOUR);

        let sweeps = (0..4).map(|_| execute(ProcessPendingRemindersUseCase, ctx));
        let summaries = join_all(sweeps).await;
        let sent = summaries
            .into_iter()
            .map(|s| s.unwrap().sent)
            .sum::<usize>();
        assert_eq!(sent, 1);
        assert_eq!(test.sender.sent().len(), 1);
    }

    #[actix_web::test]
    async fn stale_claims_are_reclaimed() {
        let test = setup().await;
        let ctx = &test.ctx;
        let appointment = book(ctx, 2, "10:00 AM").await;
        let start = appointment.start_timestamp(&ctx.config.timezone);
        test.sys.set(start - 24 * HOUR);

        // A sweep that claimed the reminder and never finished
        let now = ctx.sys.get_timestamp_millis();
        let claimed = ctx
            .repos
            .reminders
            .claim_due(now, ctx.config.reminder_claim_lease_millis)
            .await
            .unwrap();
        assert_eq!(claimed.len(), 1);

        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary.claimed, 0);

        test.sys.advance(ctx.config.reminder_claim_lease_millis);
        let summary = execute(ProcessPendingRemindersUseCase, ctx).await.unwrap();
        assert_eq!(summary.sent, 1);
    }
}
