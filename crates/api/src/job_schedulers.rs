use crate::{
    reminder::process_pending_reminders::ProcessPendingRemindersUseCase,
    shared::usecase::execute,
};
use actix_web::rt::time::{interval_at, Instant};
use salon_scheduler_infra::SalonContext;
use std::time::Duration;

/// Seconds until the next whole multiple of `interval_secs` since the epoch,
/// so that sweeps of different processes line up
pub fn get_start_delay(now_ts: i64, interval_secs: u64) -> u64 {
    let interval_secs = interval_secs.max(1);
    let now_secs = (now_ts / 1000).max(0) as u64;
    interval_secs - now_secs % interval_secs
}

/// Runs a reminder sweep every `reminder_sweep_interval_secs`. Every sweep
/// gets its own task so that a slow sweep never delays the next one.
pub fn start_reminder_sweep_job(ctx: SalonContext) {
    actix_web::rt::spawn(async move {
        let period = Duration::from_secs(ctx.config.reminder_sweep_interval_secs.max(1));
        let delay = get_start_delay(
            ctx.sys.get_timestamp_millis(),
            ctx.config.reminder_sweep_interval_secs,
        );
        let mut sweep_interval = interval_at(Instant::now() + Duration::from_secs(delay), period);
        loop {
            sweep_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(async move {
                let _ = execute(ProcessPendingRemindersUseCase, &context).await;
            });
        }
    });
}
