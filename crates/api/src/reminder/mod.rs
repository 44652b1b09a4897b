pub mod cancel_reminders;
mod delivery;
mod get_appointment_reminders;
mod get_user_reminders;
pub mod process_pending_reminders;
mod resend_reminder;
pub mod schedule_reminders;
mod send_test_reminder;

use actix_web::web;
use cancel_reminders::cancel_appointment_reminders_controller;
use get_appointment_reminders::get_appointment_reminders_controller;
use get_user_reminders::get_user_reminders_controller;
use process_pending_reminders::process_pending_reminders_controller;
use resend_reminder::resend_reminder_controller;
use schedule_reminders::create_appointment_reminders_controller;
use send_test_reminder::send_test_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders/user", web::get().to(get_user_reminders_controller));
    cfg.route(
        "/reminders/appointments/{appointment_id}/reminders",
        web::get().to(get_appointment_reminders_controller),
    );
    cfg.route(
        "/reminders/appointments/{appointment_id}/reminders",
        web::post().to(create_appointment_reminders_controller),
    );
    cfg.route(
        "/reminders/appointments/{appointment_id}/reminders",
        web::delete().to(cancel_appointment_reminders_controller),
    );
    cfg.route(
        "/reminders/appointments/{appointment_id}/test",
        web::post().to(send_test_reminder_controller),
    );
    cfg.route(
        "/reminders/process-pending",
        web::post().to(process_pending_reminders_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/resend",
        web::post().to(resend_reminder_controller),
    );
}
