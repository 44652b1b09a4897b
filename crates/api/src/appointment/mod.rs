pub mod book_appointment;
mod cancel_appointment;
mod get_appointment_by_code;
mod get_available_slots;
mod get_user_appointments;
mod subscribers;
mod update_appointment_status;

use actix_web::web;
use book_appointment::book_appointment_controller;
use cancel_appointment::cancel_appointment_controller;
use get_appointment_by_code::get_appointment_by_code_controller;
use get_available_slots::get_available_slots_controller;
use get_user_appointments::get_user_appointments_controller;
use update_appointment_status::update_appointment_status_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/appointments/book",
        web::post().to(book_appointment_controller),
    );
    cfg.route(
        "/appointments/available-slots",
        web::get().to(get_available_slots_controller),
    );
    cfg.route(
        "/appointments/code/{code}",
        web::get().to(get_appointment_by_code_controller),
    );
    cfg.route(
        "/appointments/user",
        web::get().to(get_user_appointments_controller),
    );
    cfg.route(
        "/appointments/cancel/{appointment_id}",
        web::put().to(cancel_appointment_controller),
    );
    cfg.route(
        "/appointments/status/{appointment_id}",
        web::put().to(update_appointment_status_controller),
    );
}
