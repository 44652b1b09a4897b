use actix_web::{web, HttpResponse};
use salon_scheduler_api_structs::get_service_health::*;
use salon_scheduler_infra::SalonContext;

async fn status(ctx: web::Data<SalonContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: format!("{} booking service is running", ctx.config.business.name),
        timezone: ctx.config.timezone.name().to_string(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
