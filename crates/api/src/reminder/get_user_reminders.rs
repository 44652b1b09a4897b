use crate::error::SalonError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::get_user_reminders::*;
use salon_scheduler_domain::{Reminder, ReminderStatus, ReminderType, ID};
use salon_scheduler_infra::SalonContext;
use std::{fmt::Display, str::FromStr};

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::InvalidFilter(msg) => SalonError::BadClientData(msg),
    }
}

pub async fn get_user_reminders_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_route(&http_req, &ctx).await?;

    let query_params = query_params.0;
    let usecase = GetUserRemindersUseCase {
        user_id: user.id,
        status: query_params.status,
        reminder_type: query_params.reminder_type,
    };
    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(handle_error)
}

/// Reminders of every appointment the user owns, latest first
#[derive(Debug)]
pub struct GetUserRemindersUseCase {
    pub user_id: ID,
    pub status: Option<String>,
    pub reminder_type: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    InvalidFilter(String),
}

fn parse_filter<T>(value: &Option<String>) -> Result<Option<T>, UseCaseError>
where
    T: FromStr,
    T::Err: Display,
{
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .to_lowercase()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| UseCaseError::InvalidFilter(e.to_string())),
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let status = parse_filter::<ReminderStatus>(&self.status)?;
        let reminder_type = parse_filter::<ReminderType>(&self.reminder_type)?;

        Ok(ctx
            .repos
            .reminders
            .find_by_user(&self.user_id, status, reminder_type)
            .await)
    }
}
