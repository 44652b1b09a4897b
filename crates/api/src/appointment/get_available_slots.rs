use crate::error::SalonError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use salon_scheduler_api_structs::get_available_slots::*;
use salon_scheduler_domain::{
    date::parse_date, get_available_slots, BookedSlot, SlotTime, Stylist, TIME_SLOTS,
};
use salon_scheduler_infra::SalonContext;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::InvalidInput(msg) => SalonError::BadClientData(msg),
    }
}

pub async fn get_available_slots_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let query_params = query_params.0;
    let usecase = GetAvailableSlotsUseCase {
        date: query_params.date,
        stylist: query_params.stylist,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                date: res.date,
                stylist: res.stylist,
                available_slots: res.available_slots,
                booked_slots: res.booked_slots,
            })
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetAvailableSlotsUseCase {
    pub date: String,
    /// Defaults to `any`
    pub stylist: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UseCaseResponse {
    pub date: NaiveDate,
    pub stylist: Stylist,
    pub available_slots: Vec<SlotTime>,
    /// Slots of the grid that can not be booked for the stylist
    pub booked_slots: Vec<SlotTime>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    InvalidInput(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAvailableSlotsUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let date = self.date.trim();
        if date.is_empty() {
            return Err(UseCaseError::InvalidInput("Date is required".into()));
        }
        let date = parse_date(date)
            .map_err(|_| UseCaseError::InvalidInput(format!("Invalid date format: `{}`", date)))?;
        let stylist = match self.stylist.as_deref().map(str::trim) {
            None | Some("") => Stylist::Any,
            Some(stylist) => stylist
                .parse::<Stylist>()
                .map_err(|e| UseCaseError::InvalidInput(e.to_string()))?,
        };

        let booked = ctx
            .repos
            .appointments
            .find_active_on(date)
            .await
            .into_iter()
            .map(|a| BookedSlot {
                time: a.appointment_time,
                stylist: a.stylist,
            })
            .collect::<Vec<_>>();

        let available_slots = get_available_slots(&booked, stylist);
        let booked_slots = TIME_SLOTS
            .iter()
            .filter(|slot| !available_slots.contains(slot))
            .copied()
            .collect();

        Ok(UseCaseResponse {
            date,
            stylist,
            available_slots,
            booked_slots,
        })
    }
}
