use super::subscribers::ScheduleRemindersOnBooking;
use crate::error::SalonError;
use crate::shared::{
    auth::protect_optional_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_scheduler_api_structs::book_appointment::*;
use salon_scheduler_domain::{
    date::date_at, generate_confirmation_code, Appointment, AppointmentDetails, AppointmentStatus,
    BookingRequest, BookingValidationError, CatalogError, ID,
};
use salon_scheduler_infra::{InsertAppointmentResult, SalonContext};
use tracing::warn;

/// Confirmation codes are regenerated at most this many times on collision
const MAX_CONFIRMATION_CODE_ATTEMPTS: usize = 5;

fn handle_error(e: UseCaseError) -> SalonError {
    match e {
        UseCaseError::InvalidInput(msg) => SalonError::BadClientData(msg),
        UseCaseError::InvalidService(service) => {
            SalonError::BadClientData(format!("Invalid service: {}", service))
        }
        UseCaseError::InvalidStylist(stylist) => {
            SalonError::BadClientData(format!("Invalid stylist: {}", stylist))
        }
        UseCaseError::Conflict => SalonError::Conflict(
            "This time slot is already booked. Please select a different time.".into(),
        ),
        UseCaseError::ConfirmationCodesExhausted | UseCaseError::StorageError => {
            SalonError::InternalError
        }
    }
}

pub async fn book_appointment_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<SalonContext>,
) -> Result<HttpResponse, SalonError> {
    let user = protect_optional_route(&http_req, &ctx).await;
    let body = body.0;

    let usecase = BookAppointmentUseCase {
        request: BookingRequest {
            name: body.name,
            email: body.email,
            phone: body.phone,
            service: body.service,
            date: body.date,
            time: body.time,
            stylist: body.stylist,
            notes: body.notes,
        },
        user_id: user.map(|u| u.id),
    };

    execute(usecase, &ctx)
        .await
        .map(|appointment| {
            HttpResponse::Created().json(APIResponse::new(
                "Appointment booked successfully",
                appointment,
            ))
        })
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct BookAppointmentUseCase {
    pub request: BookingRequest,
    /// Owner of the booking, `None` for guests
    pub user_id: Option<ID>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UseCaseError {
    InvalidInput(String),
    InvalidService(String),
    InvalidStylist(String),
    Conflict,
    ConfirmationCodesExhausted,
    StorageError,
}

impl From<BookingValidationError> for UseCaseError {
    fn from(e: BookingValidationError) -> Self {
        match e {
            BookingValidationError::InvalidStylist(stylist) => Self::InvalidStylist(stylist),
            e => Self::InvalidInput(e.to_string()),
        }
    }
}

impl From<CatalogError> for UseCaseError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::InvalidService(service) => Self::InvalidService(service),
            CatalogError::InvalidStylist(stylist) => Self::InvalidStylist(stylist),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for BookAppointmentUseCase {
    type Response = Appointment;

    type Error = UseCaseError;

    async fn execute(&mut self, ctx: &SalonContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let today = date_at(now, &ctx.config.timezone);
        let booking = self.request.validate(today)?;

        let details =
            AppointmentDetails::resolve(booking.service.as_str(), booking.stylist.as_str())?;

        for _ in 0..MAX_CONFIRMATION_CODE_ATTEMPTS {
            let appointment = Appointment {
                id: Default::default(),
                confirmation_code: generate_confirmation_code(now),
                customer_name: booking.name.clone(),
                customer_email: booking.email.clone(),
                customer_phone: booking.phone.clone(),
                service: booking.service,
                appointment_date: booking.date,
                appointment_time: booking.time,
                stylist: booking.stylist,
                notes: booking.notes.clone(),
                status: AppointmentStatus::Pending,
                user_id: self.user_id,
                booking_date: now,
                details: details.clone(),
                updated: now,
            };

            match ctx.repos.appointments.insert_if_slot_free(&appointment).await {
                Ok(InsertAppointmentResult::Inserted) => return Ok(appointment),
                Ok(InsertAppointmentResult::SlotTaken) => return Err(UseCaseError::Conflict),
                Ok(InsertAppointmentResult::DuplicateCode) => {
                    warn!(
                        "Confirmation code {} already in use, generating a new one",
                        appointment.confirmation_code
                    );
                }
                Err(_) => return Err(UseCaseError::StorageError),
            }
        }

        Err(UseCaseError::ConfirmationCodesExhausted)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleRemindersOnBooking)]
    }
}
