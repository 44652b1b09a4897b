use chrono::NaiveDate;
use salon_scheduler_domain::{Appointment, AppointmentStatus, Service, SlotTime, Stylist, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDTO {
    pub id: ID,
    pub confirmation_code: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: Service,
    pub service_name: String,
    pub service_price: String,
    pub service_duration: i64,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub stylist: Stylist,
    pub stylist_name: String,
    pub notes: String,
    pub status: AppointmentStatus,
    pub user_id: Option<ID>,
    pub booking_date: i64,
    pub total_amount: i64,
    pub formatted_date: String,
    pub formatted_time: String,
    pub updated: i64,
}

impl AppointmentDTO {
    pub fn new(appointment: Appointment) -> Self {
        Self {
            formatted_date: appointment.formatted_date(),
            formatted_time: appointment.formatted_time(),
            id: appointment.id,
            confirmation_code: appointment.confirmation_code,
            name: appointment.customer_name,
            email: appointment.customer_email,
            phone: appointment.customer_phone,
            service: appointment.service,
            service_name: appointment.details.service_name,
            service_price: appointment.details.service_price,
            service_duration: appointment.details.service_duration,
            date: appointment.appointment_date,
            time: appointment.appointment_time,
            stylist: appointment.stylist,
            stylist_name: appointment.details.stylist_name,
            notes: appointment.notes,
            status: appointment.status,
            user_id: appointment.user_id,
            booking_date: appointment.booking_date,
            total_amount: appointment.details.total_amount,
            updated: appointment.updated,
        }
    }
}
