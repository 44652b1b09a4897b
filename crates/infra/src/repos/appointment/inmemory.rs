use super::{IAppointmentRepo, InsertAppointmentResult};
use crate::repos::shared::inmemory_repo::*;
use chrono::NaiveDate;
use salon_scheduler_domain::{Appointment, ID};
use std::sync::Mutex;

pub struct InMemoryAppointmentRepo {
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepo {
    pub fn new() -> Self {
        Self {
            appointments: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn insert_if_slot_free(
        &self,
        appointment: &Appointment,
    ) -> anyhow::Result<InsertAppointmentResult> {
        // Check and insert under the same lock
        let mut appointments = self.appointments.lock().unwrap();
        if appointments
            .iter()
            .any(|existing| appointment.conflicts_with(existing))
        {
            return Ok(InsertAppointmentResult::SlotTaken);
        }
        if appointments
            .iter()
            .any(|existing| existing.confirmation_code == appointment.confirmation_code)
        {
            return Ok(InsertAppointmentResult::DuplicateCode);
        }
        appointments.push(appointment.clone());
        Ok(InsertAppointmentResult::Inserted)
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        save(appointment, &self.appointments);
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        find(appointment_id, &self.appointments)
    }

    async fn find_by_code(&self, confirmation_code: &str) -> Option<Appointment> {
        find_by(&self.appointments, |a| a.confirmation_code == confirmation_code)
            .into_iter()
            .next()
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Appointment> {
        let mut appointments = find_by(&self.appointments, |a| a.is_owned_by(user_id));
        appointments.sort_by_key(|a| (a.appointment_date, a.appointment_time));
        appointments
    }

    async fn find_active_on(&self, date: NaiveDate) -> Vec<Appointment> {
        find_by(&self.appointments, |a| {
            a.appointment_date == date && a.status.is_active()
        })
    }
}
