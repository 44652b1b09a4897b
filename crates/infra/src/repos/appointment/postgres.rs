use super::{IAppointmentRepo, InsertAppointmentResult};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use salon_scheduler_domain::{Appointment, AppointmentDetails, SlotTime, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::{TryFrom, TryInto};
use tracing::error;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRaw {
    appointment_uid: Uuid,
    confirmation_code: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    service: String,
    appointment_date: NaiveDate,
    appointment_time: NaiveTime,
    stylist: String,
    notes: String,
    status: String,
    user_uid: Option<Uuid>,
    booking_date: i64,
    service_name: String,
    service_price: String,
    service_duration: i64,
    stylist_name: String,
    total_amount: i64,
    updated: i64,
}

impl TryFrom<AppointmentRaw> for Appointment {
    type Error = anyhow::Error;

    fn try_from(raw: AppointmentRaw) -> anyhow::Result<Self> {
        let appointment_time = SlotTime::new(raw.appointment_time.hour(), raw.appointment_time.minute())
            .ok_or_else(|| anyhow::anyhow!("Invalid appointment time: {}", raw.appointment_time))?;
        Ok(Appointment {
            id: raw.appointment_uid.into(),
            confirmation_code: raw.confirmation_code,
            customer_name: raw.customer_name,
            customer_email: raw.customer_email,
            customer_phone: raw.customer_phone,
            service: raw.service.parse()?,
            appointment_date: raw.appointment_date,
            appointment_time,
            stylist: raw.stylist.parse()?,
            notes: raw.notes,
            status: raw.status.parse()?,
            user_id: raw.user_uid.map(|id| id.into()),
            booking_date: raw.booking_date,
            details: AppointmentDetails {
                service_name: raw.service_name,
                service_price: raw.service_price,
                service_duration: raw.service_duration,
                stylist_name: raw.stylist_name,
                total_amount: raw.total_amount,
            },
            updated: raw.updated,
        })
    }
}

fn to_appointments(rows: Vec<AppointmentRaw>) -> Vec<Appointment> {
    rows.into_iter()
        .filter_map(|raw| match raw.try_into() {
            Ok(appointment) => Some(appointment),
            Err(e) => {
                error!("Unable to read stored appointment: {:?}", e);
                None
            }
        })
        .collect()
}

fn to_naive_time(time: &SlotTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or_default()
}

/// Key of the advisory lock serializing bookings of one slot
fn slot_lock_key(date: NaiveDate, time: &SlotTime) -> i64 {
    i64::from(date.num_days_from_ce()) * 24 * 60 + i64::from(time.minutes_since_midnight())
}

#[async_trait::async_trait]
impl IAppointmentRepo for PostgresAppointmentRepo {
    async fn insert_if_slot_free(
        &self,
        appointment: &Appointment,
    ) -> anyhow::Result<InsertAppointmentResult> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(slot_lock_key(
                appointment.appointment_date,
                &appointment.appointment_time,
            ))
            .execute(&mut *tx)
            .await?;

        let conflicting: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT appointment_uid FROM appointments
            WHERE appointment_date = $1 AND
            appointment_time = $2 AND
            status IN ('pending', 'confirmed') AND
            (stylist = $3 OR stylist = 'any' OR $3 = 'any')
            LIMIT 1
            "#,
        )
        .bind(appointment.appointment_date)
        .bind(to_naive_time(&appointment.appointment_time))
        .bind(appointment.stylist.as_str())
        .fetch_optional(&mut *tx)
        .await?;
        if conflicting.is_some() {
            tx.rollback().await?;
            return Ok(InsertAppointmentResult::SlotTaken);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO appointments
            (appointment_uid, confirmation_code, customer_name, customer_email, customer_phone,
            service, appointment_date, appointment_time, stylist, notes, status, user_uid,
            booking_date, service_name, service_price, service_duration, stylist_name,
            total_amount, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(&appointment.confirmation_code)
        .bind(&appointment.customer_name)
        .bind(&appointment.customer_email)
        .bind(&appointment.customer_phone)
        .bind(appointment.service.as_str())
        .bind(appointment.appointment_date)
        .bind(to_naive_time(&appointment.appointment_time))
        .bind(appointment.stylist.as_str())
        .bind(&appointment.notes)
        .bind(appointment.status.as_str())
        .bind(appointment.user_id.map(|id| id.inner()))
        .bind(appointment.booking_date)
        .bind(&appointment.details.service_name)
        .bind(&appointment.details.service_price)
        .bind(appointment.details.service_duration)
        .bind(&appointment.details.stylist_name)
        .bind(appointment.details.total_amount)
        .bind(appointment.updated)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {
                tx.commit().await?;
                Ok(InsertAppointmentResult::Inserted)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tx.rollback().await?;
                Ok(InsertAppointmentResult::DuplicateCode)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE appointments
            SET status = $2,
            notes = $3,
            updated = $4
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .bind(appointment.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        let raw: AppointmentRaw = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()??;
        to_appointments(vec![raw]).pop()
    }

    async fn find_by_code(&self, confirmation_code: &str) -> Option<Appointment> {
        let raw: AppointmentRaw = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.confirmation_code = $1
            "#,
        )
        .bind(confirmation_code)
        .fetch_optional(&self.pool)
        .await
        .ok()??;
        to_appointments(vec![raw]).pop()
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Appointment> {
        let rows: Vec<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.user_uid = $1
            ORDER BY a.appointment_date, a.appointment_time
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        to_appointments(rows)
    }

    async fn find_active_on(&self, date: NaiveDate) -> Vec<Appointment> {
        let rows: Vec<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.appointment_date = $1 AND
            a.status IN ('pending', 'confirmed')
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        to_appointments(rows)
    }
}
