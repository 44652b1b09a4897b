use super::IReminderRepo;
use salon_scheduler_domain::{
    DeliveryDetails, Reminder, ReminderContent, ReminderStatus, ReminderType, ID,
};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use std::convert::{TryFrom, TryInto};
use tracing::error;

/// First key of the advisory locks serializing reminder scheduling of one appointment
const REMINDER_LOCK_SPACE: i32 = 1;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    appointment_uid: Uuid,
    user_uid: Option<Uuid>,
    reminder_type: String,
    scheduled_for: i64,
    sent_at: Option<i64>,
    status: String,
    content: Json<ReminderContent>,
    delivery: Json<DeliveryDetails>,
    retry_count: i64,
    max_retries: i64,
    next_retry_at: Option<i64>,
    claimed_at: Option<i64>,
    created: i64,
    updated: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        Ok(Reminder {
            id: raw.reminder_uid.into(),
            appointment_id: raw.appointment_uid.into(),
            user_id: raw.user_uid.map(|id| id.into()),
            reminder_type: raw.reminder_type.parse()?,
            scheduled_for: raw.scheduled_for,
            sent_at: raw.sent_at,
            status: raw.status.parse()?,
            content: raw.content.0,
            delivery: raw.delivery.0,
            retry_count: raw.retry_count,
            max_retries: raw.max_retries,
            next_retry_at: raw.next_retry_at,
            claimed_at: raw.claimed_at,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

fn to_reminders(rows: Vec<ReminderRaw>) -> Vec<Reminder> {
    rows.into_iter()
        .filter_map(|raw| match raw.try_into() {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                error!("Unable to read stored reminder: {:?}", e);
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn bulk_insert(&self, reminders: &[Reminder]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for reminder in reminders {
            sqlx::query(
                r#"
                INSERT INTO reminders
                (reminder_uid, appointment_uid, user_uid, reminder_type, scheduled_for, sent_at,
                status, content, delivery, retry_count, max_retries, next_retry_at, claimed_at,
                created, updated)
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(reminder.id.inner_ref())
            .bind(reminder.appointment_id.inner_ref())
            .bind(reminder.user_id.map(|id| id.inner()))
            .bind(reminder.reminder_type.as_str())
            .bind(reminder.scheduled_for)
            .bind(reminder.sent_at)
            .bind(reminder.status.as_str())
            .bind(Json(&reminder.content))
            .bind(Json(&reminder.delivery))
            .bind(reminder.retry_count)
            .bind(reminder.max_retries)
            .bind(reminder.next_retry_at)
            .bind(reminder.claimed_at)
            .bind(reminder.created)
            .bind(reminder.updated)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_missing(&self, reminders: &[Reminder]) -> anyhow::Result<Vec<Reminder>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::new();
        for reminder in reminders {
            // Two-key lock space, apart from the bigint slot locks of bookings
            sqlx::query("SELECT pg_advisory_xact_lock($1, hashtext($2))")
                .bind(REMINDER_LOCK_SPACE)
                .bind(reminder.appointment_id.as_string())
                .execute(&mut *tx)
                .await?;
            let res = sqlx::query(
                r#"
                INSERT INTO reminders
                (reminder_uid, appointment_uid, user_uid, reminder_type, scheduled_for, sent_at,
                status, content, delivery, retry_count, max_retries, next_retry_at, claimed_at,
                created, updated)
                SELECT $1::uuid, $2::uuid, $3::uuid, $4::text, $5::bigint, $6::bigint,
                $7::text, $8::jsonb, $9::jsonb, $10::bigint, $11::bigint, $12::bigint,
                $13::bigint, $14::bigint, $15::bigint
                WHERE NOT EXISTS (
                    SELECT 1 FROM reminders AS r
                    WHERE r.appointment_uid = $2 AND
                    r.reminder_type = $4 AND
                    r.content->>'template' = $16 AND
                    r.status <> 'cancelled'
                )
                "#,
            )
            .bind(reminder.id.inner_ref())
            .bind(reminder.appointment_id.inner_ref())
            .bind(reminder.user_id.map(|id| id.inner()))
            .bind(reminder.reminder_type.as_str())
            .bind(reminder.scheduled_for)
            .bind(reminder.sent_at)
            .bind(reminder.status.as_str())
            .bind(Json(&reminder.content))
            .bind(Json(&reminder.delivery))
            .bind(reminder.retry_count)
            .bind(reminder.max_retries)
            .bind(reminder.next_retry_at)
            .bind(reminder.claimed_at)
            .bind(reminder.created)
            .bind(reminder.updated)
            .bind(reminder.template().as_str())
            .execute(&mut *tx)
            .await?;
            if res.rows_affected() == 1 {
                inserted.push(reminder.clone());
            }
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET scheduled_for = $2,
            sent_at = $3,
            status = $4,
            content = $5,
            delivery = $6,
            retry_count = $7,
            max_retries = $8,
            next_retry_at = $9,
            claimed_at = $10,
            updated = $11
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.scheduled_for)
        .bind(reminder.sent_at)
        .bind(reminder.status.as_str())
        .bind(Json(&reminder.content))
        .bind(Json(&reminder.delivery))
        .bind(reminder.retry_count)
        .bind(reminder.max_retries)
        .bind(reminder.next_retry_at)
        .bind(reminder.claimed_at)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_claimed(
        &self,
        reminder: &Reminder,
        claimed_at: Option<i64>,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET scheduled_for = $2,
            sent_at = $3,
            status = $4,
            content = $5,
            delivery = $6,
            retry_count = $7,
            max_retries = $8,
            next_retry_at = $9,
            claimed_at = $10,
            updated = $11
            WHERE reminder_uid = $1 AND
            status = 'processing' AND
            claimed_at IS NOT DISTINCT FROM $12
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.scheduled_for)
        .bind(reminder.sent_at)
        .bind(reminder.status.as_str())
        .bind(Json(&reminder.content))
        .bind(Json(&reminder.delivery))
        .bind(reminder.retry_count)
        .bind(reminder.max_retries)
        .bind(reminder.next_retry_at)
        .bind(reminder.claimed_at)
        .bind(reminder.updated)
        .bind(claimed_at)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let raw: ReminderRaw = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()??;
        to_reminders(vec![raw]).pop()
    }

    async fn find_by_appointment(&self, appointment_id: &ID) -> Vec<Reminder> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.appointment_uid = $1
            ORDER BY r.scheduled_for
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        to_reminders(rows)
    }

    async fn find_by_user(
        &self,
        user_id: &ID,
        status: Option<ReminderStatus>,
        reminder_type: Option<ReminderType>,
    ) -> Vec<Reminder> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.user_uid = $1 AND
            ($2::text IS NULL OR r.status = $2) AND
            ($3::text IS NULL OR r.reminder_type = $3)
            ORDER BY r.scheduled_for DESC
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(status.map(|s| s.as_str()))
        .bind(reminder_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        to_reminders(rows)
    }

    async fn claim_due(&self, now: i64, lease_millis: i64) -> anyhow::Result<Vec<Reminder>> {
        let rows: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            UPDATE reminders
            SET status = 'processing',
            claimed_at = $1,
            updated = $1
            WHERE reminder_uid IN (
                SELECT r.reminder_uid FROM reminders AS r
                WHERE (
                    r.status = 'pending' AND
                    r.scheduled_for <= $1 AND
                    (r.next_retry_at IS NULL OR r.next_retry_at <= $1)
                ) OR (
                    r.status = 'processing' AND
                    (r.claimed_at IS NULL OR r.claimed_at <= $2)
                )
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(now - lease_millis)
        .fetch_all(&self.pool)
        .await?;

        let mut reminders = to_reminders(rows);
        reminders.sort_by_key(|r| r.scheduled_for);
        Ok(reminders)
    }

    async fn claim_for_resend(
        &self,
        reminder_id: &ID,
        now: i64,
    ) -> anyhow::Result<Option<Reminder>> {
        let raw: Option<ReminderRaw> = sqlx::query_as(
            r#"
            UPDATE reminders
            SET status = 'processing',
            retry_count = 0,
            scheduled_for = $2,
            next_retry_at = NULL,
            claimed_at = $2,
            updated = $2
            WHERE reminder_uid = $1 AND
            status = 'failed'
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match raw {
            Some(raw) => Ok(Some(raw.try_into()?)),
            None => Ok(None),
        }
    }

    async fn cancel_pending_for_appointment(
        &self,
        appointment_id: &ID,
        now: i64,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'cancelled',
            claimed_at = NULL,
            updated = $2
            WHERE appointment_uid = $1 AND
            status IN ('pending', 'processing')
            "#,
        )
        .bind(appointment_id.inner_ref())
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }
}
