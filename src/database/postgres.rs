use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::*;
use super::store::{apply_credit_delta, Audience, Store, StoreError, StoreResult};
use crate::types::{PaymentStatus, UserCategory, UserRole};

const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, pin_hash, role, category, status, pause_reason,
    paused_by_admin, function, sip_endpoint, prompt, minutes_allocated, minutes_used,
    credits_balance, monthly_plan_cost, next_billing_date, payment_status,
    revenue_generated, is_active, reset_code_hash, reset_code_expires_at, created_at, updated_at
"#;

const CALL_LOG_COLUMNS: &str = r#"
    c.id, c.user_id, c.lead_id, c.lead_name, c.lead_phone, c.call_outcome, c.duration_minutes,
    c.transcript, c.recording_url, c.revenue_generated, c.sip_call_id, c.caller_id, c.created_at
"#;

/// Postgres-backed store. Multi-row writes run inside a single transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Load a user, apply `change` and write it back under a row lock, so
    /// concurrent profile and status edits cannot overwrite each other.
    async fn modify_user(&self, id: Uuid, change: impl FnOnce(&mut User) + Send) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        let mut user = lock_user(&mut tx, id).await?;
        change(&mut user);
        let saved = write_user(&mut tx, &user).await?;
        tx.commit().await?;
        Ok(saved)
    }
}

async fn lock_user(conn: &mut PgConnection, id: Uuid) -> StoreResult<User> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))
}

async fn write_user(conn: &mut PgConnection, user: &User) -> StoreResult<User> {
    let query = format!(
        r#"
        UPDATE users SET
            name = $2, email = $3, category = $4, status = $5, pause_reason = $6,
            paused_by_admin = $7, function = $8, sip_endpoint = $9, prompt = $10,
            minutes_allocated = $11, monthly_plan_cost = $12, updated_at = $13
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    );

    sqlx::query_as::<_, User>(&query)
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.category.as_str())
        .bind(user.status.as_str())
        .bind(&user.pause_reason)
        .bind(user.paused_by_admin)
        .bind(&user.function)
        .bind(&user.sip_endpoint)
        .bind(&user.prompt)
        .bind(user.minutes_allocated)
        .bind(user.monthly_plan_cost)
        .bind(user.updated_at)
        .fetch_one(conn)
        .await
        .map_err(StoreError::from)
}

async fn insert_payment_row(conn: &mut PgConnection, payment: &Payment) -> StoreResult<Payment> {
    Ok(sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (
            id, user_id, amount, transaction_type, status, description, payment_link,
            payment_reference, due_date, paid_date, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(payment.id)
    .bind(payment.user_id)
    .bind(payment.amount)
    .bind(payment.transaction_type.as_str())
    .bind(payment.status.as_str())
    .bind(&payment.description)
    .bind(&payment.payment_link)
    .bind(&payment.payment_reference)
    .bind(payment.due_date)
    .bind(payment.paid_date)
    .bind(payment.created_at)
    .fetch_one(conn)
    .await?)
}

/// Settle a pending payment inside the caller's transaction.
async fn settle_in(conn: &mut PgConnection, id: Uuid, settlement: Settlement) -> StoreResult<SettledPayment> {
    let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Payment {} not found", id)))?;

    if payment.status != PaymentStatus::Pending {
        return Err(StoreError::Conflict(format!("Payment is already {}", payment.status)));
    }

    let (credits_before,): (rust_decimal::Decimal,) =
        sqlx::query_as("SELECT credits_balance FROM users WHERE id = $1 FOR UPDATE")
            .bind(payment.user_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", payment.user_id)))?;
    let credits_after = apply_credit_delta(credits_before, settlement.credit_delta)?;

    match settlement.advance_billing_days {
        Some(days) => {
            sqlx::query(
                r#"
                UPDATE users SET
                    credits_balance = $2,
                    payment_status = $3,
                    next_billing_date = next_billing_date + make_interval(days => $4),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(payment.user_id)
            .bind(credits_after)
            .bind(PaymentStatus::Paid.as_str())
            .bind(days as i32)
            .execute(&mut *conn)
            .await?;
        }
        None => {
            sqlx::query("UPDATE users SET credits_balance = $2, updated_at = NOW() WHERE id = $1")
                .bind(payment.user_id)
                .bind(credits_after)
                .execute(&mut *conn)
                .await?;
        }
    }

    let now = Utc::now();
    let payment = sqlx::query_as::<_, Payment>(
        "UPDATE payments SET status = $2, payment_reference = $3, paid_date = $4 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(PaymentStatus::Paid.as_str())
    .bind(&settlement.payment_reference)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions
            (id, user_id, amount, transaction_type, description, credits_before, credits_after, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payment.user_id)
    .bind(payment.amount)
    .bind(payment.transaction_type.as_str())
    .bind(&settlement.ledger_description)
    .bind(credits_before)
    .bind(credits_after)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(SettledPayment { payment, transaction })
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = user.into_user();
        let query = format!(
            r#"
            INSERT INTO users (
                id, name, email, password_hash, pin_hash, role, category, status,
                function, sip_endpoint, prompt, minutes_allocated, minutes_used,
                credits_balance, monthly_plan_cost, next_billing_date, payment_status,
                revenue_generated, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $20)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.pin_hash)
            .bind(user.role.as_str())
            .bind(user.category.as_str())
            .bind(user.status.as_str())
            .bind(&user.function)
            .bind(&user.sip_endpoint)
            .bind(&user.prompt)
            .bind(user.minutes_allocated)
            .bind(user.minutes_used)
            .bind(user.credits_balance)
            .bind(user.monthly_plan_cost)
            .bind(user.next_billing_date)
            .bind(user.payment_status.as_str())
            .bind(user.revenue_generated)
            .bind(user.is_active)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match StoreError::from(e) {
                StoreError::Conflict(_) => StoreError::Conflict(format!("Email {} already registered", user.email)),
                other => other,
            })
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&query).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self, include_admins: bool) -> StoreResult<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE $1 OR role NOT IN ($2, $3) ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(include_admins)
            .bind(UserRole::Admin.as_str())
            .bind(UserRole::SuperAdmin.as_str())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let email = update.email.clone();
        self.modify_user(id, |user| update.apply(user)).await.map_err(|e| match (e, email) {
            (StoreError::Conflict(_), Some(email)) => {
                StoreError::Conflict(format!("Email {} already registered", email.to_lowercase()))
            }
            (other, _) => other,
        })
    }

    async fn set_user_status(&self, id: Uuid, change: StatusChange) -> StoreResult<User> {
        self.modify_user(id, |user| change.apply(user)).await
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    async fn set_pin_hash(&self, id: Uuid, hash: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET pin_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    async fn set_reset_code(&self, id: Uuid, code_hash: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query("UPDATE users SET reset_code_hash = $2, reset_code_expires_at = $3 WHERE id = $1")
            .bind(id)
            .bind(code_hash)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_reset_code(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE users SET reset_code_hash = NULL, reset_code_expires_at = NULL WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn system_settings(&self) -> StoreResult<SystemSettings> {
        let row = sqlx::query_as::<_, SystemSettings>(
            "SELECT is_global_paused, pause_reason, updated_by, updated_at FROM system_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.unwrap_or_default())
    }

    async fn set_global_pause(&self, paused: bool, reason: Option<String>, updated_by: Uuid) -> StoreResult<SystemSettings> {
        let reason = if paused { reason } else { None };
        Ok(sqlx::query_as::<_, SystemSettings>(
            r#"
            INSERT INTO system_settings (id, is_global_paused, pause_reason, updated_by, updated_at)
            VALUES (1, $1, $2, $3, NOW())
            ON CONFLICT (id) DO UPDATE SET
                is_global_paused = EXCLUDED.is_global_paused,
                pause_reason = EXCLUDED.pause_reason,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING is_global_paused, pause_reason, updated_by, updated_at
            "#,
        )
        .bind(paused)
        .bind(reason)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn category_settings(&self, category: UserCategory) -> StoreResult<Option<CategoryBotSettings>> {
        Ok(sqlx::query_as::<_, CategoryBotSettings>("SELECT * FROM category_bot_settings WHERE category = $1")
            .bind(category.as_str())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_category_settings(&self) -> StoreResult<Vec<CategoryBotSettings>> {
        Ok(sqlx::query_as::<_, CategoryBotSettings>("SELECT * FROM category_bot_settings ORDER BY category")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn upsert_category_settings(
        &self,
        category: UserCategory,
        update: CategoryBotSettingsUpdate,
        updated_by: Option<Uuid>,
    ) -> StoreResult<CategoryBotSettings> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, CategoryBotSettings>(
            "SELECT * FROM category_bot_settings WHERE category = $1 FOR UPDATE",
        )
        .bind(category.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let merged = update.merge(existing, category, updated_by);
        let saved = sqlx::query_as::<_, CategoryBotSettings>(
            r#"
            INSERT INTO category_bot_settings
                (id, category, model, temperature, opening_message, prompt, is_active, updated_by, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (category) DO UPDATE SET
                model = EXCLUDED.model,
                temperature = EXCLUDED.temperature,
                opening_message = EXCLUDED.opening_message,
                prompt = EXCLUDED.prompt,
                is_active = EXCLUDED.is_active,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(merged.id)
        .bind(merged.category.as_str())
        .bind(merged.model.as_str())
        .bind(merged.temperature)
        .bind(&merged.opening_message)
        .bind(&merged.prompt)
        .bind(merged.is_active)
        .bind(merged.updated_by)
        .bind(merged.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn user_override(&self, user_id: Uuid) -> StoreResult<Option<UserBotSettings>> {
        Ok(sqlx::query_as::<_, UserBotSettings>(
            "SELECT user_id, opening_message, prompt, updated_at FROM user_bot_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_user_override(&self, user_id: Uuid, update: UserBotSettingsUpdate) -> StoreResult<UserBotSettings> {
        // COALESCE keeps whichever field the update leaves out.
        Ok(sqlx::query_as::<_, UserBotSettings>(
            r#"
            INSERT INTO user_bot_settings (user_id, opening_message, prompt, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                opening_message = COALESCE(EXCLUDED.opening_message, user_bot_settings.opening_message),
                prompt = COALESCE(EXCLUDED.prompt, user_bot_settings.prompt),
                updated_at = NOW()
            RETURNING user_id, opening_message, prompt, updated_at
            "#,
        )
        .bind(user_id)
        .bind(update.opening_message)
        .bind(update.prompt)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_user_override(&self, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM user_bot_settings WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_leads(&self, user_id: Uuid, leads: Vec<NewLead>) -> StoreResult<Vec<Lead>> {
        if leads.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Lead> = leads.into_iter().map(|lead| lead.into_lead(user_id)).collect();
        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO leads (id, user_id, name, phone, email, company, notes, status, created_at) ");
        builder.push_values(&rows, |mut b, lead| {
            b.push_bind(lead.id)
                .push_bind(lead.user_id)
                .push_bind(&lead.name)
                .push_bind(&lead.phone)
                .push_bind(&lead.email)
                .push_bind(&lead.company)
                .push_bind(&lead.notes)
                .push_bind(&lead.status)
                .push_bind(lead.created_at);
        });
        builder.build().execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(rows)
    }

    async fn list_leads(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<Lead>> {
        Ok(sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn lead_by_id(&self, id: Uuid) -> StoreResult<Option<Lead>> {
        Ok(sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn record_call(&self, call: NewCallLog) -> StoreResult<CallLog> {
        let log = call.into_call_log();
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE users SET
                minutes_used = minutes_used + $2,
                revenue_generated = revenue_generated + $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(log.user_id)
        .bind(log.duration_minutes)
        .bind(log.revenue_generated)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("User {} not found", log.user_id)));
        }

        let saved = sqlx::query_as::<_, CallLog>(
            r#"
            INSERT INTO call_logs (
                id, user_id, lead_id, lead_name, lead_phone, call_outcome, duration_minutes,
                transcript, recording_url, revenue_generated, sip_call_id, caller_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.user_id)
        .bind(log.lead_id)
        .bind(&log.lead_name)
        .bind(&log.lead_phone)
        .bind(log.call_outcome.as_str())
        .bind(log.duration_minutes)
        .bind(&log.transcript)
        .bind(&log.recording_url)
        .bind(log.revenue_generated)
        .bind(&log.sip_call_id)
        .bind(&log.caller_id)
        .bind(log.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn list_call_logs(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<CallLog>> {
        let query = format!(
            "SELECT {CALL_LOG_COLUMNS} FROM call_logs c WHERE c.user_id = $1 ORDER BY c.created_at DESC LIMIT $2"
        );
        Ok(sqlx::query_as::<_, CallLog>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_call_logs_with_users(&self, limit: i64) -> StoreResult<Vec<CallLogWithUser>> {
        let query = format!(
            r#"
            SELECT {CALL_LOG_COLUMNS}, u.name AS user_name
            FROM call_logs c
            LEFT JOIN users u ON u.id = c.user_id
            ORDER BY c.created_at DESC
            LIMIT $1
            "#
        );
        Ok(sqlx::query_as::<_, CallLogWithUser>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_payment(&self, payment: Payment) -> StoreResult<Payment> {
        let mut conn = self.pool.acquire().await?;
        insert_payment_row(&mut conn, &payment).await
    }

    async fn payment_by_id(&self, id: Uuid) -> StoreResult<Option<Payment>> {
        Ok(sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_payments(&self, user_id: Option<Uuid>) -> StoreResult<Vec<Payment>> {
        Ok(sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE $1::uuid IS NULL OR user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn settle_payment(&self, id: Uuid, settlement: Settlement) -> StoreResult<SettledPayment> {
        let mut tx = self.pool.begin().await?;
        let settled = settle_in(&mut tx, id, settlement).await?;
        tx.commit().await?;
        Ok(settled)
    }

    async fn insert_settled_payment(&self, payment: Payment, settlement: Settlement) -> StoreResult<SettledPayment> {
        let mut tx = self.pool.begin().await?;
        insert_payment_row(&mut tx, &payment).await?;
        let settled = settle_in(&mut tx, payment.id, settlement).await?;
        tx.commit().await?;
        Ok(settled)
    }

    async fn list_transactions(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        Ok(sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_notifications(&self, notifications: Vec<NewNotification>) -> StoreResult<Vec<Notification>> {
        if notifications.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Notification> = notifications.into_iter().map(NewNotification::into_notification).collect();
        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO notifications (id, user_id, kind, title, message, data, is_read, \
             contact_name, contact_email, contact_phone, contact_company, created_at) ",
        );
        builder.push_values(&rows, |mut b, n| {
            b.push_bind(n.id)
                .push_bind(n.user_id)
                .push_bind(n.kind.as_str())
                .push_bind(&n.title)
                .push_bind(&n.message)
                .push_bind(&n.data)
                .push_bind(n.is_read)
                .push_bind(&n.contact_name)
                .push_bind(&n.contact_email)
                .push_bind(&n.contact_phone)
                .push_bind(&n.contact_company)
                .push_bind(n.created_at);
        });
        builder.build().execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(rows)
    }

    async fn list_notifications(&self, audience: Audience, unread_only: bool, limit: i64) -> StoreResult<Vec<Notification>> {
        Ok(sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id IS NOT DISTINCT FROM $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(audience.user_id())
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn unread_count(&self, audience: Audience) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id IS NOT DISTINCT FROM $1 AND is_read = FALSE",
        )
        .bind(audience.user_id())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn mark_read(&self, id: Uuid, audience: Audience) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id IS NOT DISTINCT FROM $2",
        )
        .bind(id)
        .bind(audience.user_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, audience: Audience) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id IS NOT DISTINCT FROM $1 AND is_read = FALSE",
        )
        .bind(audience.user_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
