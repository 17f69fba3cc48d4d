use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::*;
use super::store::{add_minutes, add_revenue, apply_credit_delta, Audience, Store, StoreError, StoreResult};
use crate::types::{PaymentStatus, UserCategory};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    system: SystemSettings,
    category_settings: HashMap<UserCategory, CategoryBotSettings>,
    user_settings: HashMap<Uuid, UserBotSettings>,
    leads: Vec<Lead>,
    call_logs: Vec<CallLog>,
    payments: Vec<Payment>,
    transactions: Vec<Transaction>,
    notifications: Vec<Notification>,
}

/// In-process store for tests and `STORE=memory` runs.
///
/// A single lock guards every table, so each trait method is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut rows: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>, limit: i64) -> Vec<T> {
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows.truncate(limit.max(0) as usize);
    rows
}

fn user_mut<'a>(tables: &'a mut Tables, id: Uuid) -> StoreResult<&'a mut User> {
    tables
        .users
        .get_mut(&id)
        .ok_or_else(|| StoreError::NotFound(format!("User {} not found", id)))
}

/// Settle a pending payment while the caller holds the write lock.
/// Fails before touching any row when the payment or credit change is refused.
fn settle_locked(tables: &mut Tables, id: Uuid, settlement: Settlement) -> StoreResult<SettledPayment> {
    let index = tables
        .payments
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| StoreError::NotFound(format!("Payment {} not found", id)))?;

    let payment = tables.payments[index].clone();
    if payment.status != PaymentStatus::Pending {
        return Err(StoreError::Conflict(format!(
            "Payment is already {}",
            payment.status
        )));
    }

    let now = Utc::now();
    let user = user_mut(tables, payment.user_id)?;
    let credits_before = user.credits_balance;
    let credits_after = apply_credit_delta(credits_before, settlement.credit_delta)?;
    user.credits_balance = credits_after;
    if let Some(days) = settlement.advance_billing_days {
        user.next_billing_date += Duration::days(days);
        user.payment_status = PaymentStatus::Paid;
    }
    user.updated_at = now;

    let paid = &mut tables.payments[index];
    paid.status = PaymentStatus::Paid;
    paid.payment_reference = Some(settlement.payment_reference);
    paid.paid_date = Some(now);
    let payment = paid.clone();

    let transaction = Transaction {
        id: Uuid::new_v4(),
        user_id: payment.user_id,
        amount: payment.amount,
        transaction_type: payment.transaction_type,
        description: settlement.ledger_description,
        credits_before,
        credits_after,
        created_at: now,
    };
    tables.transactions.push(transaction.clone());

    Ok(SettledPayment { payment, transaction })
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        let user = user.into_user();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("Email {} already registered", user.email)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self.tables.read().await.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, include_admins: bool) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| include_admins || !u.role.is_admin())
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &update.email {
            let email = email.to_lowercase();
            if tables.users.values().any(|u| u.id != id && u.email == email) {
                return Err(StoreError::Conflict(format!("Email {} already registered", email)));
            }
        }
        let user = user_mut(&mut tables, id)?;
        update.apply(user);
        Ok(user.clone())
    }

    async fn set_user_status(&self, id: Uuid, change: StatusChange) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        let user = user_mut(&mut tables, id)?;
        change.apply(user);
        Ok(user.clone())
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = user_mut(&mut tables, id)?;
        user.password_hash = hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_pin_hash(&self, id: Uuid, hash: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = user_mut(&mut tables, id)?;
        user.pin_hash = Some(hash.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_reset_code(&self, id: Uuid, code_hash: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = user_mut(&mut tables, id)?;
        user.reset_code_hash = Some(code_hash.to_string());
        user.reset_code_expires_at = Some(expires_at);
        Ok(())
    }

    async fn clear_reset_code(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = user_mut(&mut tables, id)?;
        user.reset_code_hash = None;
        user.reset_code_expires_at = None;
        Ok(())
    }

    async fn system_settings(&self) -> StoreResult<SystemSettings> {
        Ok(self.tables.read().await.system.clone())
    }

    async fn set_global_pause(&self, paused: bool, reason: Option<String>, updated_by: Uuid) -> StoreResult<SystemSettings> {
        let mut tables = self.tables.write().await;
        tables.system = SystemSettings {
            is_global_paused: paused,
            pause_reason: if paused { reason } else { None },
            updated_by: Some(updated_by),
            updated_at: Utc::now(),
        };
        Ok(tables.system.clone())
    }

    async fn category_settings(&self, category: UserCategory) -> StoreResult<Option<CategoryBotSettings>> {
        Ok(self.tables.read().await.category_settings.get(&category).cloned())
    }

    async fn list_category_settings(&self) -> StoreResult<Vec<CategoryBotSettings>> {
        let tables = self.tables.read().await;
        let mut settings: Vec<_> = tables.category_settings.values().cloned().collect();
        settings.sort_by_key(|s| s.category.as_str());
        Ok(settings)
    }

    async fn upsert_category_settings(
        &self,
        category: UserCategory,
        update: CategoryBotSettingsUpdate,
        updated_by: Option<Uuid>,
    ) -> StoreResult<CategoryBotSettings> {
        let mut tables = self.tables.write().await;
        let existing = tables.category_settings.remove(&category);
        let merged = update.merge(existing, category, updated_by);
        tables.category_settings.insert(category, merged.clone());
        Ok(merged)
    }

    async fn user_override(&self, user_id: Uuid) -> StoreResult<Option<UserBotSettings>> {
        Ok(self.tables.read().await.user_settings.get(&user_id).cloned())
    }

    async fn upsert_user_override(&self, user_id: Uuid, update: UserBotSettingsUpdate) -> StoreResult<UserBotSettings> {
        let mut tables = self.tables.write().await;
        let existing = tables.user_settings.remove(&user_id);
        let merged = update.merge(existing, user_id);
        tables.user_settings.insert(user_id, merged.clone());
        Ok(merged)
    }

    async fn delete_user_override(&self, user_id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.user_settings.remove(&user_id).is_some())
    }

    async fn insert_leads(&self, user_id: Uuid, leads: Vec<NewLead>) -> StoreResult<Vec<Lead>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound(format!("User {} not found", user_id)));
        }
        let inserted: Vec<Lead> = leads.into_iter().map(|lead| lead.into_lead(user_id)).collect();
        tables.leads.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn list_leads(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<Lead>> {
        let tables = self.tables.read().await;
        let rows = tables.leads.iter().filter(|l| l.user_id == user_id).cloned().collect();
        Ok(newest_first(rows, |l| l.created_at, limit))
    }

    async fn lead_by_id(&self, id: Uuid) -> StoreResult<Option<Lead>> {
        Ok(self.tables.read().await.leads.iter().find(|l| l.id == id).cloned())
    }

    async fn record_call(&self, call: NewCallLog) -> StoreResult<CallLog> {
        let mut tables = self.tables.write().await;
        let log = call.into_call_log();
        let user = user_mut(&mut tables, log.user_id)?;
        let minutes_used = add_minutes(user.minutes_used, log.duration_minutes)?;
        let revenue_generated = add_revenue(user.revenue_generated, log.revenue_generated)?;
        user.minutes_used = minutes_used;
        user.revenue_generated = revenue_generated;
        user.updated_at = Utc::now();
        tables.call_logs.push(log.clone());
        Ok(log)
    }

    async fn list_call_logs(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<CallLog>> {
        let tables = self.tables.read().await;
        let rows = tables.call_logs.iter().filter(|c| c.user_id == user_id).cloned().collect();
        Ok(newest_first(rows, |c| c.created_at, limit))
    }

    async fn list_call_logs_with_users(&self, limit: i64) -> StoreResult<Vec<CallLogWithUser>> {
        let tables = self.tables.read().await;
        let rows = tables
            .call_logs
            .iter()
            .map(|log| CallLogWithUser {
                log: log.clone(),
                user_name: tables.users.get(&log.user_id).map(|u| u.name.clone()),
            })
            .collect();
        Ok(newest_first(rows, |c| c.log.created_at, limit))
    }

    async fn insert_payment(&self, payment: Payment) -> StoreResult<Payment> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&payment.user_id) {
            return Err(StoreError::NotFound(format!("User {} not found", payment.user_id)));
        }
        tables.payments.push(payment.clone());
        Ok(payment)
    }

    async fn payment_by_id(&self, id: Uuid) -> StoreResult<Option<Payment>> {
        Ok(self.tables.read().await.payments.iter().find(|p| p.id == id).cloned())
    }

    async fn list_payments(&self, user_id: Option<Uuid>) -> StoreResult<Vec<Payment>> {
        let tables = self.tables.read().await;
        let rows: Vec<Payment> = tables
            .payments
            .iter()
            .filter(|p| user_id.map_or(true, |id| p.user_id == id))
            .cloned()
            .collect();
        Ok(newest_first(rows, |p| p.created_at, i64::MAX))
    }

    async fn settle_payment(&self, id: Uuid, settlement: Settlement) -> StoreResult<SettledPayment> {
        let mut tables = self.tables.write().await;
        settle_locked(&mut tables, id, settlement)
    }

    async fn insert_settled_payment(&self, payment: Payment, settlement: Settlement) -> StoreResult<SettledPayment> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&payment.user_id) {
            return Err(StoreError::NotFound(format!("User {} not found", payment.user_id)));
        }
        let id = payment.id;
        tables.payments.push(payment);
        let settled = settle_locked(&mut tables, id, settlement);
        if settled.is_err() {
            tables.payments.retain(|p| p.id != id);
        }
        settled
    }

    async fn list_transactions(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        let tables = self.tables.read().await;
        let rows = tables.transactions.iter().filter(|t| t.user_id == user_id).cloned().collect();
        Ok(newest_first(rows, |t| t.created_at, i64::MAX))
    }

    async fn insert_notifications(&self, notifications: Vec<NewNotification>) -> StoreResult<Vec<Notification>> {
        let mut tables = self.tables.write().await;
        let inserted: Vec<Notification> = notifications.into_iter().map(NewNotification::into_notification).collect();
        tables.notifications.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn list_notifications(&self, audience: Audience, unread_only: bool, limit: i64) -> StoreResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        let rows = tables
            .notifications
            .iter()
            .filter(|n| audience.matches(n) && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        Ok(newest_first(rows, |n| n.created_at, limit))
    }

    async fn unread_count(&self, audience: Audience) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.notifications.iter().filter(|n| audience.matches(n) && !n.is_read).count() as i64)
    }

    async fn mark_read(&self, id: Uuid, audience: Audience) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.notifications.iter_mut().find(|n| n.id == id && audience.matches(n)) {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, audience: Audience) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut count = 0;
        for notification in tables.notifications.iter_mut().filter(|n| audience.matches(n) && !n.is_read) {
            notification.is_read = true;
            count += 1;
        }
        Ok(count)
    }
}
