use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::database::models::{CategoryBotSettingsUpdate, NewUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{BotModel, UserCategory, UserRole};

pub const ADMIN_EMAIL: &str = "admin@lumaa.ai";
pub const ADMIN_PIN: &str = "1234";
pub const DEMO_USER_EMAIL: &str = "user@lumaa.ai";
pub const DEMO_USER_PIN: &str = "5678";

#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub users_created: Vec<String>,
    pub categories_seeded: Vec<UserCategory>,
}

pub fn default_opening_message(category: UserCategory) -> String {
    format!(
        "Hello! I'm an AI assistant specialized in {}. How can I help you today?",
        category.title()
    )
}

pub fn default_prompt(category: UserCategory) -> String {
    format!(
        "You are a professional AI assistant for {}. Be helpful, knowledgeable, and maintain a professional tone.",
        category.title()
    )
}

struct SeedAccount {
    name: &'static str,
    email: &'static str,
    pin: &'static str,
    role: UserRole,
    category: UserCategory,
    minutes_used: i32,
    credits: i64,
}

const ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        name: "Admin User",
        email: ADMIN_EMAIL,
        pin: ADMIN_PIN,
        role: UserRole::Admin,
        category: UserCategory::Sales,
        minutes_used: 0,
        credits: 0,
    },
    SeedAccount {
        name: "Demo User",
        email: DEMO_USER_EMAIL,
        pin: DEMO_USER_PIN,
        role: UserRole::User,
        category: UserCategory::RealEstate,
        minutes_used: 234,
        credits: 250,
    },
];

/// Create the demo accounts and category defaults that are missing. Safe to run repeatedly.
pub async fn seed(state: &AppState) -> Result<SeedReport, ApiError> {
    let mut report = SeedReport::default();
    let billing = &state.config.billing;
    let password = &state.config.seed.demo_password;
    if password.is_empty() {
        return Err(ApiError::bad_request("SEED_DEMO_PASSWORD must be set to seed accounts"));
    }

    for account in ACCOUNTS {
        if state.store.user_by_email(account.email).await?.is_some() {
            continue;
        }
        let user = state
            .store
            .insert_user(NewUser {
                name: account.name.to_string(),
                email: account.email.to_string(),
                password_hash: state.hasher.hash_async(password).await?,
                pin_hash: Some(state.hasher.hash_async(account.pin).await?),
                role: account.role,
                category: account.category,
                function: None,
                sip_endpoint: None,
                prompt: None,
                minutes_allocated: billing.default_minutes_allocated,
                minutes_used: account.minutes_used,
                credits_balance: Decimal::new(account.credits, 0),
                monthly_plan_cost: billing.default_plan_cost,
                next_billing_date: Utc::now() + Duration::days(billing.cycle_days),
            })
            .await?;
        info!("Seeded {} account {}", user.role, user.email);
        report.users_created.push(user.email);
    }

    for &category in UserCategory::ALL {
        if state.store.category_settings(category).await?.is_some() {
            continue;
        }
        let update = CategoryBotSettingsUpdate {
            model: Some(BotModel::Gpt4),
            temperature: Some(0.7),
            opening_message: Some(default_opening_message(category)),
            prompt: Some(default_prompt(category)),
        };
        state.store.upsert_category_settings(category, update, None).await?;
        report.categories_seeded.push(category);
    }

    if !report.categories_seeded.is_empty() {
        info!("Seeded bot settings for {} categories", report.categories_seeded.len());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_state;

    #[test]
    fn default_texts_name_the_category() {
        assert_eq!(
            default_opening_message(UserCategory::RealEstate),
            "Hello! I'm an AI assistant specialized in Real Estate. How can I help you today?"
        );
        assert!(default_prompt(UserCategory::Automotive).contains("for Automotive."));
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let state = test_state();
        let first = seed(&state).await.unwrap();
        assert_eq!(first.users_created.len(), 2);
        assert_eq!(first.categories_seeded.len(), UserCategory::ALL.len());

        let second = seed(&state).await.unwrap();
        assert!(second.users_created.is_empty());
        assert!(second.categories_seeded.is_empty());

        let demo = state.store.user_by_email(DEMO_USER_EMAIL).await.unwrap().unwrap();
        assert_eq!(demo.minutes_used, 234);
        assert_eq!(demo.credits_balance, Decimal::new(250, 0));
        assert_eq!(demo.category, UserCategory::RealEstate);
    }
}
