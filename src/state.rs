use std::sync::Arc;

use crate::auth::password::{PasswordError, SecretHasher};
use crate::config::AppConfig;
use crate::database::Store;

/// Shared handles passed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub hasher: SecretHasher,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Result<Self, PasswordError> {
        let hasher = SecretHasher::new(&config.security)?;
        Ok(Self {
            store,
            config: Arc::new(config),
            hasher,
        })
    }
}
