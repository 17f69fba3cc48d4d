use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::MemoryStore;
use crate::state::AppState;

/// Development config with argon2 cost turned down so tests stay fast.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.argon2_memory_kib = 1024;
    config.security.argon2_iterations = 1;
    config.seed.on_startup = false;
    config
}

/// Fresh state over an empty in-memory store.
pub fn test_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), test_config()).expect("test argon2 params are valid")
}
