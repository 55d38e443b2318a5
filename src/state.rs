use crate::accounts::repo::{AccountStore, PgAccountStore};
use crate::accounts::services::AccountService;
use crate::auth::{jwt::JwtKeys, password::Passwords};
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
}

impl AppState {
    /// Production wiring: Postgres store, keys and hasher from config, built once.
    pub fn new(db: PgPool, config: &AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(PgAccountStore::new(db)) as Arc<dyn AccountStore>;
        let keys = Arc::new(JwtKeys::from_config(&config.jwt));
        let passwords = Arc::new(Passwords::from_config(&config.password)?);
        Ok(Self::from_parts(store, keys, passwords))
    }

    pub fn from_parts(
        store: Arc<dyn AccountStore>,
        keys: Arc<JwtKeys>,
        passwords: Arc<Passwords>,
    ) -> Self {
        Self {
            accounts: AccountService::new(store, keys, passwords),
        }
    }
}
