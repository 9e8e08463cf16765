use std::sync::Arc;

use crate::auth::{CredentialStore, TokenService};
use crate::config::Config;
use crate::store::Store;

/// Shared, read-only handler dependencies. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub credentials: CredentialStore,
    pub tokens: Arc<TokenService>,
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn new<S: Store + 'static>(store: Arc<S>, config: &Config) -> Self {
        Self {
            credentials: CredentialStore::new(store.clone(), config.bcrypt_cost),
            store,
            tokens: Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl_days)),
            max_image_bytes: config.max_image_bytes,
        }
    }
}
