use std::sync::Arc;

use crate::auth::{memory::InMemoryStore, repo::CredentialStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn from_parts(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// State backed by an empty [`InMemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_parts(Arc::new(InMemoryStore::new()))
    }
}
