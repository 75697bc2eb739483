use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::{error::StoreError, repo::CredentialStore, repo_types::User};

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    last_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.iter().find(|u| u.name == name).cloned())
    }

    async fn insert(&self, name: &str, password_hash: &str) -> Result<Option<i64>, StoreError> {
        let mut inner = self.lock()?;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.users.push(User {
            id,
            name: name.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(Some(id))
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock()?.users.clone())
    }
}
