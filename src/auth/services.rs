use tracing::{debug, warn};

use crate::auth::{
    dto::CredentialsRequest,
    error::{AuthError, StoreError},
    password::{hash_password_blocking, verify_password_blocking},
    repo::CredentialStore,
    repo_types::User,
};

/// A name/password pair that passed shape validation.
#[derive(Debug)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = AuthError;

    fn try_from(req: CredentialsRequest) -> Result<Self, Self::Error> {
        match (req.name, req.password) {
            (Some(name), Some(password)) if !name.is_empty() && !password.is_empty() => {
                Ok(Self { name, password })
            }
            _ => Err(AuthError::Validation),
        }
    }
}

/// Registers a new user and returns the id the store assigned.
///
/// The name check and the insert are separate round trips, so two concurrent
/// registrations of the same name can both succeed unless the table carries
/// a unique constraint. When it does, the losing insert reports `Conflict`.
pub async fn register(store: &dyn CredentialStore, req: CredentialsRequest) -> Result<i64, AuthError> {
    let creds = Credentials::try_from(req)?;

    if store.find_by_name(&creds.name).await?.is_some() {
        warn!(name = %creds.name, "name already taken");
        return Err(AuthError::Conflict);
    }

    let hash = hash_password_blocking(creds.password).await?;

    match store.insert(&creds.name, &hash).await {
        Ok(Some(id)) => Ok(id),
        Ok(None) => {
            warn!(name = %creds.name, "insert reported no affected rows");
            Err(AuthError::RegistrationFailed)
        }
        Err(StoreError::Duplicate) => {
            warn!(name = %creds.name, "name taken between check and insert");
            Err(AuthError::Conflict)
        }
        Err(e) => Err(e.into()),
    }
}

/// Verifies a name/password pair and returns the matching user id.
pub async fn login(store: &dyn CredentialStore, req: CredentialsRequest) -> Result<i64, AuthError> {
    let creds = Credentials::try_from(req)?;

    let Some(user) = store.find_by_name(&creds.name).await? else {
        warn!(name = %creds.name, "login unknown name");
        return Err(AuthError::NotFound);
    };

    if !verify_password_blocking(creds.password, user.password_hash).await? {
        warn!(name = %creds.name, user_id = user.id, "login invalid password");
        return Err(AuthError::Unauthorized);
    }

    Ok(user.id)
}

/// Every stored user, hashes included.
pub async fn list_users(store: &dyn CredentialStore) -> Result<Vec<User>, AuthError> {
    let users = store.list_all().await?;
    debug!(count = users.len(), "listed users");
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::memory::InMemoryStore;
    use async_trait::async_trait;

    fn creds(name: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            name: Some(name.into()),
            password: Some(password.into()),
        }
    }

    /// Fails the test on any store access.
    struct UntouchedStore;

    #[async_trait]
    impl CredentialStore for UntouchedStore {
        async fn find_by_name(&self, _name: &str) -> Result<Option<User>, StoreError> {
            panic!("store accessed before validation")
        }
        async fn insert(&self, _n: &str, _h: &str) -> Result<Option<i64>, StoreError> {
            panic!("store accessed before validation")
        }
        async fn list_all(&self) -> Result<Vec<User>, StoreError> {
            panic!("store accessed before validation")
        }
    }

    /// Finds nobody and accepts inserts without writing anything.
    struct ZeroRowStore;

    #[async_trait]
    impl CredentialStore for ZeroRowStore {
        async fn find_by_name(&self, _name: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }
        async fn insert(&self, _n: &str, _h: &str) -> Result<Option<i64>, StoreError> {
            Ok(None)
        }
        async fn list_all(&self) -> Result<Vec<User>, StoreError> {
            Ok(Vec::new())
        }
    }

    /// Simulates losing the race against a unique constraint.
    struct RacingStore;

    #[async_trait]
    impl CredentialStore for RacingStore {
        async fn find_by_name(&self, _name: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }
        async fn insert(&self, _n: &str, _h: &str) -> Result<Option<i64>, StoreError> {
            Err(StoreError::Duplicate)
        }
        async fn list_all(&self) -> Result<Vec<User>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn register_then_login_returns_same_id() {
        let store = InMemoryStore::new();
        let id = register(&store, creds("alice", "secret1")).await.unwrap();
        let logged_in = login(&store, creds("alice", "secret1")).await.unwrap();
        assert_eq!(id, logged_in);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let store = InMemoryStore::new();
        register(&store, creds("alice", "secret1")).await.unwrap();
        let err = register(&store, creds("alice", "other")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let store = InMemoryStore::new();
        register(&store, creds("alice", "secret1")).await.unwrap();
        let err = login(&store, creds("bob", "secret1")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let store = InMemoryStore::new();
        register(&store, creds("alice", "secret1")).await.unwrap();
        let err = login(&store, creds("alice", "wrong")).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_plaintext() {
        let store = InMemoryStore::new();
        register(&store, creds("alice", "secret1")).await.unwrap();
        register(&store, creds("bob", "secret1")).await.unwrap();

        let users = list_users(&store).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| !u.password_hash.is_empty()));
        assert!(users.iter().all(|u| u.password_hash != "secret1"));
        assert_ne!(users[0].password_hash, users[1].password_hash);
    }

    #[tokio::test]
    async fn missing_or_empty_fields_fail_before_store_access() {
        let cases = [
            CredentialsRequest::default(),
            CredentialsRequest {
                name: Some("alice".into()),
                password: None,
            },
            CredentialsRequest {
                name: None,
                password: Some("secret1".into()),
            },
            creds("", "secret1"),
            creds("alice", ""),
        ];

        for case in cases {
            let reg = register(&UntouchedStore, CredentialsRequest {
                name: case.name.clone(),
                password: case.password.clone(),
            })
            .await
            .unwrap_err();
            assert!(matches!(reg, AuthError::Validation));

            let log = login(&UntouchedStore, case).await.unwrap_err();
            assert!(matches!(log, AuthError::Validation));
        }
    }

    #[tokio::test]
    async fn whitespace_is_a_present_value() {
        let store = InMemoryStore::new();
        let id = register(&store, creds(" ", " ")).await.unwrap();
        assert_eq!(login(&store, creds(" ", " ")).await.unwrap(), id);
    }

    #[tokio::test]
    async fn zero_affected_rows_is_registration_failure() {
        let err = register(&ZeroRowStore, creds("alice", "secret1")).await.unwrap_err();
        assert!(matches!(err, AuthError::RegistrationFailed));
    }

    #[tokio::test]
    async fn unique_violation_on_insert_is_conflict() {
        let err = register(&RacingStore, creds("alice", "secret1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let err = list_users(&RacingStore).await.unwrap_err();
        assert!(matches!(err, AuthError::Store(StoreError::Unavailable(_))));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_internal() {
        let store = InMemoryStore::new();
        store.insert("mallory", "plaintext-by-mistake").await.unwrap();
        let err = login(&store, creds("mallory", "plaintext-by-mistake")).await.unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
