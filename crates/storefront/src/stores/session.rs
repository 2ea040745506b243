//! Signed-in user store.

use std::sync::Arc;

use tracing::info;

use super::load_or_default;
use crate::models::User;
use crate::storage::{Storage, StorageError, keys, write_json};

/// Store for the `current-user` document.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    user: Option<User>,
}

impl SessionStore {
    /// Open the session. A malformed document means nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self, StorageError> {
        let user = load_or_default(storage.as_ref(), keys::CURRENT_USER)?;
        Ok(Self { storage, user })
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether the signed-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Persist `user` as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn sign_in(&mut self, user: User) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), keys::CURRENT_USER, &user)?;
        info!(user_id = %user.id, is_admin = user.is_admin, "Signed in");
        self.user = Some(user);
        Ok(())
    }

    /// Forget the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        self.storage.remove(keys::CURRENT_USER)?;
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use metamart_core::{Email, UserId};

    use super::*;
    use crate::storage::MemoryStorage;

    fn user() -> User {
        User {
            id: UserId::new("u-1"),
            email: Email::parse("asha@example.com").unwrap(),
            name: "asha".to_string(),
            is_admin: false,
            provider: None,
        }
    }

    #[test]
    fn test_sign_in_persists() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut session = SessionStore::open(Arc::clone(&storage)).unwrap();
        assert!(session.current().is_none());

        session.sign_in(user()).unwrap();
        let reopened = SessionStore::open(Arc::clone(&storage)).unwrap();
        assert_eq!(reopened.current(), Some(&user()));
        assert!(!reopened.is_admin());

        session.sign_out().unwrap();
        assert!(SessionStore::open(storage).unwrap().current().is_none());
    }

    #[test]
    fn test_malformed_user_means_signed_out() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.write(keys::CURRENT_USER, "{\"id\": 3}").unwrap();
        assert!(SessionStore::open(storage).unwrap().current().is_none());
    }
}
