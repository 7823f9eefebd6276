use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::{abort, TransactionError};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
enum CreateConflict {
    Username,
    Email,
}

impl Store {
    /// Inserts `user` together with its email index in one transaction, so
    /// two concurrent registrations can never claim the same username or
    /// email.
    pub fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let user_key = keys::user_key(&user.username);
        let email_key = keys::user_email_index_key(&user.email);
        let user_bytes = Self::serialize(user)?;

        self.users
            .transaction(|tx| {
                if tx.get(user_key.as_bytes())?.is_some() {
                    return abort(CreateConflict::Username);
                }
                if tx.get(email_key.as_bytes())?.is_some() {
                    return abort(CreateConflict::Email);
                }
                tx.insert(user_key.as_bytes(), user_bytes.as_slice())?;
                tx.insert(email_key.as_bytes(), user_key.as_bytes())?;
                Ok(())
            })
            .map_err(|e: TransactionError<CreateConflict>| match e {
                TransactionError::Abort(CreateConflict::Username) => StoreError::Conflict {
                    entity: "username".to_string(),
                    key: user.username.clone(),
                },
                TransactionError::Abort(CreateConflict::Email) => StoreError::Conflict {
                    entity: "user_email".to_string(),
                    key: user.email.clone(),
                },
                TransactionError::Storage(se) => StoreError::Sled(se),
            })?;

        let index_key =
            keys::user_created_at_key(user.created_at.timestamp_millis(), &user.username);
        self.users_by_created_at
            .insert(index_key.as_bytes(), user_key.as_bytes())?;

        Ok(())
    }

    pub fn get_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Self::get_json(&self.users, &keys::user_key(username))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let index_key = keys::user_email_index_key(email);
        let Some(raw) = self.users.get(index_key.as_bytes())? else {
            return Ok(None);
        };
        let username = match String::from_utf8(raw.to_vec()) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid UTF-8 in user email index");
                return Ok(None);
            }
        };
        self.get_user(&username)
    }

    pub fn user_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self
            .users
            .contains_key(keys::user_key(username).as_bytes())?)
    }

    /// Newest first.
    pub fn list_users(&self, limit: usize, offset: usize) -> Result<Vec<User>, StoreError> {
        let mut users = Vec::new();
        for item in self.users_by_created_at.iter().rev().skip(offset) {
            if users.len() >= limit {
                break;
            }
            let (_, user_key) = item?;
            let user_key = String::from_utf8_lossy(&user_key);
            if let Some(user) = self.get_user(&user_key)? {
                users.push(user);
            }
        }
        Ok(users)
    }

    pub fn count_users(&self) -> usize {
        self.users_by_created_at.len()
    }
}
