use crate::gap::types::RatingState;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_rating_state(&self, username: &str) -> Result<Option<RatingState>, StoreError> {
        Self::get_json(&self.rating_states, &keys::rating_state_key(username))
    }

    pub fn set_rating_state(&self, username: &str, state: &RatingState) -> Result<(), StoreError> {
        Self::put_json(&self.rating_states, &keys::rating_state_key(username), state)
    }

    pub fn delete_rating_state(&self, username: &str) -> Result<(), StoreError> {
        self.rating_states
            .remove(keys::rating_state_key(username).as_bytes())?;
        Ok(())
    }
}
