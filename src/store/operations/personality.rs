use crate::assessment::personality::PersonalityResult;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_personality_result(
        &self,
        username: &str,
    ) -> Result<Option<PersonalityResult>, StoreError> {
        Self::get_json(&self.personality_results, &keys::personality_result_key(username))
    }

    pub fn set_personality_result(
        &self,
        username: &str,
        result: &PersonalityResult,
    ) -> Result<(), StoreError> {
        Self::put_json(
            &self.personality_results,
            &keys::personality_result_key(username),
            result,
        )
    }
}
