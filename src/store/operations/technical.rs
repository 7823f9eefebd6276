use sled::transaction::{ConflictableTransactionError, TransactionError};

use crate::assessment::technical::TechnicalProgress;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_technical_progress(
        &self,
        username: &str,
    ) -> Result<Option<TechnicalProgress>, StoreError> {
        Self::get_json(&self.technical_progress, &keys::technical_progress_key(username))
    }

    pub fn set_technical_progress(
        &self,
        username: &str,
        progress: &TechnicalProgress,
    ) -> Result<(), StoreError> {
        Self::put_json(
            &self.technical_progress,
            &keys::technical_progress_key(username),
            progress,
        )
    }

    /// Applies `f` to the stored progress (default when absent) inside a
    /// transaction and returns the progress before and after.
    pub fn update_technical_progress<F>(
        &self,
        username: &str,
        f: F,
    ) -> Result<(TechnicalProgress, TechnicalProgress), StoreError>
    where
        F: Fn(TechnicalProgress) -> TechnicalProgress,
    {
        let key = keys::technical_progress_key(username);
        self.technical_progress
            .transaction(|tx| {
                let before: TechnicalProgress = match tx.get(key.as_bytes())? {
                    Some(raw) => {
                        Self::deserialize(&raw).map_err(ConflictableTransactionError::Abort)?
                    }
                    None => TechnicalProgress::default(),
                };
                let after = f(before.clone());
                let bytes = Self::serialize(&after).map_err(ConflictableTransactionError::Abort)?;
                tx.insert(key.as_bytes(), bytes)?;
                Ok((before, after))
            })
            .map_err(|e: TransactionError<StoreError>| match e {
                TransactionError::Abort(inner) => inner,
                TransactionError::Storage(se) => StoreError::Sled(se),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn update_starts_from_default() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let (before, after) = store
            .update_technical_progress("u1", |mut p| {
                p.solved += 1;
                p
            })
            .unwrap();
        assert_eq!(before, TechnicalProgress::default());
        assert_eq!(after.solved, 1);
        assert_eq!(store.get_technical_progress("u1").unwrap(), Some(after));
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("db").to_str().unwrap()).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store
                            .update_technical_progress("u1", |mut p| {
                                p.solved += 1;
                                p
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_technical_progress("u1").unwrap().unwrap().solved, 100);
    }
}
