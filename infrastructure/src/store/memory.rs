//! Volatile night store, for `--memory` runs and tests.

use super::table::NightTable;
use async_trait::async_trait;
use sleep_application::{NightStore, StoreError};
use sleep_domain::{NightId, SleepNight};
use tokio::sync::{Mutex, watch};
use tracing::trace;

/// Night store kept entirely in memory
pub struct InMemoryNightStore {
    table: Mutex<NightTable>,
    tx: watch::Sender<Vec<SleepNight>>,
}

impl Default for InMemoryNightStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNightStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            table: Mutex::new(NightTable::default()),
            tx,
        }
    }

    fn publish(&self, table: &NightTable) {
        self.tx.send_replace(table.snapshot());
    }
}

#[async_trait]
impl NightStore for InMemoryNightStore {
    fn all_nights(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.tx.subscribe()
    }

    async fn current_night(&self) -> Result<Option<SleepNight>, StoreError> {
        Ok(self.table.lock().await.current())
    }

    async fn get(&self, id: NightId) -> Result<Option<SleepNight>, StoreError> {
        Ok(self.table.lock().await.get(id))
    }

    async fn insert(&self, night: &SleepNight) -> Result<NightId, StoreError> {
        let mut table = self.table.lock().await;
        let id = table.insert(night);
        trace!(%id, "night inserted");
        self.publish(&table);
        Ok(id)
    }

    async fn update(&self, night: &SleepNight) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table.update(night)?;
        self.publish(&table);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table.clear();
        self.publish(&table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_observers_see_mutations() {
        let store = InMemoryNightStore::new();
        let mut rx = store.all_nights();
        assert!(rx.borrow_and_update().is_empty());

        let start = Utc.with_ymd_and_hms(2024, 2, 1, 23, 0, 0).unwrap();
        let id = store.insert(&SleepNight::begin(start)).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update()[0].id, id);

        let mut night = store.get(id).await.unwrap().unwrap();
        night.finish(start + chrono::Duration::hours(7)).unwrap();
        store.update(&night).await.unwrap();
        assert_eq!(store.current_night().await.unwrap(), Some(night));

        store.delete_all().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
        assert_eq!(store.current_night().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_missing_night() {
        let store = InMemoryNightStore::new();
        let night = SleepNight::begin(Utc::now()).with_id(NightId::new(3));
        assert!(matches!(
            store.update(&night).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
