//! Key-ordered table of nights shared by the store adapters.

use serde::{Deserialize, Serialize};
use sleep_application::StoreError;
use sleep_domain::{NightId, SleepNight};
use std::collections::BTreeMap;

/// Nights keyed by id, plus the id counter
///
/// The counter survives `clear`, so an id is never handed out twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NightTable {
    nights: BTreeMap<NightId, SleepNight>,
    last_id: NightId,
}

/// On-disk layout of a [`NightTable`]
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TableFile {
    pub version: u32,
    pub last_id: NightId,
    /// Oldest first
    pub nights: Vec<SleepNight>,
}

pub(crate) const TABLE_FILE_VERSION: u32 = 1;

impl NightTable {
    pub(crate) fn insert(&mut self, night: &SleepNight) -> NightId {
        let id = self.last_id.next();
        self.last_id = id;
        self.nights.insert(id, night.clone().with_id(id));
        id
    }

    pub(crate) fn update(&mut self, night: &SleepNight) -> Result<(), StoreError> {
        let slot = self
            .nights
            .get_mut(&night.id)
            .ok_or(StoreError::NotFound(night.id))?;
        *slot = night.clone();
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.nights.clear();
    }

    pub(crate) fn get(&self, id: NightId) -> Option<SleepNight> {
        self.nights.get(&id).cloned()
    }

    /// The night with the highest id.
    pub(crate) fn current(&self) -> Option<SleepNight> {
        self.nights.values().next_back().cloned()
    }

    /// All nights, most recent first.
    pub(crate) fn snapshot(&self) -> Vec<SleepNight> {
        self.nights.values().rev().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.nights.len()
    }

    pub(crate) fn to_file(&self) -> TableFile {
        TableFile {
            version: TABLE_FILE_VERSION,
            last_id: self.last_id,
            nights: self.nights.values().cloned().collect(),
        }
    }

    pub(crate) fn from_file(file: TableFile) -> Result<Self, StoreError> {
        if file.version != TABLE_FILE_VERSION {
            return Err(StoreError::Other(format!(
                "unsupported store file version {}",
                file.version
            )));
        }
        let mut nights = BTreeMap::new();
        for night in file.nights {
            if !night.id.is_assigned() {
                return Err(StoreError::Other("night without id in store file".into()));
            }
            nights.insert(night.id, night);
        }
        // Tolerate a counter that lags behind the data.
        let highest = nights.keys().next_back().copied().unwrap_or_default();
        Ok(Self {
            nights,
            last_id: file.last_id.max(highest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn night(hour: u32) -> SleepNight {
        SleepNight::begin(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut table = NightTable::default();
        let first = table.insert(&night(1));
        let second = table.insert(&night(2));
        assert_eq!(first, NightId::new(1));
        assert_eq!(second, NightId::new(2));
        assert_eq!(table.current().unwrap().id, second);
    }

    #[test]
    fn test_snapshot_is_most_recent_first() {
        let mut table = NightTable::default();
        table.insert(&night(1));
        table.insert(&night(2));
        table.insert(&night(3));
        let ids: Vec<i64> = table.snapshot().iter().map(|n| n.id.value()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut table = NightTable::default();
        table.insert(&night(1));
        table.clear();
        assert_eq!(table.len(), 0);
        assert_eq!(table.insert(&night(2)), NightId::new(2));
    }

    #[test]
    fn test_update_unknown_night_fails() {
        let mut table = NightTable::default();
        let missing = night(1).with_id(NightId::new(9));
        assert!(matches!(
            table.update(&missing),
            Err(StoreError::NotFound(id)) if id == NightId::new(9)
        ));
    }

    #[test]
    fn test_from_file_repairs_lagging_counter() {
        let file = TableFile {
            version: TABLE_FILE_VERSION,
            last_id: NightId::new(1),
            nights: vec![night(1).with_id(NightId::new(5))],
        };
        let mut table = NightTable::from_file(file).unwrap();
        assert_eq!(table.insert(&night(2)), NightId::new(6));
    }

    #[test]
    fn test_from_file_rejects_unknown_version() {
        let file = TableFile {
            version: 99,
            last_id: NightId::UNASSIGNED,
            nights: Vec::new(),
        };
        assert!(NightTable::from_file(file).is_err());
    }
}
