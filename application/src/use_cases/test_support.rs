//! Hand-written test doubles for the controller tests.

use crate::ports::clock::Clock;
use crate::ports::night_store::{NightStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sleep_domain::{NightId, SleepNight};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, watch};

/// Clock that only moves when told to
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap()),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

struct GateInner {
    arrived: Notify,
    released: Notify,
    open: AtomicBool,
}

/// Holds every store call until released
pub(crate) struct Gate {
    inner: Arc<GateInner>,
}

impl Gate {
    /// Wait until a store call is parked at the gate.
    pub(crate) async fn wait_for_caller(&self) {
        self.inner.arrived.notified().await;
    }

    pub(crate) fn release(&self) {
        self.inner.open.store(true, Ordering::SeqCst);
        self.inner.released.notify_one();
    }
}

/// In-memory store with failure injection and call counting
pub(crate) struct FakeStore {
    nights: Mutex<BTreeMap<NightId, SleepNight>>,
    last_id: Mutex<NightId>,
    tx: watch::Sender<Vec<SleepNight>>,
    gate: Mutex<Option<Arc<GateInner>>>,
    failure: Mutex<Option<StoreError>>,
    inserts: AtomicUsize,
    mutations: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            nights: Mutex::new(BTreeMap::new()),
            last_id: Mutex::new(NightId::UNASSIGNED),
            tx,
            gate: Mutex::new(None),
            failure: Mutex::new(None),
            inserts: AtomicUsize::new(0),
            mutations: AtomicUsize::new(0),
        }
    }

    /// Insert directly, bypassing counters and gates.
    pub(crate) fn seed(&self, night: SleepNight) -> NightId {
        let id = self.assign_id();
        self.nights.lock().unwrap().insert(id, night.with_id(id));
        self.publish();
        id
    }

    pub(crate) fn get_sync(&self, id: NightId) -> Option<SleepNight> {
        self.nights.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn fail_next(&self, error: StoreError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub(crate) fn hold(&self) -> Gate {
        let inner = Arc::new(GateInner {
            arrived: Notify::new(),
            released: Notify::new(),
            open: AtomicBool::new(false),
        });
        *self.gate.lock().unwrap() = Some(inner.clone());
        Gate { inner }
    }

    pub(crate) fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Completed insert/update/delete calls.
    pub(crate) fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn assign_id(&self) -> NightId {
        let mut last = self.last_id.lock().unwrap();
        *last = last.next();
        *last
    }

    fn publish(&self) {
        let snapshot: Vec<SleepNight> = self.nights.lock().unwrap().values().rev().cloned().collect();
        self.tx.send_replace(snapshot);
    }

    async fn enter(&self) -> Result<(), StoreError> {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate
            && !gate.open.load(Ordering::SeqCst)
        {
            gate.arrived.notify_one();
            gate.released.notified().await;
        }
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NightStore for FakeStore {
    fn all_nights(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.tx.subscribe()
    }

    async fn current_night(&self) -> Result<Option<SleepNight>, StoreError> {
        self.enter().await?;
        Ok(self.nights.lock().unwrap().values().next_back().cloned())
    }

    async fn get(&self, id: NightId) -> Result<Option<SleepNight>, StoreError> {
        self.enter().await?;
        Ok(self.get_sync(id))
    }

    async fn insert(&self, night: &SleepNight) -> Result<NightId, StoreError> {
        self.enter().await?;
        let id = self.assign_id();
        self.nights.lock().unwrap().insert(id, night.clone().with_id(id));
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.publish();
        Ok(id)
    }

    async fn update(&self, night: &SleepNight) -> Result<(), StoreError> {
        self.enter().await?;
        {
            let mut nights = self.nights.lock().unwrap();
            let slot = nights.get_mut(&night.id).ok_or(StoreError::NotFound(night.id))?;
            *slot = night.clone();
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.publish();
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.enter().await?;
        self.nights.lock().unwrap().clear();
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.publish();
        Ok(())
    }
}
