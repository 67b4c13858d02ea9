//! Sleep Quality Controller
//!
//! Backs the rating screen that opens after a night is stopped. Saving a
//! rating persists it on the night and asks the view to navigate back.

use crate::config::BehaviorConfig;
use crate::ports::night_store::{NightStore, StoreError};
use crate::ports::screen_state::QualityScreenState;
use crate::use_cases::shared::{ScreenScope, TrackerError, publish, report, store_call};
use sleep_domain::{NightId, SleepQuality};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Controller for the sleep quality screen of one night
pub struct SleepQualityController<S: NightStore + 'static> {
    store: Arc<S>,
    night_id: NightId,
    behavior: BehaviorConfig,
    state: Arc<watch::Sender<QualityScreenState>>,
    scope: ScreenScope,
}

impl<S: NightStore + 'static> SleepQualityController<S> {
    pub fn new(store: Arc<S>, night_id: NightId) -> Self {
        let (state, _) = watch::channel(QualityScreenState::default());
        Self {
            store,
            night_id,
            behavior: BehaviorConfig::default(),
            state: Arc::new(state),
            scope: ScreenScope::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn night_id(&self) -> NightId {
        self.night_id
    }

    /// Save the rating for this screen's night.
    pub fn on_set_sleep_quality(&self, quality: SleepQuality) -> JoinHandle<()> {
        let store = self.store.clone();
        let night_id = self.night_id;
        let timeout = self.behavior.store_timeout;
        let state = self.state.clone();
        let token = self.scope.token();

        self.scope.spawn(async move {
            let result = async {
                let mut night = store_call(&token, timeout, "get", store.get(night_id))
                    .await?
                    .ok_or(StoreError::NotFound(night_id))?;
                night.rate(quality);
                store_call(&token, timeout, "update", store.update(&night)).await?;
                debug!(%night_id, %quality, "night rated");

                publish(&state, &token, |s| s.navigate_back.fire(()));
                Ok::<(), TrackerError>(())
            }
            .await;

            if let Some(message) = report("rate", result) {
                publish(&state, &token, |s| s.error.fire(message));
            }
        })
    }

    /// Mark the navigate-back request as handled.
    pub fn acknowledge_navigate_back(&self) {
        self.state.send_if_modified(|s| {
            let was_pending = s.navigate_back.is_pending();
            s.navigate_back.acknowledge();
            was_pending
        });
    }

    pub fn acknowledge_error(&self) {
        self.state.send_if_modified(|s| {
            let was_pending = s.error.is_pending();
            s.error.acknowledge();
            was_pending
        });
    }

    pub fn state(&self) -> QualityScreenState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QualityScreenState> {
        self.state.subscribe()
    }

    pub async fn settled(&self) {
        self.scope.settled().await;
    }

    pub fn close(&self) {
        self.scope.close(&self.state);
    }
}
