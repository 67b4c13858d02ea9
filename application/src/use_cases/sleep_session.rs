//! Sleep Session Controller
//!
//! Holds the state of the sleep tracker screen for one visit. User actions
//! (start, stop, clear) each launch a single task that talks to the
//! [`NightStore`] and republishes the outcome as a [`SleepScreenState`]
//! snapshot for the presentation layer to render.

use crate::config::{BehaviorConfig, DisplayConfig};
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::night_store::NightStore;
use crate::ports::screen_state::{Pending, SleepScreenState, Snackbar};
use crate::use_cases::shared::{ScreenScope, TrackerError, publish, report, store_call};
use sleep_domain::SleepNight;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// State owned by the controller; `nights` is read from the store's receiver.
#[derive(Debug, Clone, Default)]
struct SessionState {
    tonight: Option<SleepNight>,
    snackbar: Pending<Snackbar>,
    navigation: Pending<SleepNight>,
    error: Pending<String>,
}

/// Everything a spawned action needs, cloned out of the controller.
struct ActionContext<S: NightStore + 'static> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    behavior: BehaviorConfig,
    state: Arc<watch::Sender<SessionState>>,
    token: CancellationToken,
}

impl<S: NightStore + 'static> ActionContext<S> {
    /// The most recent night, if it is still open.
    async fn fetch_tonight(&self) -> Result<Option<SleepNight>, TrackerError> {
        let night = store_call(
            &self.token,
            self.behavior.store_timeout,
            "current_night",
            self.store.current_night(),
        )
        .await?;
        Ok(night.filter(SleepNight::is_active))
    }

    async fn initialize(&self) -> Result<(), TrackerError> {
        let tonight = self.fetch_tonight().await?;
        debug!(tracking = tonight.is_some(), "tonight loaded");
        publish(&self.state, &self.token, |s| s.tonight = tonight);
        Ok(())
    }

    async fn start(&self) -> Result<(), TrackerError> {
        let night = SleepNight::begin(self.clock.now());
        let id = store_call(
            &self.token,
            self.behavior.store_timeout,
            "insert",
            self.store.insert(&night),
        )
        .await?;
        debug!(%id, "night inserted");

        let tonight = self.fetch_tonight().await?;
        publish(&self.state, &self.token, |s| s.tonight = tonight);
        Ok(())
    }

    async fn stop(&self) -> Result<(), TrackerError> {
        let open = self
            .state
            .borrow()
            .tonight
            .clone()
            .filter(SleepNight::is_active);
        let Some(mut night) = open else {
            debug!("stop ignored, no active session");
            return Ok(());
        };

        night.finish(self.clock.now())?;
        store_call(
            &self.token,
            self.behavior.store_timeout,
            "update",
            self.store.update(&night),
        )
        .await?;

        publish(&self.state, &self.token, |s| {
            s.tonight = Some(night.clone());
            s.navigation.fire(night);
        });
        Ok(())
    }

    async fn clear(&self) -> Result<(), TrackerError> {
        store_call(
            &self.token,
            self.behavior.store_timeout,
            "delete_all",
            self.store.delete_all(),
        )
        .await?;

        publish(&self.state, &self.token, |s| {
            s.tonight = None;
            s.snackbar.fire(Snackbar::Cleared);
        });
        Ok(())
    }

    fn finish(&self, action: &'static str, result: Result<(), TrackerError>) {
        if let Some(message) = report(action, result) {
            publish(&self.state, &self.token, |s| s.error.fire(message));
        }
    }
}

/// Controller for the sleep tracker screen
///
/// Created once per screen visit; construction spawns the task that loads
/// tonight's session, so it must happen inside a tokio runtime. Dropping the
/// controller (or calling [`close`](Self::close)) cancels all in-flight work.
///
/// Every action returns the [`JoinHandle`] of the task it launched. Callers
/// that only care about the published state can ignore it.
pub struct SleepSessionController<S: NightStore + 'static> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    behavior: BehaviorConfig,
    display: DisplayConfig,
    state: Arc<watch::Sender<SessionState>>,
    nights: watch::Receiver<Vec<SleepNight>>,
    scope: ScreenScope,
}

impl<S: NightStore + 'static> SleepSessionController<S> {
    /// Create a controller using the system clock and default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_parts(
            store,
            Arc::new(SystemClock),
            BehaviorConfig::default(),
            DisplayConfig::default(),
        )
    }

    /// Create a controller with explicit collaborators.
    pub fn with_parts(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        behavior: BehaviorConfig,
        display: DisplayConfig,
    ) -> Self {
        let nights = store.all_nights();
        let (state, _) = watch::channel(SessionState::default());
        let controller = Self {
            store,
            clock,
            behavior,
            display,
            state: Arc::new(state),
            nights,
            scope: ScreenScope::new(),
        };

        let ctx = controller.context();
        controller.scope.spawn(async move {
            let result = ctx.initialize().await;
            ctx.finish("initialize", result);
        });
        controller
    }

    fn context(&self) -> ActionContext<S> {
        ActionContext {
            store: self.store.clone(),
            clock: self.clock.clone(),
            behavior: self.behavior.clone(),
            state: self.state.clone(),
            token: self.scope.token(),
        }
    }

    /// Start tracking tonight's sleep.
    pub fn on_start(&self) -> JoinHandle<()> {
        let ctx = self.context();
        self.scope.spawn(async move {
            let result = ctx.start().await;
            ctx.finish("start", result);
        })
    }

    /// Stop tracking; requests navigation to the rating screen.
    ///
    /// Does nothing when no session is active.
    pub fn on_stop(&self) -> JoinHandle<()> {
        let ctx = self.context();
        self.scope.spawn(async move {
            let result = ctx.stop().await;
            ctx.finish("stop", result);
        })
    }

    /// Delete the whole history.
    pub fn on_clear(&self) -> JoinHandle<()> {
        let ctx = self.context();
        self.scope.spawn(async move {
            let result = ctx.clear().await;
            ctx.finish("clear", result);
        })
    }

    /// Mark the navigation request as handled.
    pub fn acknowledge_navigation(&self) {
        self.state.send_if_modified(|s| {
            let was_pending = s.navigation.is_pending();
            s.navigation.acknowledge();
            was_pending
        });
    }

    /// Mark the snackbar request as handled.
    pub fn acknowledge_snackbar(&self) {
        self.state.send_if_modified(|s| {
            let was_pending = s.snackbar.is_pending();
            s.snackbar.acknowledge();
            was_pending
        });
    }

    /// Mark the last error as shown.
    pub fn acknowledge_error(&self) {
        self.state.send_if_modified(|s| {
            let was_pending = s.error.is_pending();
            s.error.acknowledge();
            was_pending
        });
    }

    /// Consume a pending navigation request.
    pub fn take_navigation(&self) -> Option<SleepNight> {
        let mut taken = None;
        self.state.send_if_modified(|s| {
            taken = s.navigation.take();
            taken.is_some()
        });
        taken
    }

    /// Consume a pending snackbar request.
    pub fn take_snackbar(&self) -> Option<Snackbar> {
        let mut taken = None;
        self.state.send_if_modified(|s| {
            taken = s.snackbar.take();
            taken.is_some()
        });
        taken
    }

    /// Consume the last error message.
    pub fn take_error(&self) -> Option<String> {
        let mut taken = None;
        self.state.send_if_modified(|s| {
            taken = s.error.take();
            taken.is_some()
        });
        taken
    }

    /// Current snapshot of the screen.
    pub fn state(&self) -> SleepScreenState {
        let session = self.state.borrow().clone();
        SleepScreenState {
            tonight: session.tonight,
            nights: self.nights.borrow().clone(),
            snackbar: session.snackbar,
            navigation: session.navigation,
            error: session.error,
        }
    }

    /// History text for the current snapshot.
    pub fn formatted_history(&self) -> String {
        self.state().formatted_history(&self.display)
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription {
            session: self.state.subscribe(),
            nights: self.nights.clone(),
        }
    }

    /// Wait for every action launched so far to finish.
    pub async fn settled(&self) {
        self.scope.settled().await;
    }

    /// Tear the screen down: cancel in-flight work and stop publishing.
    pub fn close(&self) {
        debug!("closing sleep tracker screen");
        self.scope.close(&self.state);
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_closed()
    }
}

/// A view's handle on the tracker screen's state
pub struct StateSubscription {
    session: watch::Receiver<SessionState>,
    nights: watch::Receiver<Vec<SleepNight>>,
}

impl StateSubscription {
    /// Wait for the next change and return the new snapshot.
    ///
    /// Returns `None` once the controller or the store is gone.
    pub async fn changed(&mut self) -> Option<SleepScreenState> {
        tokio::select! {
            r = self.session.changed() => r.ok()?,
            r = self.nights.changed() => r.ok()?,
        }
        Some(self.snapshot())
    }

    /// Latest snapshot, marking it seen.
    pub fn snapshot(&mut self) -> SleepScreenState {
        let session = self.session.borrow_and_update().clone();
        SleepScreenState {
            tonight: session.tonight,
            nights: self.nights.borrow_and_update().clone(),
            snackbar: session.snackbar,
            navigation: session.navigation,
            error: session.error,
        }
    }
}
