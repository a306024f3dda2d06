//! Game services session: connection bookkeeping plus the achievement cache.
//!
//! A [`GameServicesSession`] is created by the game when it boots the platform
//! layer and dropped (or [`ended`](GameServicesSession::end)) with it. The host
//! platform forwards its connection callbacks here; game logic reports
//! progress and scores through it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::achievement::AchievementDescriptor;
use crate::cache::AchievementCache;
use crate::config::BridgeConfig;
use crate::error::ServiceError;
use crate::progress::ProgressAction;
use crate::service::AchievementService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Suspended,
}

/// Platform report on whether the game service can be reached on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAvailability {
    Available,
    /// Installed but outdated; connecting prompts the update flow.
    UpdateRequired,
    Missing,
    Disabled,
    Invalid,
}

impl ServiceAvailability {
    #[must_use]
    pub const fn allows_connect(self) -> bool {
        matches!(self, Self::Available | Self::UpdateRequired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectOutcome {
    Started,
    AlreadyActive,
    Disabled,
    Unavailable,
}

/// A failed connection attempt as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionFailure {
    pub error_code: i32,
    pub has_resolution: bool,
}

/// What the platform layer should do about a failed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum FailureResolution {
    AlreadyResolving,
    StartResolution,
    ShowErrorDialog { error_code: i32 },
}

/// Connection state machine and error-resolution flags.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    state: ConnectionState,
    has_connected_before: bool,
    resolving_error: bool,
    last_error_code: Option<i32>,
}

impl ConnectionTracker {
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub const fn has_connected_before(&self) -> bool {
        self.has_connected_before
    }

    #[must_use]
    pub const fn is_resolving_error(&self) -> bool {
        self.resolving_error
    }

    #[must_use]
    pub const fn last_error_code(&self) -> Option<i32> {
        self.last_error_code
    }

    fn is_active(&self) -> bool {
        matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        )
    }

    pub fn connect(&mut self, enabled: bool, availability: ServiceAvailability) -> ConnectOutcome {
        if !enabled {
            return ConnectOutcome::Disabled;
        }
        if !availability.allows_connect() {
            log::debug!("Game services unavailable on this device ({availability:?})");
            return ConnectOutcome::Unavailable;
        }
        if self.is_active() {
            return ConnectOutcome::AlreadyActive;
        }
        self.state = ConnectionState::Connecting;
        ConnectOutcome::Started
    }

    pub fn on_connected(&mut self) {
        log::debug!("Connected to game services");
        self.state = ConnectionState::Connected;
        self.has_connected_before = true;
    }

    pub fn on_connection_suspended(&mut self) {
        log::debug!("Game services connection suspended");
        self.state = ConnectionState::Suspended;
    }

    pub fn on_connection_failed(&mut self, failure: ConnectionFailure) -> FailureResolution {
        log::debug!(
            "Game services connection failed with code {}",
            failure.error_code
        );
        self.state = ConnectionState::Disconnected;
        if self.resolving_error {
            return FailureResolution::AlreadyResolving;
        }
        self.resolving_error = true;
        if failure.has_resolution {
            log::debug!("Starting game services connection resolution");
            FailureResolution::StartResolution
        } else {
            self.last_error_code = Some(failure.error_code);
            FailureResolution::ShowErrorDialog {
                error_code: failure.error_code,
            }
        }
    }

    /// The resolution flow could not be launched; retry the connection directly.
    pub fn on_resolution_failed_to_launch(&mut self) {
        self.resolving_error = false;
        self.state = ConnectionState::Connecting;
    }

    /// Returns `true` when the caller must start a new connection attempt.
    pub fn on_resolution_result(&mut self, succeeded: bool) -> bool {
        log::debug!("Game services connection resolution finished (succeeded: {succeeded})");
        self.resolving_error = false;
        if succeeded && !self.is_active() {
            self.state = ConnectionState::Connecting;
            return true;
        }
        false
    }

    /// Returns `true` when the caller must reconnect after a host restart.
    pub fn on_start(&mut self, reconnect_on_start: bool) -> bool {
        if reconnect_on_start && self.has_connected_before && !self.is_active() {
            self.state = ConnectionState::Connecting;
            return true;
        }
        false
    }

    pub fn on_stop(&mut self) {
        self.state = ConnectionState::Disconnected;
    }
}

/// Explicitly owned game services session.
pub struct GameServicesSession<S: AchievementService> {
    config: BridgeConfig,
    service: S,
    cache: Arc<AchievementCache>,
    tracker: ConnectionTracker,
}

impl<S: AchievementService> GameServicesSession<S> {
    #[must_use]
    pub fn new(config: BridgeConfig, service: S) -> Self {
        let cache = Arc::new(AchievementCache::new(config.rounding));
        Self {
            config,
            service,
            cache,
            tracker: ConnectionTracker::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Shared handle to the cache for game threads that only read it.
    #[must_use]
    pub fn cache(&self) -> Arc<AchievementCache> {
        Arc::clone(&self.cache)
    }

    #[must_use]
    pub const fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.service.is_connected()
    }

    pub fn connect(&mut self, availability: ServiceAvailability) -> ConnectOutcome {
        self.tracker
            .connect(self.config.services_enabled, availability)
    }

    /// Mark the session connected and load the achievement listing.
    ///
    /// # Errors
    ///
    /// Returns the listing error; the connection itself stays up.
    pub async fn on_connected(&mut self) -> Result<usize, ServiceError> {
        self.tracker.on_connected();
        self.load_achievements().await
    }

    /// Fetch the listing and refresh the cache, returning the entry count.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cache keeps its previous contents.
    pub async fn load_achievements(&self) -> Result<usize, ServiceError> {
        match self
            .service
            .list_achievements(self.config.force_reload_on_connect)
            .await
        {
            Ok(listing) => {
                let count = listing.len();
                self.on_achievements_loaded(listing);
                Ok(count)
            }
            Err(err) => {
                log::warn!("Loading achievements failed: {err}");
                Err(err)
            }
        }
    }

    pub fn on_achievements_loaded(&self, listing: Vec<AchievementDescriptor>) {
        self.cache.refresh(listing);
    }

    /// Decide the action for a percentage report and send it to the service.
    pub fn report_achievement_progress(&self, id: &str, percentage: f32) -> ProgressAction {
        let action = self
            .cache
            .report_progress(id, percentage, self.service.is_connected());
        match &action {
            ProgressAction::SetSteps { id, steps } => self.service.set_steps(id, *steps),
            ProgressAction::Unlock { id } => self.service.unlock(id),
            ProgressAction::NoOp { .. } => {}
        }
        action
    }

    /// Submit a leaderboard score. Returns `false` when not connected.
    pub fn write_leaderboard_value(&self, leaderboard_id: &str, value: i64) -> bool {
        if !self.service.is_connected() {
            log::debug!("Not connected, dropping score {value} for leaderboard {leaderboard_id}");
            return false;
        }
        self.service.submit_score(leaderboard_id, value);
        true
    }

    pub fn on_connection_suspended(&mut self) {
        self.tracker.on_connection_suspended();
    }

    pub fn on_connection_failed(&mut self, failure: ConnectionFailure) -> FailureResolution {
        self.tracker.on_connection_failed(failure)
    }

    pub fn on_resolution_failed_to_launch(&mut self) {
        self.tracker.on_resolution_failed_to_launch();
    }

    pub fn on_resolution_result(&mut self, succeeded: bool) -> bool {
        self.tracker.on_resolution_result(succeeded)
    }

    pub fn on_start(&mut self) -> bool {
        self.tracker.on_start(self.config.reconnect_on_start)
    }

    pub fn on_stop(&mut self) {
        self.tracker.on_stop();
    }

    /// Disconnect and discard cached metadata.
    pub fn end(&mut self) {
        self.tracker.on_stop();
        self.cache.clear();
    }

    #[must_use]
    pub fn into_service(self) -> S {
        self.service
    }
}
