//! Remote game service seam.
//!
//! Platform layers implement [`AchievementService`] over whatever SDK they
//! bind. [`MemoryService`] is a deterministic implementation for tests and
//! the QA tester.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::achievement::AchievementDescriptor;
use crate::error::ServiceError;

/// Operations the bridge needs from a remote achievement/leaderboard service.
///
/// The write calls are fire-and-forget: their outcome is the service's concern.
#[async_trait]
pub trait AchievementService: Send + Sync {
    /// Fetch every achievement with its type and step total.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is down or the remote call fails.
    async fn list_achievements(
        &self,
        force_reload: bool,
    ) -> Result<Vec<AchievementDescriptor>, ServiceError>;

    fn is_connected(&self) -> bool;

    fn set_steps(&self, id: &str, steps: u32);

    fn unlock(&self, id: &str);

    fn submit_score(&self, leaderboard_id: &str, value: i64);
}

/// Outbound request recorded by [`MemoryService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ServiceCall {
    ListAchievements { force_reload: bool },
    SetSteps { id: String, steps: u32 },
    Unlock { id: String },
    SubmitScore { leaderboard_id: String, value: i64 },
}

#[derive(Debug, Default)]
struct MemoryState {
    connected: bool,
    listing: Vec<AchievementDescriptor>,
    listing_error: Option<ServiceError>,
    calls: Vec<ServiceCall>,
}

/// In-process service with a scripted listing and a call log.
#[derive(Debug, Default)]
pub struct MemoryService {
    state: Mutex<MemoryState>,
}

impl MemoryService {
    #[must_use]
    pub fn new(listing: Vec<AchievementDescriptor>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                listing,
                ..MemoryState::default()
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn set_connected(&self, connected: bool) {
        self.with_state(|state| state.connected = connected);
    }

    pub fn set_listing(&self, listing: Vec<AchievementDescriptor>) {
        self.with_state(|state| state.listing = listing);
    }

    /// Make the next listing calls fail until cleared with `None`.
    pub fn fail_listing(&self, error: Option<ServiceError>) {
        self.with_state(|state| state.listing_error = error);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.with_state(|state| state.calls.clone())
    }

    /// Calls other than listings, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<ServiceCall> {
        self.with_state(|state| {
            state
                .calls
                .iter()
                .filter(|call| !matches!(call, ServiceCall::ListAchievements { .. }))
                .cloned()
                .collect()
        })
    }

    pub fn clear_calls(&self) {
        self.with_state(|state| state.calls.clear());
    }
}

#[async_trait]
impl AchievementService for MemoryService {
    async fn list_achievements(
        &self,
        force_reload: bool,
    ) -> Result<Vec<AchievementDescriptor>, ServiceError> {
        self.with_state(|state| {
            state
                .calls
                .push(ServiceCall::ListAchievements { force_reload });
            if !state.connected {
                return Err(ServiceError::NotConnected);
            }
            if let Some(err) = &state.listing_error {
                return Err(err.clone());
            }
            Ok(state.listing.clone())
        })
    }

    fn is_connected(&self) -> bool {
        self.with_state(|state| state.connected)
    }

    fn set_steps(&self, id: &str, steps: u32) {
        self.with_state(|state| {
            state.calls.push(ServiceCall::SetSteps {
                id: id.to_string(),
                steps,
            });
        });
    }

    fn unlock(&self, id: &str) {
        self.with_state(|state| state.calls.push(ServiceCall::Unlock { id: id.to_string() }));
    }

    fn submit_score(&self, leaderboard_id: &str, value: i64) {
        self.with_state(|state| {
            state.calls.push(ServiceCall::SubmitScore {
                leaderboard_id: leaderboard_id.to_string(),
                value,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_requires_connection() {
        let service = MemoryService::new(vec![AchievementDescriptor::standard("A")]);
        assert_eq!(
            service.list_achievements(false).await,
            Err(ServiceError::NotConnected)
        );
        service.set_connected(true);
        let listing = service.list_achievements(true).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(
            service.calls().last(),
            Some(&ServiceCall::ListAchievements { force_reload: true })
        );
    }

    #[tokio::test]
    async fn injected_failure_is_returned() {
        let service = MemoryService::default();
        service.set_connected(true);
        service.fail_listing(Some(ServiceError::ListingFailed("timeout".into())));
        let err = service.list_achievements(false).await.unwrap_err();
        assert_eq!(err.to_string(), "achievement listing failed: timeout");
    }

    #[test]
    fn writes_skip_listing_calls() {
        let service = MemoryService::default();
        service.unlock("A");
        service.set_steps("B", 2);
        service.submit_score("board", 99);
        assert_eq!(service.writes().len(), 3);
        service.clear_calls();
        assert!(service.calls().is_empty());
    }
}
