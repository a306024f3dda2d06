//! GameBridge Core
//!
//! Platform-agnostic game services plumbing for native game engines.
//! This crate converts percentage-based achievement progress into the step and
//! unlock calls a remote achievement service expects, caches achievement
//! metadata per session, and tracks the service connection. It binds no SDK;
//! platform layers implement [`AchievementService`].

pub mod achievement;
pub mod cache;
pub mod config;
pub mod error;
pub mod progress;
pub mod service;
pub mod session;

// Re-export commonly used types
pub use achievement::{AchievementDescriptor, AchievementKind};
pub use cache::{AchievementCache, CacheSnapshot};
pub use config::BridgeConfig;
pub use error::{ConfigError, ServiceError};
pub use progress::{
    ProgressAction, RoundingRule, SkipReason, UNLOCK_THRESHOLD, clamp_percentage, decide_progress,
    steps_for_percentage,
};
pub use service::{AchievementService, MemoryService, ServiceCall};
pub use session::{
    ConnectOutcome, ConnectionFailure, ConnectionState, ConnectionTracker, FailureResolution,
    GameServicesSession, ServiceAvailability,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<AchievementDescriptor> {
        vec![
            AchievementDescriptor::standard("ach_finish"),
            AchievementDescriptor::incremental("ach_miles", 20),
        ]
    }

    #[tokio::test]
    async fn session_loads_and_reports() {
        let service = MemoryService::new(listing());
        service.set_connected(true);
        let mut session = GameServicesSession::new(BridgeConfig::default(), service);
        assert_eq!(
            session.connect(ServiceAvailability::Available),
            ConnectOutcome::Started
        );
        assert_eq!(session.on_connected().await.unwrap(), 2);

        let action = session.report_achievement_progress("ach_miles", 50.0);
        assert_eq!(
            action,
            ProgressAction::SetSteps {
                id: "ach_miles".into(),
                steps: 10
            }
        );
        assert!(session.write_leaderboard_value("board_distance", 1200));

        let writes = session.service().writes();
        assert_eq!(
            writes,
            vec![
                ServiceCall::SetSteps {
                    id: "ach_miles".into(),
                    steps: 10
                },
                ServiceCall::SubmitScore {
                    leaderboard_id: "board_distance".into(),
                    value: 1200
                },
            ]
        );
    }

    #[tokio::test]
    async fn ending_session_discards_cache() {
        let service = MemoryService::new(listing());
        service.set_connected(true);
        let mut session = GameServicesSession::new(BridgeConfig::default(), service);
        session.on_connected().await.unwrap();
        let cache = session.cache();
        assert_eq!(cache.len(), 2);
        session.end();
        assert!(cache.is_empty());
        assert_eq!(session.tracker().state(), ConnectionState::Disconnected);
    }
}
