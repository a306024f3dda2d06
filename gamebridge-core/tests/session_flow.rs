use gamebridge_core::{
    AchievementDescriptor, BridgeConfig, ConnectOutcome, ConnectionFailure, ConnectionState,
    FailureResolution, GameServicesSession, MemoryService, ProgressAction, ServiceAvailability,
    ServiceCall, ServiceError, SkipReason,
};

fn connected_service() -> MemoryService {
    let service = MemoryService::new(vec![
        AchievementDescriptor::standard("ach_boss"),
        AchievementDescriptor::incremental("ach_coins", 50),
    ]);
    service.set_connected(true);
    service
}

#[tokio::test]
async fn failed_listing_keeps_previous_cache() {
    let mut session = GameServicesSession::new(BridgeConfig::default(), connected_service());
    session.on_connected().await.unwrap();

    session
        .service()
        .fail_listing(Some(ServiceError::ListingFailed("quota".into())));
    let err = session.load_achievements().await.unwrap_err();
    assert_eq!(err, ServiceError::ListingFailed("quota".into()));

    let cache = session.cache();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.generation(), 1);
    assert_eq!(
        session.report_achievement_progress("ach_boss", 100.0),
        ProgressAction::Unlock {
            id: "ach_boss".into()
        }
    );
}

#[tokio::test]
async fn reports_while_disconnected_send_nothing() {
    let mut session = GameServicesSession::new(BridgeConfig::default(), connected_service());
    session.on_connected().await.unwrap();
    session.service().set_connected(false);
    session.service().clear_calls();

    assert_eq!(
        session.report_achievement_progress("ach_coins", 40.0),
        ProgressAction::no_op(SkipReason::NotConnected)
    );
    assert!(!session.write_leaderboard_value("board", 10));
    assert!(session.service().calls().is_empty());
}

#[tokio::test]
async fn force_reload_flag_reaches_service() {
    let config = BridgeConfig {
        force_reload_on_connect: true,
        ..BridgeConfig::default()
    };
    let mut session = GameServicesSession::new(config, connected_service());
    session.on_connected().await.unwrap();
    assert_eq!(
        session.service().calls(),
        vec![ServiceCall::ListAchievements { force_reload: true }]
    );
}

#[tokio::test]
async fn listing_reload_picks_up_new_metadata() {
    let mut session = GameServicesSession::new(BridgeConfig::default(), connected_service());
    session.on_connected().await.unwrap();
    session
        .service()
        .set_listing(vec![AchievementDescriptor::incremental("ach_boss", 4)]);
    assert_eq!(session.load_achievements().await.unwrap(), 1);

    assert_eq!(
        session.report_achievement_progress("ach_coins", 100.0),
        ProgressAction::no_op(SkipReason::UnknownAchievement)
    );
    assert_eq!(
        session.report_achievement_progress("ach_boss", 75.0),
        ProgressAction::SetSteps {
            id: "ach_boss".into(),
            steps: 3
        }
    );
}

#[test]
fn disabled_services_never_connect() {
    let config = BridgeConfig::default().with_services_enabled(false);
    let mut session = GameServicesSession::new(config, MemoryService::default());
    assert_eq!(
        session.connect(ServiceAvailability::Available),
        ConnectOutcome::Disabled
    );
    assert_eq!(session.tracker().state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn resolution_round_trip_then_restart() {
    let mut session = GameServicesSession::new(BridgeConfig::default(), connected_service());
    assert_eq!(
        session.connect(ServiceAvailability::Available),
        ConnectOutcome::Started
    );
    let failure = ConnectionFailure {
        error_code: 4,
        has_resolution: true,
    };
    assert_eq!(
        session.on_connection_failed(failure),
        FailureResolution::StartResolution
    );
    assert_eq!(
        session.on_connection_failed(failure),
        FailureResolution::AlreadyResolving
    );
    assert!(session.on_resolution_result(true));
    session.on_connected().await.unwrap();

    session.on_stop();
    assert!(session.on_start());
    assert_eq!(session.tracker().state(), ConnectionState::Connecting);
}
