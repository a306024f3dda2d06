use anyhow::{Result, ensure};
use gamebridge_core::{
    AchievementDescriptor, ConnectOutcome, ConnectionFailure, ConnectionState, FailureResolution,
    GameServicesSession, MemoryService, ProgressAction, ServiceAvailability, ServiceCall,
    SkipReason,
};

pub type BridgeSession = GameServicesSession<MemoryService>;

/// Achievement listing every scenario starts from.
#[must_use]
pub fn fixture_listing() -> Vec<AchievementDescriptor> {
    vec![
        AchievementDescriptor::standard("ach_first_win"),
        AchievementDescriptor::standard("ach_secret_room"),
        AchievementDescriptor::incremental("ach_collect_coins", 10),
        AchievementDescriptor::incremental("ach_marathon", 42),
    ]
}

#[async_trait::async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn run(&self, session: &mut BridgeSession) -> Result<()>;
}

async fn connect_and_load(session: &mut BridgeSession) -> Result<usize> {
    let outcome = session.connect(ServiceAvailability::Available);
    ensure!(
        outcome == ConnectOutcome::Started,
        "connect should start, got {outcome:?}"
    );
    session.service().set_connected(true);
    Ok(session.on_connected().await?)
}

fn expect_action(actual: &ProgressAction, expected: &ProgressAction) -> Result<()> {
    ensure!(actual == expected, "expected {expected:?}, got {actual:?}");
    Ok(())
}

pub struct SmokeScenario;

#[async_trait::async_trait]
impl Scenario for SmokeScenario {
    fn name(&self) -> &'static str {
        "smoke"
    }

    fn description(&self) -> &'static str {
        "Connect, load the listing, unlock a standard achievement"
    }

    async fn run(&self, session: &mut BridgeSession) -> Result<()> {
        let loaded = connect_and_load(session).await?;
        ensure!(loaded == fixture_listing().len(), "loaded {loaded} entries");

        let partial = session.report_achievement_progress("ach_first_win", 50.0);
        expect_action(
            &partial,
            &ProgressAction::no_op(SkipReason::BelowUnlockThreshold),
        )?;
        let unlock = session.report_achievement_progress("ach_first_win", 100.0);
        expect_action(
            &unlock,
            &ProgressAction::Unlock {
                id: "ach_first_win".into(),
            },
        )?;
        ensure!(
            session.write_leaderboard_value("board_high_score", 31_337),
            "leaderboard write should go through while connected"
        );
        Ok(())
    }
}

pub struct IncrementalScenario;

#[async_trait::async_trait]
impl Scenario for IncrementalScenario {
    fn name(&self) -> &'static str {
        "incremental"
    }

    fn description(&self) -> &'static str {
        "Percentages convert to step counts for incremental achievements"
    }

    async fn run(&self, session: &mut BridgeSession) -> Result<()> {
        connect_and_load(session).await?;
        let rounding_tie = match session.config().rounding {
            gamebridge_core::RoundingRule::HalfUp => 3,
            gamebridge_core::RoundingRule::HalfEven => 2,
        };
        let cases = [
            ("ach_collect_coins", 25.0, Some(rounding_tie)),
            ("ach_collect_coins", 0.0, None),
            ("ach_collect_coins", 100.0, Some(10)),
            ("ach_marathon", 50.0, Some(21)),
        ];
        for (id, pct, expected) in cases {
            let action = session.report_achievement_progress(id, pct);
            let want = expected.map_or(ProgressAction::no_op(SkipReason::ZeroSteps), |steps| {
                ProgressAction::SetSteps {
                    id: id.to_string(),
                    steps,
                }
            });
            expect_action(&action, &want)?;
        }
        Ok(())
    }
}

pub struct ReconnectScenario;

#[async_trait::async_trait]
impl Scenario for ReconnectScenario {
    fn name(&self) -> &'static str {
        "reconnect"
    }

    fn description(&self) -> &'static str {
        "Connection failure is resolved once and the session reconnects on restart"
    }

    async fn run(&self, session: &mut BridgeSession) -> Result<()> {
        session.connect(ServiceAvailability::Available);
        let failure = ConnectionFailure {
            error_code: 4,
            has_resolution: true,
        };
        ensure!(session.on_connection_failed(failure) == FailureResolution::StartResolution);
        ensure!(session.on_connection_failed(failure) == FailureResolution::AlreadyResolving);
        ensure!(
            session.on_resolution_result(true),
            "resolution success should request a reconnect"
        );
        session.service().set_connected(true);
        session.on_connected().await?;

        session.on_stop();
        session.service().set_connected(false);
        ensure!(session.tracker().state() == ConnectionState::Disconnected);
        ensure!(session.on_start(), "restart should reconnect");
        session.service().set_connected(true);
        session.on_connected().await?;
        ensure!(session.tracker().state() == ConnectionState::Connected);
        Ok(())
    }
}

pub struct RefreshScenario;

#[async_trait::async_trait]
impl Scenario for RefreshScenario {
    fn name(&self) -> &'static str {
        "refresh"
    }

    fn description(&self) -> &'static str {
        "A second listing fully replaces the first"
    }

    async fn run(&self, session: &mut BridgeSession) -> Result<()> {
        connect_and_load(session).await?;
        session
            .service()
            .set_listing(vec![AchievementDescriptor::incremental("ach_new_season", 4)]);
        let loaded = session.load_achievements().await?;
        ensure!(loaded == 1, "second listing loaded {loaded} entries");

        let stale = session.report_achievement_progress("ach_first_win", 100.0);
        expect_action(
            &stale,
            &ProgressAction::no_op(SkipReason::UnknownAchievement),
        )?;
        let fresh = session.report_achievement_progress("ach_new_season", 50.0);
        expect_action(
            &fresh,
            &ProgressAction::SetSteps {
                id: "ach_new_season".into(),
                steps: 2,
            },
        )
    }
}

pub struct OfflineScenario;

#[async_trait::async_trait]
impl Scenario for OfflineScenario {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn description(&self) -> &'static str {
        "Reports made while disconnected reach no service"
    }

    async fn run(&self, session: &mut BridgeSession) -> Result<()> {
        connect_and_load(session).await?;
        session.on_connection_suspended();
        session.service().set_connected(false);
        session.service().clear_calls();

        let action = session.report_achievement_progress("ach_secret_room", 100.0);
        expect_action(&action, &ProgressAction::no_op(SkipReason::NotConnected))?;
        ensure!(!session.write_leaderboard_value("board_high_score", 1));
        let calls: Vec<ServiceCall> = session.service().calls();
        ensure!(calls.is_empty(), "unexpected service calls: {calls:?}");
        Ok(())
    }
}

/// Every built-in scenario, in run order.
#[must_use]
pub fn catalog() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(SmokeScenario),
        Box::new(IncrementalScenario),
        Box::new(ReconnectScenario),
        Box::new(RefreshScenario),
        Box::new(OfflineScenario),
    ]
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<Box<dyn Scenario>> {
    catalog().into_iter().find(|s| s.name() == name)
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog()
        .iter()
        .map(|s| (s.name(), s.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = list_scenarios().into_iter().map(|(n, _)| n).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn lookup_by_name() {
        assert!(get_scenario("refresh").is_some());
        assert!(get_scenario("nope").is_none());
    }
}
