pub mod reports;
pub mod scenarios;
pub mod tester;

pub use scenarios::{Scenario, catalog, get_scenario, list_scenarios};
pub use tester::*;
