//! Percentage-to-progress conversion.
//!
//! Game code reports achievement progress as a percentage in `0..=100`. Remote
//! services want either a step count (incremental achievements) or an unlock
//! (standard achievements). [`decide_progress`] performs that mapping without
//! touching any service.

use serde::{Deserialize, Serialize};

use crate::achievement::{AchievementDescriptor, AchievementKind};

/// Percentage at or above which a standard achievement unlocks.
pub const UNLOCK_THRESHOLD: f32 = 100.0;

/// Tie-breaking rule used when a percentage lands exactly between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// 2.5 steps becomes 3.
    #[default]
    HalfUp,
    /// 2.5 steps becomes 2, 3.5 becomes 4.
    HalfEven,
}

impl RoundingRule {
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            // Inputs are clamped non-negative, so away-from-zero is half-up.
            Self::HalfUp => value.round(),
            Self::HalfEven => value.round_ties_even(),
        }
    }
}

/// Why a progress report produced no remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownAchievement,
    NotConnected,
    ZeroSteps,
    BelowUnlockThreshold,
}

impl SkipReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnknownAchievement => "unknown achievement",
            Self::NotConnected => "not connected",
            Self::ZeroSteps => "rounds to zero steps",
            Self::BelowUnlockThreshold => "below unlock threshold",
        }
    }
}

/// What the caller should do against the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProgressAction {
    NoOp { reason: SkipReason },
    SetSteps { id: String, steps: u32 },
    Unlock { id: String },
}

impl ProgressAction {
    #[must_use]
    pub const fn no_op(reason: SkipReason) -> Self {
        Self::NoOp { reason }
    }

    #[must_use]
    pub const fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOp { .. })
    }

    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::NoOp { reason } => Some(*reason),
            _ => None,
        }
    }
}

/// Clamp a reported percentage into `0..=100`; NaN counts as no progress.
#[must_use]
pub fn clamp_percentage(percentage: f32) -> f32 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}

/// Convert a percentage into a whole number of steps out of `max_steps`.
#[must_use]
pub fn steps_for_percentage(percentage: f32, max_steps: u32, rounding: RoundingRule) -> u32 {
    // Multiply before dividing so exact ties (25% of 10) stay exact.
    let scaled = f64::from(clamp_percentage(percentage)) * f64::from(max_steps) / 100.0;
    let steps = rounding.apply(scaled);
    // Bounded by max_steps after clamping.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = steps as u32;
    steps.min(max_steps)
}

/// Map a percentage onto the action the remote service expects.
///
/// Unknown ids are checked before the connection so an unknown achievement
/// reports [`SkipReason::UnknownAchievement`] whether or not a session is up.
#[must_use]
pub fn decide_progress(
    descriptor: Option<&AchievementDescriptor>,
    percentage: f32,
    connected: bool,
    rounding: RoundingRule,
) -> ProgressAction {
    let Some(descriptor) = descriptor else {
        return ProgressAction::no_op(SkipReason::UnknownAchievement);
    };
    if !connected {
        return ProgressAction::no_op(SkipReason::NotConnected);
    }

    match descriptor.kind {
        AchievementKind::Incremental => {
            let steps =
                steps_for_percentage(percentage, descriptor.effective_max_steps(), rounding);
            if steps > 0 {
                ProgressAction::SetSteps {
                    id: descriptor.id.clone(),
                    steps,
                }
            } else {
                ProgressAction::no_op(SkipReason::ZeroSteps)
            }
        }
        AchievementKind::Standard => {
            if !percentage.is_nan() && percentage >= UNLOCK_THRESHOLD {
                ProgressAction::Unlock {
                    id: descriptor.id.clone(),
                }
            } else {
                ProgressAction::no_op(SkipReason::BelowUnlockThreshold)
            }
        }
    }
}
