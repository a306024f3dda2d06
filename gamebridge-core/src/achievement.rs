use serde::{Deserialize, Serialize};

/// How a remote achievement tracks completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    /// Binary locked/unlocked achievement.
    Standard,
    /// Achievement tracked by a step counter up to a fixed maximum.
    Incremental,
}

/// Minimum metadata needed to convert a percentage into remote progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDescriptor {
    pub id: String,
    pub kind: AchievementKind,
    #[serde(default = "AchievementDescriptor::default_max_steps")]
    pub max_steps: u32,
}

impl AchievementDescriptor {
    const fn default_max_steps() -> u32 {
        1
    }

    /// Describe a standard (binary) achievement.
    #[must_use]
    pub fn standard(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AchievementKind::Standard,
            max_steps: Self::default_max_steps(),
        }
    }

    /// Describe an incremental achievement. A step total of zero is clamped to one.
    #[must_use]
    pub fn incremental(id: impl Into<String>, max_steps: u32) -> Self {
        Self {
            id: id.into(),
            kind: AchievementKind::Incremental,
            max_steps: max_steps.max(1),
        }
    }

    /// Step total used for conversion; standard achievements always report one.
    #[must_use]
    pub const fn effective_max_steps(&self) -> u32 {
        match self.kind {
            AchievementKind::Standard => 1,
            AchievementKind::Incremental => {
                if self.max_steps == 0 {
                    1
                } else {
                    self.max_steps
                }
            }
        }
    }

    #[must_use]
    pub const fn is_incremental(&self) -> bool {
        matches!(self.kind, AchievementKind::Incremental)
    }
}
