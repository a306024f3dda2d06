//! Session-scoped cache of achievement metadata.
//!
//! The cache is filled once per session from the remote listing and read by
//! every progress report afterwards. A refresh builds the replacement map
//! without holding the lock and then swaps one `Arc` in, so a reader works on
//! exactly one generation of the listing.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::achievement::AchievementDescriptor;
use crate::progress::{ProgressAction, RoundingRule, decide_progress};

/// Immutable view of one cache generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    generation: u64,
    entries: HashMap<String, AchievementDescriptor>,
}

impl CacheSnapshot {
    /// Number of successful refreshes that led to this snapshot.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AchievementDescriptor> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &AchievementDescriptor> {
        self.entries.values()
    }
}

/// Thread-safe mapping from achievement id to descriptor.
#[derive(Debug, Default)]
pub struct AchievementCache {
    current: RwLock<Arc<CacheSnapshot>>,
    rounding: RoundingRule,
}

impl AchievementCache {
    #[must_use]
    pub fn new(rounding: RoundingRule) -> Self {
        Self {
            current: RwLock::new(Arc::default()),
            rounding,
        }
    }

    #[must_use]
    pub const fn rounding(&self) -> RoundingRule {
        self.rounding
    }

    /// Replace every entry with the given listing. Later duplicates win.
    pub fn refresh<I>(&self, listing: I)
    where
        I: IntoIterator<Item = AchievementDescriptor>,
    {
        let entries: HashMap<String, AchievementDescriptor> = listing
            .into_iter()
            .map(|descriptor| (descriptor.id.clone(), descriptor))
            .collect();
        let count = entries.len();

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let generation = guard.generation.saturating_add(1);
        *guard = Arc::new(CacheSnapshot {
            generation,
            entries,
        });
        drop(guard);

        log::debug!("Achievement cache refreshed: {count} entries (generation {generation})");
    }

    /// Drop every entry; used when the session ends.
    pub fn clear(&self) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let generation = guard.generation;
        *guard = Arc::new(CacheSnapshot {
            generation,
            entries: HashMap::new(),
        });
    }

    /// Current generation as a shared snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<AchievementDescriptor> {
        self.snapshot().get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.snapshot().generation()
    }

    /// Translate a percentage into the remote action for `id`.
    #[must_use]
    pub fn report_progress(&self, id: &str, percentage: f32, connected: bool) -> ProgressAction {
        let snapshot = self.snapshot();
        let action = decide_progress(snapshot.get(id), percentage, connected, self.rounding);
        match &action {
            ProgressAction::NoOp { reason } => {
                log::debug!(
                    "Achievement {id}: not reporting {percentage:.2}% ({})",
                    reason.label()
                );
            }
            ProgressAction::SetSteps { steps, .. } => {
                log::debug!("Incremental achievement {id}: setting progress to {steps}");
            }
            ProgressAction::Unlock { .. } => {
                log::debug!("Standard achievement {id}: unlocking");
            }
        }
        action
    }
}
