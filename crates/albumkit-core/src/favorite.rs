// ── Optimistic favorite toggles ──
//
// A toggle flips the flag locally before the request goes out, then
// either confirms or rolls back once the server answers. The stores own
// the flag itself; this module only tracks where each toggle stands.

use std::collections::HashMap;

use tracing::warn;

use crate::model::EntityId;

/// Lifecycle of a single toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ToggleState {
    /// Nothing happened (entity was not in the store).
    #[default]
    Idle,
    /// Local flag flipped, request outstanding.
    Optimistic,
    /// Server accepted the change.
    Confirmed,
    /// Server rejected the change and the local flag was restored.
    RolledBack,
}

/// Handle for one in-progress toggle, returned by a store's
/// `begin_favorite_toggle` and handed back to `finish_favorite_toggle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteToggle {
    id: EntityId,
    previous: bool,
    state: ToggleState,
}

impl FavoriteToggle {
    pub(crate) fn optimistic(id: EntityId, previous: bool) -> Self {
        Self {
            id,
            previous,
            state: ToggleState::Optimistic,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Flag value before the toggle.
    pub fn previous(&self) -> bool {
        self.previous
    }

    /// Flag value the server is asked to store.
    pub fn target(&self) -> bool {
        !self.previous
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub(crate) fn confirm(&mut self) {
        self.state = ToggleState::Confirmed;
    }

    pub(crate) fn roll_back(&mut self) {
        self.state = ToggleState::RolledBack;
    }
}

/// Counts outstanding toggles per id.
///
/// Overlapping toggles on the same id are allowed (last write wins);
/// they are only logged.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    counts: HashMap<EntityId, usize>,
}

impl InFlight {
    pub(crate) fn enter(&mut self, kind: &str, id: &EntityId) {
        let count = self.counts.entry(id.clone()).or_default();
        if *count > 0 {
            warn!(
                kind,
                id = %id,
                outstanding = *count,
                "overlapping favorite toggle, last response wins"
            );
        }
        *count += 1;
    }

    pub(crate) fn leave(&mut self, id: &EntityId) {
        if let Some(count) = self.counts.get_mut(id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn outstanding(&self, id: &EntityId) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_targets_the_opposite() {
        let mut toggle = FavoriteToggle::optimistic(EntityId::from(1), false);
        assert!(toggle.target());
        assert_eq!(toggle.state(), ToggleState::Optimistic);
        toggle.roll_back();
        assert_eq!(toggle.state(), ToggleState::RolledBack);
    }

    #[test]
    fn in_flight_counts_overlaps() {
        let id = EntityId::from(7);
        let mut in_flight = InFlight::default();
        in_flight.enter("album", &id);
        in_flight.enter("album", &id);
        assert_eq!(in_flight.outstanding(&id), 2);
        in_flight.leave(&id);
        in_flight.leave(&id);
        in_flight.leave(&id);
        assert_eq!(in_flight.outstanding(&id), 0);
    }
}
