//! Lifecycle state for database-backed components.
//!
//! A database component's canonical state lives in a relational store, so
//! every instance tracks how it diverges from that store. The transitions
//! are fixed:
//!
//! - new objects start [`DbState::Inserted`],
//! - loading from the backing store sets [`DbState::Unchanged`],
//! - mutation after load sets [`DbState::Updated`],
//! - delete on an unchanged/updated object sets [`DbState::Deleted`],
//! - delete on an inserted object sets [`DbState::Discarded`] — the row
//!   never existed, so nothing is ever emitted for it.

use serde::Serialize;

/// Divergence of an instance from its backing-store row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DbState {
    /// In sync with the store.
    Unchanged,
    /// Mutated since load; needs an UPDATE.
    Updated,
    /// Marked for removal; needs a DELETE.
    Deleted,
    /// Never persisted; needs an INSERT.
    Inserted,
    /// Created and then deleted before ever being persisted.
    Discarded,
}

impl DbState {
    /// State after a field mutation.
    pub fn on_modify(self) -> Self {
        match self {
            Self::Unchanged => Self::Updated,
            other => other,
        }
    }

    /// State after a delete request.
    pub fn on_delete(self) -> Self {
        match self {
            Self::Inserted => Self::Discarded,
            Self::Unchanged | Self::Updated => Self::Deleted,
            other => other,
        }
    }

    /// Action type emitted for this state, if any.
    pub fn action_type(self) -> Option<&'static str> {
        match self {
            Self::Inserted => Some("INSERT"),
            Self::Updated => Some("UPDATE"),
            Self::Deleted => Some("DELETE"),
            Self::Unchanged | Self::Discarded => None,
        }
    }
}

impl std::fmt::Display for DbState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unchanged => "UNCHANGED",
            Self::Updated => "UPDATED",
            Self::Deleted => "DELETED",
            Self::Inserted => "INSERTED",
            Self::Discarded => "DISCARDED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_only_moves_unchanged() {
        assert_eq!(DbState::Unchanged.on_modify(), DbState::Updated);
        assert_eq!(DbState::Updated.on_modify(), DbState::Updated);
        assert_eq!(DbState::Inserted.on_modify(), DbState::Inserted);
        assert_eq!(DbState::Deleted.on_modify(), DbState::Deleted);
        assert_eq!(DbState::Discarded.on_modify(), DbState::Discarded);
    }

    #[test]
    fn delete_discards_unpersisted_objects() {
        assert_eq!(DbState::Inserted.on_delete(), DbState::Discarded);
        assert_eq!(DbState::Unchanged.on_delete(), DbState::Deleted);
        assert_eq!(DbState::Updated.on_delete(), DbState::Deleted);
        assert_eq!(DbState::Deleted.on_delete(), DbState::Deleted);
        assert_eq!(DbState::Discarded.on_delete(), DbState::Discarded);
    }

    #[test]
    fn only_changed_states_emit_actions() {
        assert_eq!(DbState::Inserted.action_type(), Some("INSERT"));
        assert_eq!(DbState::Updated.action_type(), Some("UPDATE"));
        assert_eq!(DbState::Deleted.action_type(), Some("DELETE"));
        assert_eq!(DbState::Unchanged.action_type(), None);
        assert_eq!(DbState::Discarded.action_type(), None);
    }
}
