//! Session configuration.

use serde::{Deserialize, Serialize};

/// What saving a document does to its workflow status.
///
/// Upstream annotation tools disagree here: some bundle a transition to
/// `completed` into the save action, others keep status a separate
/// toggle. Both behaviors are preserved as configuration; `KeepStatus`
/// is the default and status changes go through `Session::set_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveBehavior {
    /// Save persists annotations only; status is untouched.
    #[default]
    KeepStatus,
    /// Save also marks the document completed.
    MarkCompleted,
}

/// Configuration for an editing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Status handling on save.
    #[serde(default)]
    pub save_behavior: SaveBehavior,
}
