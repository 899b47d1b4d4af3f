//! Keyboard-level commands over the store.
//!
//! The hosting UI maps key chords to these commands and runs them through
//! `dispatch`; the engine stays input-device agnostic. Commit is async, so
//! dispatch hands it back to the host instead of running it here.

use crate::store::ClassificationStore;

/// Commands a closing screen binds to key chords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Select every currently-pending concept.
    SelectAllPending,
    /// Drop the selection.
    ClearSelection,
    /// Start a commit round-trip.
    Commit,
}

impl Command {
    /// Whether the command would do anything right now. Hosts use this to
    /// gray out menu entries.
    pub fn is_enabled(&self, store: &ClassificationStore) -> bool {
        match self {
            Self::SelectAllPending => !store.pending_keys().is_empty(),
            Self::ClearSelection => !store.selection().is_empty(),
            Self::Commit => store.has_pending_changes() && !store.commit_in_flight(),
        }
    }
}

/// What `dispatch` did, or wants the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The command ran synchronously.
    Done,
    /// The host must drive `store.commit(gateway)` on its executor.
    StartCommit,
    /// The command was disabled; nothing happened.
    Disabled,
}

/// Run a command against the store.
pub fn dispatch(store: &mut ClassificationStore, command: Command) -> Dispatch {
    if !command.is_enabled(store) {
        return Dispatch::Disabled;
    }
    match command {
        Command::SelectAllPending => {
            store.select_all_pending();
            Dispatch::Done
        }
        Command::ClearSelection => {
            store.clear_selection();
            Dispatch::Done
        }
        Command::Commit => Dispatch::StartCommit,
    }
}
