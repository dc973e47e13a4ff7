//! The `clear` subcommand: removes the persisted conversation so the next
//! run starts from the welcome state.

use anyhow::Result;

use crate::infra::history;

use super::contracts::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Whether a persisted conversation actually existed.
    pub removed: bool,
}

pub fn clear_history(store: &mut dyn KeyValueStore) -> Result<ClearOutcome> {
    let existed = store.get(history::CONVERSATION_KEY)?.is_some();
    store.remove(history::CONVERSATION_KEY)?;

    tracing::info!(removed = existed, "persisted conversation cleared");
    Ok(ClearOutcome { removed: existed })
}
