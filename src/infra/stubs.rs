use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anyhow::Result;

use crate::usecases::contracts::{HapticStrength, Haptics, KeyValueStore};

/// Haptic feedback for platforms without it: does nothing.
#[derive(Debug, Clone, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn pulse(&mut self, _strength: HapticStrength) {}
}

/// In-memory key-value store. Used as the fallback when the on-disk store
/// directory cannot be created, and by tests; clones share the same
/// underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
