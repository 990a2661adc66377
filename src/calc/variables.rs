use std::collections::BTreeMap;

/// Symbol → resolved value mapping carried between calculations. Later
/// writes for a key overwrite earlier ones; only `clear` removes entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableStore {
    values: BTreeMap<String, String>,
}

impl VariableStore {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        tracing::debug!(%key, %value, "variable assigned");
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Copy of every binding, as serialised into the next request.
    pub fn get_all(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::VariableStore;

    #[test]
    fn later_writes_overwrite() {
        let mut store = VariableStore::default();
        store.set("x", "5");
        store.set("y", "2");
        store.set("x", "7");
        assert_eq!(store.get("x"), Some("7"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_empties_store() {
        let mut store = VariableStore::default();
        store.set("x", "5");
        store.clear();
        assert!(store.is_empty());
        assert!(store.get_all().is_empty());
    }
}
