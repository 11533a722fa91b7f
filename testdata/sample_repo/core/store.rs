use std::collections::HashMap;

/// A key-value store.
pub struct Store {
    items: HashMap<String, String>,
}

impl Store {
    pub fn new() -> Self {
        Store { items: HashMap::new() }
    }

    pub fn put(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

fn total(store: &Store) -> usize {
    store.items.len()
}
