//! The user's owned-perfume list: distinct catalog ids in insertion order.

/// Ordered set of perfume ids. Insertion order is preserved and duplicates
/// are rejected, so the list reads back the way it was built.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    ids: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Build from a stored id list, keeping the first occurrence of each id
    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut inventory = Self::new();
        for id in ids {
            inventory.add(id);
        }
        inventory
    }

    /// Add an id; returns false when it was already present
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an id; returns false when it was not present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
