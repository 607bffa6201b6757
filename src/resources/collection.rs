use std::collections::HashMap;

/// Anything stored in a [`ResourceCollection`]
pub trait Resource {
    fn uuid(&self) -> &str;
    fn name(&self) -> &str;
}

/// Resources keyed by uuid, iterated in insertion order
#[derive(Debug, Clone)]
pub struct ResourceCollection<T> {
    items: HashMap<String, T>,
    /// Uuids in insertion order
    order: Vec<String>,
}

impl<T> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Resource> ResourceCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a resource, replacing any resource with the same uuid in place
    ///
    /// Returns the replaced resource.
    pub fn insert(&mut self, resource: T) -> Option<T> {
        let uuid = resource.uuid().to_string();
        let previous = self.items.insert(uuid.clone(), resource);
        if previous.is_none() {
            self.order.push(uuid);
        }
        previous
    }

    pub fn remove(&mut self, uuid: &str) -> Option<T> {
        let removed = self.items.remove(uuid)?;
        self.order.retain(|u| u != uuid);
        Some(removed)
    }

    pub fn get(&self, uuid: &str) -> Option<&T> {
        self.items.get(uuid)
    }

    pub fn get_mut(&mut self, uuid: &str) -> Option<&mut T> {
        self.items.get_mut(uuid)
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.items.contains_key(uuid)
    }

    /// First resource with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        self.iter().find(|r| r.name() == name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|uuid| self.items.get(uuid))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(String, String);

    impl Resource for Named {
        fn uuid(&self) -> &str {
            &self.0
        }
        fn name(&self) -> &str {
            &self.1
        }
    }

    fn named(uuid: &str, name: &str) -> Named {
        Named(uuid.to_string(), name.to_string())
    }

    #[test]
    fn test_insertion_order() {
        let mut collection = ResourceCollection::new();
        for uuid in ["c", "a", "b"] {
            collection.insert(named(uuid, uuid));
        }
        let order: Vec<&str> = collection.iter().map(|r| r.uuid()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut collection = ResourceCollection::new();
        collection.insert(named("a", "first"));
        collection.insert(named("b", "second"));
        let old = collection.insert(named("a", "renamed"));

        assert_eq!(old.map(|r| r.1), Some("first".to_string()));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.iter().next().map(|r| r.name()), Some("renamed"));
    }

    #[test]
    fn test_remove() {
        let mut collection = ResourceCollection::new();
        collection.insert(named("a", "x"));
        collection.insert(named("b", "y"));

        assert!(collection.remove("a").is_some());
        assert!(collection.remove("a").is_none());
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.find_by_name("y").map(|r| r.uuid()), Some("b"));
    }
}
