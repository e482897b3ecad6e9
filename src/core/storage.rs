use crate::core::BodyId;
use crate::error::EngineError;
use crate::Result;

/// Insertion-ordered storage for rigid bodies.
///
/// Backed by a `Vec` so iteration order always equals insertion order;
/// the step pipeline relies on that for deterministic trajectories.
/// There is no removal: the body set is fixed after world setup.
#[derive(Debug, Default)]
pub struct BodyStorage<T> {
    items: Vec<T>,
}

impl<T> BodyStorage<T> {
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an item and returns its id
    pub fn add(&mut self, item: T) -> BodyId {
        let id = BodyId(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Gets a reference to an item by id
    pub fn get(&self, id: BodyId) -> Result<&T> {
        self.items
            .get(id.index())
            .ok_or(EngineError::BodyNotFound(id))
    }

    /// Gets a mutable reference to an item by id
    pub fn get_mut(&mut self, id: BodyId) -> Result<&mut T> {
        self.items
            .get_mut(id.index())
            .ok_or(EngineError::BodyNotFound(id))
    }

    /// Returns the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (BodyId(i as u32), item))
    }

    /// Iterates items mutably in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(i, item)| (BodyId(i as u32), item))
    }
}
