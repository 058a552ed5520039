//! Normalized result of one parse

use super::{Entity, Table};

/// The entities of one script, in first-seen order
///
/// Slots are kept stable so that a registry index stays valid after a
/// `DROP TABLE` removes an earlier entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DdlOutput {
    slots: Vec<Option<Entity>>,
}

impl DdlOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return its slot
    pub fn add_entity(&mut self, entity: Entity) -> usize {
        self.slots.push(Some(entity));
        self.slots.len() - 1
    }

    pub fn remove(&mut self, slot: usize) -> Option<Entity> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn table_mut(&mut self, slot: usize) -> Option<&mut Table> {
        match self.slots.get_mut(slot) {
            Some(Some(Entity::Table(table))) => Some(table),
            _ => None,
        }
    }

    /// Live entities in order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().flatten()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.entities().filter_map(|entity| match entity {
            Entity::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entities().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
