use peeps_data::{Entity, EntityId};
use std::collections::{HashMap, HashSet};

/// Entity table in creation order with an id lookup.
///
/// Entities are never dropped implicitly; death only flips a flag. `forget`
/// is the one way out.
#[derive(Debug, Default, Clone)]
pub struct Population {
    entities: Vec<Entity>,
    id_map: HashMap<EntityId, usize>,
}

impl Population {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity. An id that is already present is left untouched and
    /// `false` is returned.
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.id_map.contains_key(&entity.id) {
            return false;
        }
        self.id_map.insert(entity.id, self.entities.len());
        self.entities.push(entity);
        true
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.id_map.get(id).map(|&idx| &self.entities[idx])
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.id_map.get(id).map(|&idx| &mut self.entities[idx])
    }

    /// Mutable access to two distinct entities at once.
    pub fn get_pair_mut(
        &mut self,
        a: &EntityId,
        b: &EntityId,
    ) -> Option<(&mut Entity, &mut Entity)> {
        let ia = *self.id_map.get(a)?;
        let ib = *self.id_map.get(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.entities.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.entities.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.id_map.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_alive())
    }

    /// Ids of living entities in creation order.
    #[must_use]
    pub fn alive_ids(&self) -> Vec<EntityId> {
        self.alive().map(|e| e.id).collect()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    #[must_use]
    pub fn dead_count(&self) -> usize {
        self.entities.len() - self.alive_count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drops the given entities for good and returns how many were removed.
    pub fn forget(&mut self, ids: &[EntityId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let gone: HashSet<&EntityId> = ids.iter().collect();
        let before = self.entities.len();
        self.entities.retain(|e| !gone.contains(&e.id));
        self.id_map = self
            .entities
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.id, idx))
            .collect();
        before - self.entities.len()
    }
}
