use peeps_data::{EntityId, Location};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default, Debug)]
struct Maps {
    by_entity: HashMap<EntityId, Location>,
    by_location: HashMap<Location, EntityId>,
}

impl Maps {
    fn unbind_entity(&mut self, id: &EntityId) -> Option<Location> {
        let location = self.by_entity.remove(id)?;
        if self.by_location.get(&location) == Some(id) {
            self.by_location.remove(&location);
        }
        Some(location)
    }

    fn unbind_location(&mut self, location: &Location) -> Option<EntityId> {
        let id = self.by_location.remove(location)?;
        if self.by_entity.get(&id) == Some(location) {
            self.by_entity.remove(&id);
        }
        Some(id)
    }
}

/// Bidirectional entity ↔ location index for the world grid.
///
/// Both directions live behind a single `RwLock`, so a reader never sees one
/// map updated and the other stale. Keys are values (`EntityId`,
/// `Location`), never addresses.
///
/// # Invariants
/// - Every entry in one direction has exactly one matching entry in the
///   other (the index is a bijection over occupied cells).
/// - `set` drops any previous binding of either key inside the same write,
///   so an entity is never bound to two cells and a cell never names two
///   entities.
///
/// # Examples
/// ```
/// use peeps_core::spatial_index::SpatialIndex;
/// use peeps_data::{EntityId, Location};
///
/// let index = SpatialIndex::new();
/// let id = EntityId::from_u128(7);
/// index.set(id, Location::new(1, 2, 0));
///
/// assert_eq!(index.location_of(&id), Some(Location::new(1, 2, 0)));
/// assert_eq!(index.entity_at(&Location::new(1, 2, 0)), Some(id));
/// assert_eq!(index.entity_at(&Location::origin()), None);
/// ```
#[derive(Default, Debug)]
pub struct SpatialIndex {
    maps: RwLock<Maps>,
}

impl SpatialIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the maps half-updated:
    // every write path mutates both maps before returning.
    fn read(&self) -> RwLockReadGuard<'_, Maps> {
        self.maps.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Maps> {
        self.maps.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Where `id` is, or `None` if it was never set or has been removed.
    #[must_use]
    pub fn location_of(&self, id: &EntityId) -> Option<Location> {
        self.read().by_entity.get(id).copied()
    }

    /// Who is at `location`, or `None` for an empty cell.
    #[must_use]
    pub fn entity_at(&self, location: &Location) -> Option<EntityId> {
        self.read().by_location.get(location).copied()
    }

    #[must_use]
    pub fn contains_entity(&self, id: &EntityId) -> bool {
        self.read().by_entity.contains_key(id)
    }

    /// Binds `id` to `location`, replacing whatever either was bound to.
    ///
    /// Returns the entity that previously held `location`, if it was a
    /// different one.
    pub fn set(&self, id: EntityId, location: Location) -> Option<EntityId> {
        let mut maps = self.write();
        maps.unbind_entity(&id);
        let displaced = maps.unbind_location(&location);
        maps.by_entity.insert(id, location);
        maps.by_location.insert(location, id);
        displaced.filter(|d| *d != id)
    }

    /// Removes `id` and its cell. Returns the cell it was bound to.
    pub fn remove_by_entity(&self, id: &EntityId) -> Option<Location> {
        self.write().unbind_entity(id)
    }

    /// Clears `location` and its occupant. Returns the occupant.
    pub fn remove_by_location(&self, location: &Location) -> Option<EntityId> {
        self.write().unbind_location(location)
    }

    /// Snapshot of all bound cells, sorted by location.
    #[must_use]
    pub fn occupied_locations(&self) -> Vec<Location> {
        let mut locations: Vec<Location> = self.read().by_location.keys().copied().collect();
        locations.sort_unstable();
        locations
    }

    /// Snapshot of all bindings, sorted by location.
    #[must_use]
    pub fn entries(&self) -> Vec<(Location, EntityId)> {
        let mut entries: Vec<(Location, EntityId)> = self
            .read()
            .by_location
            .iter()
            .map(|(l, id)| (*l, *id))
            .collect();
        entries.sort_unstable_by_key(|(l, _)| *l);
        entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().by_entity.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that both directions agree. Intended for tests and debug
    /// assertions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let maps = self.read();
        maps.by_entity.len() == maps.by_location.len()
            && maps
                .by_entity
                .iter()
                .all(|(id, loc)| maps.by_location.get(loc) == Some(id))
    }
}
