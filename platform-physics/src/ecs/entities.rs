// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Live entity registry
//!
//! `Entities` owns every live entity plus a queue of entities added while
//! the manager is iterating. Systems, listeners and death hooks all receive
//! `&mut Entities`, so insertion during an update always goes through the
//! queue and never disturbs the set being iterated.

use crate::ecs::component::Component;
use crate::ecs::{Entity, EntityId};
use crate::error::{Error, Result};
use log::{trace, warn};
use std::collections::HashMap;

/// Registry of live entities with deferred insertion
pub struct Entities {
    next_entity_id: u64,
    live: HashMap<EntityId, Entity>,
    pending: Vec<Entity>,
    deferring: bool,
}

impl Entities {
    /// Create an empty registry
    pub fn new() -> Self {
        Entities {
            next_entity_id: 0,
            live: HashMap::new(),
            pending: Vec::new(),
            deferring: false,
        }
    }

    /// Create a detached entity with a fresh id
    ///
    /// The entity is not live until passed to [`add_entity`](Self::add_entity).
    pub fn create_entity(&mut self) -> Entity {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        Entity::new(id)
    }

    /// Add an entity to the registry
    ///
    /// While an update is in progress the entity is queued and becomes live
    /// at the start of the next update; otherwise it is live immediately.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.next_entity_id = self.next_entity_id.max(id.raw() + 1);

        if self.deferring {
            trace!("Queued {} until the next update", id);
            self.pending.push(entity);
        } else {
            self.insert_live(entity);
        }
        id
    }

    fn insert_live(&mut self, entity: Entity) {
        let id = entity.id();
        if self.live.insert(id, entity).is_some() {
            warn!("{} was added twice; the previous instance was replaced", id);
        }
    }

    /// Whether additions are currently being queued
    pub fn is_deferring(&self) -> bool {
        self.deferring
    }

    pub(crate) fn set_deferring(&mut self, deferring: bool) {
        self.deferring = deferring;
    }

    /// Number of entities waiting for the next update
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Move queued entities into the live set
    pub(crate) fn flush_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for entity in pending {
            self.insert_live(entity);
        }
        count
    }

    /// Get a live entity
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.live.get(&id)
    }

    /// Get a mutable live entity
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.live.get_mut(&id)
    }

    /// Get a live entity, failing with `UnknownEntity` if absent
    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.live.get(&id).ok_or(Error::UnknownEntity(id))
    }

    /// Get a mutable live entity, failing with `UnknownEntity` if absent
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.live.get_mut(&id).ok_or(Error::UnknownEntity(id))
    }

    /// Get a component of a live entity
    pub fn component<T: Component>(&self, id: EntityId) -> Result<&T> {
        self.entity(id)?.get_component::<T>()
    }

    /// Get a mutable component of a live entity
    pub fn component_mut<T: Component>(&mut self, id: EntityId) -> Result<&mut T> {
        self.entity_mut(id)?.get_component_mut::<T>()
    }

    /// Check if an entity is live
    pub fn contains(&self, id: EntityId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Check if there are no live entities
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Ids of all live entities, sorted
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.live.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Iterate over live entities in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.live.values()
    }

    /// Mutable access to every enabled component of type `T`, sorted by owner id
    ///
    /// All borrows are disjoint, so callers may hold them simultaneously.
    pub fn enabled_components_mut<T: Component>(&mut self) -> Vec<(EntityId, &mut T)> {
        let mut found: Vec<(EntityId, &mut T)> = self
            .live
            .iter_mut()
            .filter(|(_, entity)| entity.is_component_enabled::<T>())
            .filter_map(|(id, entity)| entity.try_component_mut::<T>().map(|c| (*id, c)))
            .collect();
        found.sort_by_key(|(id, _)| *id);
        found
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.live.remove(&id)
    }

    /// Drop every live and queued entity
    ///
    /// Id allocation keeps counting so stale ids never resolve.
    pub fn clear(&mut self) {
        self.live.clear();
        self.pending.clear();
    }
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}
