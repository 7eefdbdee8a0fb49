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
//! Entity management
//!
//! An entity is an identity, a bag of components holding at most one
//! component per concrete type, and a liveness flag. Entities are built by
//! gameplay code and then handed to the [`Manager`](crate::ecs::Manager),
//! which owns them until they die.

use crate::ecs::component::{Component, ComponentMask, ComponentStore};
use crate::ecs::Entities;
use crate::error::Result;
use std::fmt;

/// Unique identifier for an entity
///
/// Ids are allocated monotonically by the registry and never reused, so a
/// stale id simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Create a new EntityId from a raw u64 value
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hook invoked once when a dead entity is torn down
///
/// Runs after the entity has left every system and while it is still in the
/// live registry, so it can read its own components through `entities`.
/// Entities added from the hook are queued for the next update.
pub type DeathHook = Box<dyn FnOnce(EntityId, &mut Entities) -> Result<()>>;

/// An entity: identity, components and a liveness flag
pub struct Entity {
    id: EntityId,
    components: ComponentStore,
    dead: bool,
    on_death: Option<DeathHook>,
}

impl Entity {
    /// Create an empty entity with the given id
    ///
    /// Prefer [`Entities::create_entity`](crate::ecs::Entities::create_entity),
    /// which allocates a fresh id.
    pub fn new(id: EntityId) -> Self {
        Entity {
            id,
            components: ComponentStore::new(),
            dead: false,
            on_death: None,
        }
    }

    /// Get the entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach a component, replacing any existing component of the same type
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut Self {
        self.components.insert(component);
        self
    }

    /// Builder-style variant of [`add_component`](Self::add_component)
    pub fn with_component<T: Component>(mut self, component: T) -> Self {
        self.components.insert(component);
        self
    }

    /// Detach and return a component
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        self.components.remove::<T>()
    }

    /// Get a component, failing with `MissingComponent` if absent
    pub fn get_component<T: Component>(&self) -> Result<&T> {
        self.components.get::<T>(self.id)
    }

    /// Get a mutable component, failing with `MissingComponent` if absent
    pub fn get_component_mut<T: Component>(&mut self) -> Result<&mut T> {
        self.components.get_mut::<T>(self.id)
    }

    /// Get a component if present
    pub fn try_component<T: Component>(&self) -> Option<&T> {
        self.components.try_get::<T>()
    }

    /// Get a mutable component if present
    pub fn try_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.try_get_mut::<T>()
    }

    /// Check if the entity owns a component of type `T`
    pub fn has_component<T: Component>(&self) -> bool {
        self.components.contains::<T>()
    }

    /// Suspend or resume processing of a component without removing it
    pub fn set_component_enabled<T: Component>(&mut self, enabled: bool) -> Result<()> {
        self.components.set_enabled::<T>(self.id, enabled)
    }

    /// Whether the component is present and enabled
    pub fn is_component_enabled<T: Component>(&self) -> bool {
        self.components.is_enabled::<T>()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Check whether every component type in `mask` is attached
    pub fn satisfies(&self, mask: &ComponentMask) -> bool {
        self.components.satisfies(mask)
    }

    /// Mark the entity dead; the manager tears it down on its next update
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Whether the entity has been marked dead
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Install the hook run once during teardown
    pub fn set_on_death<F>(&mut self, hook: F)
    where
        F: FnOnce(EntityId, &mut Entities) -> Result<()> + 'static,
    {
        self.on_death = Some(Box::new(hook));
    }

    pub(crate) fn take_on_death(&mut self) -> Option<DeathHook> {
        self.on_death.take()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &self.components.len())
            .field("dead", &self.dead)
            .field("on_death", &self.on_death.is_some())
            .finish()
    }
}
