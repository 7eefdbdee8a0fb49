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
//! Component storage and management
//!
//! Components are data containers attached to a single entity. Each entity
//! keeps its own [`ComponentStore`], a typed bag holding at most one
//! component per concrete type, and systems select entities through a
//! [`ComponentMask`] of required types.

use crate::ecs::EntityId;
use crate::error::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

/// Trait that all components must implement
///
/// Components are owned by exactly one entity. They must not hold references
/// to other entities' components; go through an [`EntityId`] lookup instead.
pub trait Component: Any {}

struct Slot {
    enabled: bool,
    value: Box<dyn Any>,
}

/// Per-entity storage keyed by concrete component type
///
/// Every component carries an `enabled` flag that lets systems skip it
/// without detaching it (for example, freezing a body while the world is
/// paused).
#[derive(Default)]
pub struct ComponentStore {
    slots: HashMap<TypeId, Slot>,
}

impl ComponentStore {
    /// Create an empty store
    pub fn new() -> Self {
        ComponentStore {
            slots: HashMap::new(),
        }
    }

    /// Insert a component, overwriting any existing one of the same type
    ///
    /// The new component starts enabled.
    pub fn insert<T: Component>(&mut self, component: T) {
        self.slots.insert(
            TypeId::of::<T>(),
            Slot {
                enabled: true,
                value: Box::new(component),
            },
        );
    }

    /// Remove a component and return it
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        let slot = self.slots.remove(&TypeId::of::<T>())?;
        slot.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Get a component, failing with `MissingComponent` if absent
    pub fn get<T: Component>(&self, owner: EntityId) -> Result<&T> {
        self.try_get::<T>().ok_or_else(|| missing::<T>(owner))
    }

    /// Get a mutable component, failing with `MissingComponent` if absent
    pub fn get_mut<T: Component>(&mut self, owner: EntityId) -> Result<&mut T> {
        self.try_get_mut::<T>().ok_or_else(|| missing::<T>(owner))
    }

    /// Get a component if present
    pub fn try_get<T: Component>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    /// Get a mutable component if present
    pub fn try_get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_mut::<T>())
    }

    /// Check if a component of type `T` is stored
    pub fn contains<T: Component>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Set the enabled flag of a stored component
    pub fn set_enabled<T: Component>(&mut self, owner: EntityId, enabled: bool) -> Result<()> {
        match self.slots.get_mut(&TypeId::of::<T>()) {
            Some(slot) => {
                slot.enabled = enabled;
                Ok(())
            }
            None => Err(missing::<T>(owner)),
        }
    }

    /// Whether the component is stored and enabled
    pub fn is_enabled<T: Component>(&self) -> bool {
        self.slots
            .get(&TypeId::of::<T>())
            .map_or(false, |slot| slot.enabled)
    }

    /// Check whether every type in `mask` is stored
    pub fn satisfies(&self, mask: &ComponentMask) -> bool {
        mask.types.iter().all(|ty| self.slots.contains_key(ty))
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Remove all components
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

fn missing<T: Component>(owner: EntityId) -> Error {
    Error::MissingComponent {
        entity: owner,
        component: type_name::<T>(),
    }
}

/// Set of component types a system requires
///
/// # Examples
///
/// ```
/// use platform_physics::ecs::ComponentMask;
/// use platform_physics::physics::PhysicsBody;
///
/// let mask = ComponentMask::new().with::<PhysicsBody>();
/// assert_eq!(mask.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentMask {
    types: BTreeSet<TypeId>,
    names: Vec<&'static str>,
}

impl ComponentMask {
    /// Create an empty mask, which every entity satisfies
    pub fn new() -> Self {
        ComponentMask::default()
    }

    /// Add a required component type
    pub fn with<T: Component>(mut self) -> Self {
        if self.types.insert(TypeId::of::<T>()) {
            self.names.push(type_name::<T>());
        }
        self
    }

    /// Check whether `T` is required
    pub fn requires<T: Component>(&self) -> bool {
        self.types.contains(&TypeId::of::<T>())
    }

    /// Type names of the required components, in insertion order
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// Number of required types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no types are required
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
