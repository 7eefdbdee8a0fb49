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
//! System execution framework
//!
//! A system processes the entities whose components satisfy its
//! [`ComponentMask`]. Membership is tracked by the shared [`SystemBase`] and
//! maintained by the [`Manager`](crate::ecs::Manager); the system only
//! implements the per-frame lifecycle:
//!
//! 1. `pre_process` once
//! 2. `process_entity` for every member
//! 3. `post_process` once

use crate::ecs::{ComponentMask, Entities, Entity, EntityId};
use crate::error::Result;
use std::any::Any;
use std::collections::HashSet;
use std::marker::PhantomData;

/// Membership and switch state shared by every system
#[derive(Debug, Clone)]
pub struct SystemBase {
    mask: ComponentMask,
    enabled: bool,
    members: HashSet<EntityId>,
}

impl SystemBase {
    /// Create an enabled base requiring the given components
    pub fn new(mask: ComponentMask) -> Self {
        SystemBase {
            mask,
            enabled: true,
            members: HashSet::new(),
        }
    }

    /// The required-component mask
    pub fn mask(&self) -> &ComponentMask {
        &self.mask
    }

    /// Whether the entity satisfies the mask
    pub fn qualifies(&self, entity: &Entity) -> bool {
        entity.satisfies(&self.mask)
    }

    /// Whether processing is switched on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switch processing on or off; membership keeps being tracked either way
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the entity is currently a member
    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    /// Current members, sorted by id
    pub fn members(&self) -> Vec<EntityId> {
        let mut members: Vec<EntityId> = self.members.iter().copied().collect();
        members.sort();
        members
    }

    /// Number of members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn add_member(&mut self, id: EntityId) -> bool {
        self.members.insert(id)
    }

    pub(crate) fn remove_member(&mut self, id: EntityId) -> bool {
        self.members.remove(&id)
    }

    /// Forget every member
    pub fn purge(&mut self) {
        self.members.clear();
    }
}

/// Trait for systems driven by the manager
///
/// `process_entity` must not add entities to the live set directly; going
/// through `Entities::add_entity` queues them until the next update.
pub trait System: Any {
    /// Shared membership state
    fn base(&self) -> &SystemBase;

    /// Mutable shared membership state
    fn base_mut(&mut self) -> &mut SystemBase;

    /// Called once per update before any entity is processed
    fn pre_process(&mut self, _entities: &mut Entities, _delta: f64) -> Result<()> {
        Ok(())
    }

    /// Called once per update for every member
    fn process_entity(&mut self, id: EntityId, entities: &mut Entities, delta: f64) -> Result<()>;

    /// Called once per update after every member has been processed
    fn post_process(&mut self, _entities: &mut Entities, _delta: f64) -> Result<()> {
        Ok(())
    }

    /// Called after an entity joins this system
    fn on_member_added(&mut self, _id: EntityId) {}

    /// Called after an entity leaves this system
    fn on_member_removed(&mut self, _id: EntityId) {}

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Allow downcasting to the concrete system type
    fn as_any(&self) -> &dyn Any;

    /// Allow mutable downcasting to the concrete system type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Typed handle to a system registered with a manager
///
/// Returned by [`Manager::add_system`](crate::ecs::Manager::add_system) and
/// used instead of looking systems up by type at runtime.
#[derive(Debug)]
pub struct SystemHandle<S> {
    index: usize,
    _marker: PhantomData<fn() -> S>,
}

impl<S> SystemHandle<S> {
    pub(crate) fn new(index: usize) -> Self {
        SystemHandle {
            index,
            _marker: PhantomData,
        }
    }

    /// Registration index of the system
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<S> Clone for SystemHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SystemHandle<S> {}

impl<S> PartialEq for SystemHandle<S> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<S> Eq for SystemHandle<S> {}
